use super::*;
use crate::error::HshgResult;

#[derive(Debug, Clone)]
pub struct Config {
    // Cell count of every newly created grid level. Must be a power of four
    // and at least 16, so each level is a square grid with a power-of-two
    // side and the mask hash stays valid.
    pub initial_cell_count: usize,
    // Pre-reserved capacity for the entity arena and the global registry.
    pub entity_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_cell_count: 256,
            entity_capacity: 1024,
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> HshgResult<()> {
        grid::validate_cell_count(self.initial_cell_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_accepts_powers_of_four() {
        for cell_count in [16, 64, 256, 1024, 4096] {
            let config = Config {
                initial_cell_count: cell_count,
                ..Config::default()
            };
            assert!(config.validate().is_ok(), "cell_count {}", cell_count);
        }
    }

    #[test]
    fn test_rejects_invalid_cell_counts() {
        for cell_count in [0, 1, 4, 15, 32, 100, 128, 255] {
            let config = Config {
                initial_cell_count: cell_count,
                ..Config::default()
            };
            assert_eq!(
                config.validate(),
                Err(crate::error::HshgError::InvalidCellCount { cell_count }),
                "cell_count {}",
                cell_count
            );
        }
    }
}
