use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HshgError {
    UnknownEntity { id: i32 },
    InvalidCellCount { cell_count: usize },
    InvalidCellSize { cell_size: f64 },
}

pub type HshgResult<T> = Result<T, HshgError>;

impl fmt::Display for HshgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HshgError::UnknownEntity { id } => {
                write!(f, "entity is not tracked (id: {})", id)
            }
            HshgError::InvalidCellCount { cell_count } => {
                write!(
                    f,
                    "cell count must be a power of four and at least 16 (cell_count: {})",
                    cell_count
                )
            }
            HshgError::InvalidCellSize { cell_size } => {
                write!(
                    f,
                    "cell size must be finite and positive (cell_size: {})",
                    cell_size
                )
            }
        }
    }
}

impl std::error::Error for HshgError {}
