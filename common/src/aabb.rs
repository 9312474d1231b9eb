use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_corners(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: [min_x, min_y],
            max: [max_x, max_y],
        }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    // Absolute values so inverted and degenerate boxes still report a size.
    pub fn longest_edge(&self) -> f64 {
        f64::max(
            (self.max[0] - self.min[0]).abs(),
            (self.max[1] - self.min[1]).abs(),
        )
    }

    // Closed-interval comparison: boxes that only touch still overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min[0] > other.max[0]
            || self.min[1] > other.max[1]
            || self.max[0] < other.min[0]
            || self.max[1] < other.min[1])
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Aabb {
        Aabb {
            min: [self.min[0] + dx, self.min[1] + dy],
            max: [self.max[0] + dx, self.max[1] + dy],
        }
    }

    pub fn get_random_box_inside<R: Rng>(&self, edge: f64, rng: &mut R) -> Aabb {
        let x = self._safe_randf64(rng, self.min[0], self.max[0] - edge);
        let y = self._safe_randf64(rng, self.min[1], self.max[1] - edge);
        Aabb {
            min: [x, y],
            max: [x + edge, y + edge],
        }
    }

    fn _safe_randf64<R: Rng>(&self, rng: &mut R, min: f64, max: f64) -> f64 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: [0.0, 0.0],
            max: [0.0, 0.0],
        }
    }
}
