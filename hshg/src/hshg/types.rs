use common::aabb::Aabb;

pub type EntityId = i32;

pub(crate) const MAX_OBJECT_CELL_DENSITY: f64 = 1.0 / 8.0;
pub(crate) const HIERARCHY_FACTOR: f64 = 2.0;
pub(crate) const HIERARCHY_FACTOR_SQRT: f64 = std::f64::consts::SQRT_2;

// Characteristic object sizes are folded into this range so degenerate and
// non-finite boxes still produce a usable cell size.
pub(crate) const MIN_OBJECT_SIZE: f64 = 1e-12;
pub(crate) const MAX_OBJECT_SIZE: f64 = 1e300;

pub(crate) const INVALID_INDEX: u32 = u32::MAX;

// Generation-checked slot handle into the entity arena. A freed slot bumps
// its generation, so handles to removed entities stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntityHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

// The recorded indices must equal the entity's true positions in its cell
// bucket, its grid's object list, and the global registry after every
// mutating operation. Compactions that move another entity fix these up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) aabb: Aabb,
    pub(crate) active: bool,
    pub(crate) hash: u32,
    pub(crate) bucket_index: u32,
    pub(crate) object_index: u32,
    pub(crate) registry_index: u32,
    // Slot of the owning grid in the hierarchy. Non-owning.
    pub(crate) grid: u32,
}

// Offsets are laid out [UL, U, UR, L, self, R, DL, D, DR]; the leading four
// form the half neighborhood swept by queries.
#[derive(Debug, Clone)]
pub(crate) struct Cell {
    pub(crate) bucket: Vec<EntityHandle>,
    pub(crate) neighbor_offsets: [i32; 9],
    // Valid only while the bucket is non-empty, INVALID_INDEX otherwise.
    pub(crate) occupied_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStats {
    pub cell_size: f64,
    pub cell_count: usize,
    pub occupied_cell_count: usize,
    pub entity_count: usize,
}
