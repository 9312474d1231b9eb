mod api;
mod config;
mod grid;
mod hierarchy;
mod query;
mod storage;
mod types;

pub use config::Config;
pub use hierarchy::Hshg;
pub use types::{EntityId, LevelStats};

pub(crate) use grid::Grid;
pub(crate) use storage::EntityArena;
pub(crate) use types::{
    Cell, Entity, EntityHandle, HIERARCHY_FACTOR, HIERARCHY_FACTOR_SQRT, INVALID_INDEX,
    MAX_OBJECT_CELL_DENSITY, MAX_OBJECT_SIZE, MIN_OBJECT_SIZE,
};
