pub mod error;
pub mod hshg;

pub use common::aabb;
pub use error::{HshgError, HshgResult};
