//! Block catalog, materials, and resource placement parameters.
#![forbid(unsafe_code)]

pub mod config;
pub mod material;
pub mod registry;
pub mod types;

pub use material::MaterialCatalog;
pub use registry::{BlockRegistry, BlockType, ResourceParams};
pub use types::{BlockId, EMPTY, MaterialId};
