//! Chunk placement, noise sampling, and worldgen parameters.
#![forbid(unsafe_code)]

mod coords;
mod gen_ctx;
pub mod noise;
pub mod resources;
pub mod terrain;
pub mod worldgen;

pub use coords::{ChunkOrigin, ChunkSize};
pub use gen_ctx::GenCtx;
pub use noise::{NoiseSource, SeededNoise};
pub use resources::{ResourceLayer, ResourcePlan};
pub use terrain::TerrainPlan;
pub use worldgen::{TerrainParams, WorldGenParams};
