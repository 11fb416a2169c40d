//! CPU instancing: occlusion-culled per-block instance batches and swap-remove updates.
#![forbid(unsafe_code)]

pub mod face;
pub mod instances;
pub mod update;

pub use face::Face;
pub use instances::{
    BlockTally, ChunkInstances, InstanceBatch, InstanceStats, build_chunk_instances, is_occluded,
    rebuild_instances,
};
pub use update::{push_instance, remove_instance};
