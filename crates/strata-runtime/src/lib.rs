//! Chunk lifecycle: generation, incremental edits, and batched regeneration.
#![forbid(unsafe_code)]

mod chunk;

use rayon::prelude::*;

pub use chunk::{Chunk, GenerateStats};

/// Regenerate several chunks in parallel. Each chunk is owned by exactly one
/// worker; only the shared edit store is touched concurrently.
pub fn generate_all(chunks: &mut [Chunk]) -> Vec<GenerateStats> {
    let stats: Vec<GenerateStats> = chunks.par_iter_mut().map(Chunk::generate).collect();
    let visible: usize = stats.iter().map(|s| s.instances.visible).sum();
    log::debug!("generated {} chunks, {} visible instances", stats.len(), visible);
    stats
}
