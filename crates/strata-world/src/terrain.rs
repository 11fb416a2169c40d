use strata_blocks::{BlockId, BlockRegistry, EMPTY};

use crate::noise::{NoiseSource, sanitize_scale};
use crate::worldgen::{TerrainParams, WorldGenParams};

/// Resolved terrain shape plus the block ids it writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainPlan {
    pub params: TerrainParams,
    /// Written at `y == height`.
    pub top: BlockId,
    /// Written below the surface where nothing was placed yet.
    pub fill: BlockId,
}

impl TerrainPlan {
    pub fn from_registry(reg: &BlockRegistry, params: &WorldGenParams) -> Self {
        Self {
            params: params.terrain,
            top: resolve_block(reg, &params.top_block),
            fill: resolve_block(reg, &params.fill_block),
        }
    }

    /// Surface height of the column at world `(wx, wz)`, clamped to `[0, chunk_height - 1]`.
    pub fn column_height<N: NoiseSource + ?Sized>(
        &self,
        noise: &N,
        wx: i32,
        wz: i32,
        chunk_height: usize,
    ) -> usize {
        if chunk_height == 0 {
            return 0;
        }
        let scale = sanitize_scale(self.params.scale);
        let value = noise.noise2d(wx as f32 / scale, wz as f32 / scale);
        let scaled = self.params.offset + self.params.magnitude * value;
        let h = (chunk_height as f32 * scaled).floor();
        // NaN and negatives both land on the bottom layer
        if h.is_nan() || h <= 0.0 {
            return 0;
        }
        (h as usize).min(chunk_height - 1)
    }
}

fn resolve_block(reg: &BlockRegistry, name: &str) -> BlockId {
    match reg.id_by_name(name) {
        Some(id) => id,
        None => {
            log::warn!("terrain block {:?} not in registry; using empty", name);
            EMPTY
        }
    }
}
