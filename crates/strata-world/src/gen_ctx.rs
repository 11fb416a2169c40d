use strata_blocks::BlockRegistry;

use crate::noise::{NoiseSource, SeededNoise};
use crate::resources::ResourcePlan;
use crate::terrain::TerrainPlan;
use crate::worldgen::WorldGenParams;

/// Everything one generation pass samples from, resolved once per chunk.
pub struct GenCtx<N = SeededNoise> {
    pub noise: N,
    pub terrain: TerrainPlan,
    pub resources: ResourcePlan,
}

impl GenCtx<SeededNoise> {
    pub fn new(reg: &BlockRegistry, params: &WorldGenParams) -> Self {
        Self::with_noise(SeededNoise::new(params.seed), reg, params)
    }
}

impl<N: NoiseSource> GenCtx<N> {
    pub fn with_noise(noise: N, reg: &BlockRegistry, params: &WorldGenParams) -> Self {
        Self {
            noise,
            terrain: TerrainPlan::from_registry(reg, params),
            resources: ResourcePlan::from_registry(reg, params),
        }
    }
}
