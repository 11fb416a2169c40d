use strata_blocks::{BlockId, BlockRegistry};

use crate::noise::{NoiseSource, sanitize_scale};
use crate::worldgen::WorldGenParams;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceLayer {
    pub block: BlockId,
    pub scale: [f32; 3],
    pub scarcity: f32,
}

impl ResourceLayer {
    #[inline]
    pub fn sample<N: NoiseSource + ?Sized>(&self, noise: &N, wx: i32, wy: i32, wz: i32) -> f32 {
        noise.noise3d(
            wx as f32 / sanitize_scale(self.scale[0]),
            wy as f32 / sanitize_scale(self.scale[1]),
            wz as f32 / sanitize_scale(self.scale[2]),
        )
    }

    /// True when the noise at this world position exceeds the scarcity threshold.
    #[inline]
    pub fn places<N: NoiseSource + ?Sized>(&self, noise: &N, wx: i32, wy: i32, wz: i32) -> bool {
        self.sample(noise, wx, wy, wz) > self.scarcity
    }
}

/// Resource layers in stamping order; later layers overwrite earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourcePlan {
    pub layers: Vec<ResourceLayer>,
}

impl ResourcePlan {
    pub fn from_registry(reg: &BlockRegistry, params: &WorldGenParams) -> Self {
        for name in params.resource_overrides.keys() {
            let known = reg
                .id_by_name(name)
                .and_then(|id| reg.get(id))
                .is_some_and(|t| t.is_resource());
            if !known {
                log::warn!("resource override {:?} does not name a resource block", name);
            }
        }
        let layers = reg
            .resources()
            .filter_map(|ty| {
                let base = ty.resource?;
                let over = params.resource_overrides.get(&ty.name);
                Some(ResourceLayer {
                    block: ty.id,
                    scale: over.and_then(|o| o.scale).unwrap_or(base.scale),
                    scarcity: over.and_then(|o| o.scarcity).unwrap_or(base.scarcity),
                })
            })
            .collect();
        Self { layers }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
