use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fs;
use std::path::Path;

use strata_blocks::config::ScaleDef;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub seed: i32,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub surface: Surface,
    // Per-resource overrides keyed by block name
    #[serde(default)]
    pub resources: HashMap<String, ResourceOverride>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            terrain: Terrain::default(),
            surface: Surface::default(),
            resources: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_terrain_scale")]
    pub scale: f32,
    #[serde(default = "default_terrain_magnitude")]
    pub magnitude: f32,
    #[serde(default = "default_terrain_offset")]
    pub offset: f32,
}
fn default_terrain_scale() -> f32 {
    30.0
}
fn default_terrain_magnitude() -> f32 {
    0.5
}
fn default_terrain_offset() -> f32 {
    0.2
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            scale: default_terrain_scale(),
            magnitude: default_terrain_magnitude(),
            offset: default_terrain_offset(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_top")]
    pub top: String,
    #[serde(default = "default_fill")]
    pub fill: String,
}
fn default_top() -> String {
    "grass".into()
}
fn default_fill() -> String {
    "dirt".into()
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            top: default_top(),
            fill: default_fill(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResourceOverride {
    #[serde(default)]
    pub scale: Option<ScaleDef>,
    #[serde(default)]
    pub scarcity: Option<f32>,
}

/// Height field shape: `height = floor(H * (offset + magnitude * noise(x/scale, z/scale)))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub scale: f32,
    pub magnitude: f32,
    pub offset: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        let t = Terrain::default();
        Self {
            scale: t.scale,
            magnitude: t.magnitude,
            offset: t.offset,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResourceOverrideParams {
    pub scale: Option<[f32; 3]>,
    pub scarcity: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorldGenParams {
    pub seed: i32,
    pub terrain: TerrainParams,
    pub top_block: String,
    pub fill_block: String,
    // Sorted by name so plan construction and logging are stable
    pub resource_overrides: BTreeMap<String, ResourceOverrideParams>,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let resource_overrides = cfg
            .resources
            .iter()
            .map(|(name, o)| {
                (
                    name.clone(),
                    ResourceOverrideParams {
                        scale: o.scale.map(ScaleDef::to_array),
                        scarcity: o.scarcity,
                    },
                )
            })
            .collect();
        Self {
            seed: cfg.seed,
            terrain: TerrainParams {
                scale: cfg.terrain.scale,
                magnitude: cfg.terrain.magnitude,
                offset: cfg.terrain.offset,
            },
            top_block: cfg.surface.top.clone(),
            fill_block: cfg.surface.fill.clone(),
            resource_overrides,
        }
    }

    pub fn with_seed(mut self, seed: i32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_terrain(mut self, terrain: TerrainParams) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn with_resource_override(
        mut self,
        name: impl Into<String>,
        over: ResourceOverrideParams,
    ) -> Self {
        self.resource_overrides.insert(name.into(), over);
        self
    }
}

pub fn params_from_toml_str(s: &str) -> Result<WorldGenParams, Box<dyn Error>> {
    let cfg: WorldGenConfig = toml::from_str(s)?;
    Ok(WorldGenParams::from_config(&cfg))
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    params_from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let p = params_from_toml_str("").unwrap();
        assert_eq!(p, WorldGenParams::default());
        assert_eq!(p.terrain.scale, 30.0);
        assert_eq!(p.top_block, "grass");
        assert_eq!(p.fill_block, "dirt");
    }

    #[test]
    fn parses_overrides() {
        let p = params_from_toml_str(
            r#"
            seed = 42
            [terrain]
            magnitude = 0.0
            offset = 0.5
            [resources.coal_ore]
            scarcity = 0.95
            [resources.stone]
            scale = [10.0, 20.0, 30.0]
        "#,
        )
        .unwrap();
        assert_eq!(p.seed, 42);
        assert_eq!(p.terrain.magnitude, 0.0);
        assert_eq!(p.terrain.offset, 0.5);
        assert_eq!(p.terrain.scale, 30.0);
        assert_eq!(p.resource_overrides["coal_ore"].scarcity, Some(0.95));
        assert_eq!(p.resource_overrides["coal_ore"].scale, None);
        assert_eq!(p.resource_overrides["stone"].scale, Some([10.0, 20.0, 30.0]));
    }

    #[test]
    fn rejects_bad_types() {
        assert!(params_from_toml_str("seed = \"abc\"").is_err());
    }
}
