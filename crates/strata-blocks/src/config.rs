use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug, Clone)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    // Material key in materials.toml
    #[serde(default)]
    pub material: Option<String>,
    // Present only for blocks stamped by resource placement
    #[serde(default)]
    pub resource: Option<ResourceDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResourceDef {
    #[serde(default = "default_resource_scale")]
    pub scale: ScaleDef,
    pub scarcity: f32,
}

// Scale supports either one number for all axes or an [x, y, z] triple
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum ScaleDef {
    Uniform(f32),
    PerAxis([f32; 3]),
}

impl ScaleDef {
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        match self {
            ScaleDef::Uniform(s) => [s, s, s],
            ScaleDef::PerAxis(v) => v,
        }
    }
}

fn default_resource_scale() -> ScaleDef {
    ScaleDef::Uniform(30.0)
}
