use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::MaterialId;

/// Display identity a batch carries to the renderer: a key and a flat RGB color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Material {
    pub id: MaterialId,
    pub key: String,
    pub color: [u8; 3],
}

#[derive(Deserialize)]
struct MaterialsFile {
    // Ordered by key so ids are stable across loads
    materials: BTreeMap<String, MaterialDef>,
}

#[derive(Deserialize)]
struct MaterialDef {
    color: [u8; 3],
}

#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
    by_key: HashMap<String, MaterialId>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// `#rrggbb` for a material id, used in reports.
    pub fn hex_color(&self, id: MaterialId) -> Option<String> {
        self.get(id)
            .map(|m| format!("#{:02x}{:02x}{:02x}", m.color[0], m.color[1], m.color[2]))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let file: MaterialsFile = toml::from_str(toml_str)?;
        let mut catalog = Self::new();
        for (key, def) in file.materials {
            let id = MaterialId(catalog.materials.len() as u16);
            catalog.by_key.insert(key.clone(), id);
            catalog.materials.push(Material {
                id,
                key,
                color: def.color,
            });
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
