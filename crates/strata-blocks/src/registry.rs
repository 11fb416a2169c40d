use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDef, BlocksConfig};
use super::material::MaterialCatalog;
use super::types::{BlockId, EMPTY, MaterialId};

const BUILTIN_MATERIALS: &str = include_str!("../assets/materials.toml");
const BUILTIN_BLOCKS: &str = include_str!("../assets/blocks.toml");

/// Noise parameters for a block stamped by resource placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceParams {
    /// Per-axis divisor applied to world coordinates before sampling.
    pub scale: [f32; 3],
    /// Noise values strictly above this threshold place the resource.
    pub scarcity: f32,
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub material: Option<MaterialId>,
    pub resource: Option<ResourceParams>,
}

impl BlockType {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY
    }

    #[inline]
    pub fn is_resource(&self) -> bool {
        self.resource.is_some()
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub materials: MaterialCatalog,
    // Indexed by id; gaps between declared ids stay `None`.
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
    // Resource ids in declaration order
    resources: Vec<BlockId>,
}

impl BlockRegistry {
    /// Registry holding only the empty block.
    pub fn new() -> Self {
        let mut reg = Self {
            materials: MaterialCatalog::new(),
            blocks: Vec::new(),
            by_name: HashMap::new(),
            resources: Vec::new(),
        };
        reg.insert(empty_type("air"));
        reg
    }

    /// The bundled catalog: air, grass, dirt and the stone/coal/iron resources.
    pub fn builtin() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_strs(BUILTIN_MATERIALS, BUILTIN_BLOCKS)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(|b| b.as_ref())
    }

    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.get(id).map(|t| t.name.as_str())
    }

    /// Number of declared block types, including the empty block.
    pub fn len(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every declared type except the empty block, in id order.
    pub fn non_empty(&self) -> impl Iterator<Item = &BlockType> + '_ {
        self.blocks.iter().flatten().filter(|t| !t.is_empty())
    }

    /// Resource types in declaration order. Later entries overwrite earlier ones
    /// when their placements overlap.
    pub fn resources(&self) -> impl Iterator<Item = &BlockType> + '_ {
        self.resources.iter().filter_map(|&id| self.get(id))
    }

    pub fn load_from_paths(
        materials_path: impl AsRef<Path>,
        blocks_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_path(materials_path)?;
        let blocks_toml = fs::read_to_string(blocks_path)?;
        let blocks_cfg: BlocksConfig = toml::from_str(&blocks_toml)?;
        Self::from_configs(materials, blocks_cfg)
    }

    pub fn from_toml_strs(materials_toml: &str, blocks_toml: &str) -> Result<Self, Box<dyn Error>> {
        let materials = MaterialCatalog::from_toml_str(materials_toml)?;
        let blocks_cfg: BlocksConfig = toml::from_str(blocks_toml)?;
        Self::from_configs(materials, blocks_cfg)
    }

    pub fn from_configs(
        materials: MaterialCatalog,
        cfg: BlocksConfig,
    ) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry {
            materials,
            // Slot 0 is held back so implicit ids never land on the empty block.
            blocks: vec![None],
            by_name: HashMap::new(),
            resources: Vec::new(),
        };
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if reg.get(id).is_some() {
                return Err(format!("block id {id} declared twice ({})", def.name).into());
            }
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("block name {:?} declared twice", def.name).into());
            }
            let ty = compile_block(&reg.materials, id, def)?;
            reg.insert(ty);
        }
        if reg.get(EMPTY).is_none() {
            log::warn!("blocks config has no id 0; inserting empty block \"air\"");
            if reg.by_name.contains_key("air") {
                return Err("block \"air\" must use id 0".into());
            }
            reg.insert(empty_type("air"));
        }
        Ok(reg)
    }

    /// Replace the placement parameters of a resource block. Returns false when
    /// `id` is not a resource.
    pub fn set_resource_params(&mut self, id: BlockId, params: ResourceParams) -> bool {
        match self.blocks.get_mut(id as usize).and_then(|b| b.as_mut()) {
            Some(ty) if ty.resource.is_some() => {
                ty.resource = Some(params);
                true
            }
            _ => false,
        }
    }

    fn insert(&mut self, ty: BlockType) {
        let id = ty.id as usize;
        if self.blocks.len() <= id {
            self.blocks.resize(id + 1, None);
        }
        if ty.is_resource() {
            self.resources.push(ty.id);
        }
        self.by_name.insert(ty.name.clone(), ty.id);
        self.blocks[id] = Some(ty);
    }
}

fn empty_type(name: &str) -> BlockType {
    BlockType {
        id: EMPTY,
        name: name.to_string(),
        material: None,
        resource: None,
    }
}

fn compile_block(
    matcat: &MaterialCatalog,
    id: BlockId,
    def: BlockDef,
) -> Result<BlockType, Box<dyn Error>> {
    if id == EMPTY && (def.resource.is_some() || def.material.is_some()) {
        return Err(format!(
            "block {:?} uses the reserved empty id 0 but declares a material or resource",
            def.name
        )
        .into());
    }
    let material = match def.material.as_deref() {
        Some(key) => {
            let mid = matcat.get_id(key);
            if mid.is_none() {
                log::warn!("block {:?}: unknown material {:?}", def.name, key);
            }
            mid
        }
        None => None,
    };
    let resource = match def.resource {
        Some(r) => {
            let scale = r.scale.to_array();
            if scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
                return Err(
                    format!("resource {:?}: scale must be positive, got {scale:?}", def.name)
                        .into(),
                );
            }
            if !r.scarcity.is_finite() {
                return Err(format!("resource {:?}: scarcity must be finite", def.name).into());
            }
            Some(ResourceParams {
                scale,
                scarcity: r.scarcity,
            })
        }
        None => None,
    };
    Ok(BlockType {
        id,
        name: def.name,
        material,
        resource,
    })
}
