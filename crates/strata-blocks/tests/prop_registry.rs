use proptest::prelude::*;
use strata_blocks::config::{BlockDef, BlocksConfig, ResourceDef, ScaleDef};
use strata_blocks::material::MaterialCatalog;
use strata_blocks::registry::{BlockRegistry, ResourceParams};
use strata_blocks::EMPTY;

fn plain(name: &str, id: Option<u16>) -> BlockDef {
    BlockDef {
        name: name.into(),
        id,
        material: None,
        resource: None,
    }
}

fn resource(name: &str, scarcity: f32) -> BlockDef {
    BlockDef {
        name: name.into(),
        id: None,
        material: None,
        resource: Some(ResourceDef {
            scale: ScaleDef::Uniform(10.0),
            scarcity,
        }),
    }
}

#[test]
fn builtin_catalog_has_expected_layout() {
    let reg = BlockRegistry::builtin().expect("builtin registry");
    assert_eq!(reg.name_of(EMPTY), Some("air"));
    assert_eq!(reg.id_by_name("grass"), Some(1));
    assert_eq!(reg.id_by_name("dirt"), Some(2));
    let resources: Vec<&str> = reg.resources().map(|t| t.name.as_str()).collect();
    assert_eq!(resources, vec!["stone", "coal_ore", "iron_ore"]);
    assert_eq!(reg.non_empty().count(), 5);
    let grass = reg.get(1).unwrap();
    let mat = reg.materials.get(grass.material.unwrap()).unwrap();
    assert_eq!(mat.key, "grass");
    assert_eq!(mat.color, [85, 144, 32]);
    assert_eq!(reg.materials.hex_color(mat.id).as_deref(), Some("#559020"));
}

#[test]
fn missing_empty_block_is_inserted_and_implicit_ids_skip_zero() {
    let cfg = BlocksConfig {
        blocks: vec![plain("grass", None), plain("dirt", None)],
    };
    let reg = BlockRegistry::from_configs(MaterialCatalog::new(), cfg).unwrap();
    assert_eq!(reg.name_of(EMPTY), Some("air"));
    assert_eq!(reg.id_by_name("grass"), Some(1));
    assert_eq!(reg.id_by_name("dirt"), Some(2));
}

#[test]
fn duplicate_ids_are_rejected() {
    let cfg = BlocksConfig {
        blocks: vec![plain("air", Some(0)), plain("a", Some(3)), plain("b", Some(3))],
    };
    assert!(BlockRegistry::from_configs(MaterialCatalog::new(), cfg).is_err());
}

#[test]
fn resource_on_empty_id_is_rejected() {
    let mut def = resource("air", 0.5);
    def.id = Some(0);
    let cfg = BlocksConfig { blocks: vec![def] };
    assert!(BlockRegistry::from_configs(MaterialCatalog::new(), cfg).is_err());
}

#[test]
fn non_positive_resource_scale_is_rejected() {
    let mut def = resource("stone", 0.5);
    def.resource.as_mut().unwrap().scale = ScaleDef::PerAxis([1.0, 0.0, 1.0]);
    let cfg = BlocksConfig { blocks: vec![def] };
    assert!(BlockRegistry::from_configs(MaterialCatalog::new(), cfg).is_err());
}

#[test]
fn scale_accepts_scalar_or_triple() {
    let reg = BlockRegistry::from_toml_strs(
        "[materials]\n",
        r#"
        [[blocks]]
        name = "air"
        id = 0

        [[blocks]]
        name = "a"
        resource = { scale = 12, scarcity = 0.1 }

        [[blocks]]
        name = "b"
        resource = { scale = [1.0, 2.0, 3.0], scarcity = 0.2 }
    "#,
    )
    .unwrap();
    let a = reg.get(reg.id_by_name("a").unwrap()).unwrap();
    assert_eq!(a.resource.unwrap().scale, [12.0, 12.0, 12.0]);
    let b = reg.get(reg.id_by_name("b").unwrap()).unwrap();
    assert_eq!(b.resource.unwrap().scale, [1.0, 2.0, 3.0]);
}

#[test]
fn set_resource_params_only_touches_resources() {
    let mut reg = BlockRegistry::builtin().unwrap();
    let params = ResourceParams {
        scale: [5.0, 6.0, 7.0],
        scarcity: 0.25,
    };
    let coal = reg.id_by_name("coal_ore").unwrap();
    assert!(reg.set_resource_params(coal, params));
    assert_eq!(reg.get(coal).unwrap().resource, Some(params));
    let dirt = reg.id_by_name("dirt").unwrap();
    assert!(!reg.set_resource_params(dirt, params));
    assert!(!reg.set_resource_params(999, params));
}

proptest! {
    // Resource iteration order follows declaration order, regardless of how
    // plain blocks are interleaved.
    #[test]
    fn resources_keep_declaration_order(pattern in proptest::collection::vec(any::<bool>(), 1..24)) {
        let mut blocks = vec![plain("air", Some(0))];
        let mut expected = Vec::new();
        for (i, is_res) in pattern.iter().enumerate() {
            let name = format!("b{i}");
            if *is_res {
                expected.push(name.clone());
                blocks.push(resource(&name, i as f32 / 32.0));
            } else {
                blocks.push(plain(&name, None));
            }
        }
        let reg = BlockRegistry::from_configs(MaterialCatalog::new(), BlocksConfig { blocks }).unwrap();
        let got: Vec<String> = reg.resources().map(|t| t.name.clone()).collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(reg.non_empty().count(), pattern.len());
    }
}
