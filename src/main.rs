use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use strata_blocks::{BlockId, BlockRegistry};
use strata_edit::{EditStore, MemoryEditStore};
use strata_mesh_cpu::InstanceStats;
use strata_runtime::Chunk;
use strata_world::worldgen::load_params_from_path;
use strata_world::{ChunkOrigin, ChunkSize, WorldGenParams};

type Coords = (i32, i32, i32);

#[derive(Clone, Debug)]
struct Placement {
    at: Coords,
    block: String,
}

/// Generate one voxel chunk, apply edits incrementally, and report its instance batches.
#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    /// Block catalog (requires --materials)
    #[arg(long, requires = "materials")]
    blocks: Option<PathBuf>,
    /// Material catalog (requires --blocks)
    #[arg(long, requires = "blocks")]
    materials: Option<PathBuf>,
    /// Worldgen parameters TOML
    #[arg(long)]
    worldgen: Option<PathBuf>,
    /// Overrides the worldgen seed
    #[arg(long)]
    seed: Option<i32>,
    /// Chunk extent along X and Z
    #[arg(long, default_value_t = 32)]
    width: usize,
    /// Chunk extent along Y
    #[arg(long, default_value_t = 32)]
    height: usize,
    /// World offset of local (0,0,0)
    #[arg(long, value_parser = parse_coords, default_value = "0,0,0")]
    origin: Coords,
    /// Add a block after generation, e.g. 3,10,4=stone (repeatable)
    #[arg(long = "place", value_parser = parse_placement)]
    place: Vec<Placement>,
    /// Remove a block after generation, e.g. 3,9,4 (repeatable)
    #[arg(long = "remove", value_parser = parse_coords)]
    remove: Vec<Coords>,
    /// Print the surface height of every column
    #[arg(long)]
    heightmap: bool,
}

fn parse_coords(s: &str) -> Result<Coords, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z but got {s:?}"));
    };
    let num = |v: &str| v.parse::<i32>().map_err(|e| format!("{v:?}: {e}"));
    Ok((num(*x)?, num(*y)?, num(*z)?))
}

fn parse_placement(s: &str) -> Result<Placement, String> {
    let Some((at, block)) = s.split_once('=') else {
        return Err(format!("expected X,Y,Z=NAME but got {s:?}"));
    };
    let block = block.trim();
    if block.is_empty() {
        return Err(format!("missing block name in {s:?}"));
    }
    Ok(Placement {
        at: parse_coords(at)?,
        block: block.to_string(),
    })
}

fn load_registry(cli: &Cli) -> Result<BlockRegistry, Box<dyn Error>> {
    match (&cli.materials, &cli.blocks) {
        (Some(m), Some(b)) => BlockRegistry::load_from_paths(m, b),
        _ => BlockRegistry::builtin(),
    }
}

fn load_params(cli: &Cli) -> Result<WorldGenParams, Box<dyn Error>> {
    let params = match &cli.worldgen {
        Some(path) => load_params_from_path(path)?,
        None => WorldGenParams::default(),
    };
    Ok(match cli.seed {
        Some(seed) => params.with_seed(seed),
        None => params,
    })
}

fn block_name(reg: &BlockRegistry, id: BlockId) -> String {
    reg.name_of(id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{id}"))
}

fn print_stats(reg: &BlockRegistry, stats: &InstanceStats) {
    println!("  {:<12} {:>8} {:>10}  {}", "block", "cells", "instances", "color");
    for t in &stats.per_block {
        if t.cells == 0 && t.instances == 0 {
            continue;
        }
        let color = reg
            .get(t.block)
            .and_then(|ty| ty.material)
            .and_then(|m| reg.materials.hex_color(m))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<12} {:>8} {:>10}  {}",
            block_name(reg, t.block),
            t.cells,
            t.instances,
            color
        );
    }
    println!("  visible={} hidden={}", stats.visible, stats.hidden);
}

fn print_heightmap(chunk: &Chunk) {
    let Some(heights) = chunk.heights() else {
        return;
    };
    println!("heightmap (rows z, columns x):");
    for z in 0..heights.width {
        let row: Vec<String> = (0..heights.width)
            .map(|x| heights.get(x, z).map_or_else(|| "-".into(), |h| format!("{h:>3}")))
            .collect();
        println!("  {}", row.join(""));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.width == 0 || cli.height == 0 {
        return Err("chunk width and height must be positive".into());
    }

    let reg = Arc::new(load_registry(&cli)?);
    let params = load_params(&cli)?;
    let store = Arc::new(MemoryEditStore::new());
    let origin = ChunkOrigin::from(cli.origin);
    let size = ChunkSize::new(cli.width, cli.height);
    log::info!(
        "registry: {} block types ({} resources); seed {}",
        reg.len(),
        reg.resources().count(),
        params.seed
    );

    let mut chunk = Chunk::new(origin, size, params, reg.clone(), store.clone());
    let stats = chunk.generate();
    println!(
        "chunk ({}, {}, {}) {}x{}x{} seed {}",
        origin.x,
        origin.y,
        origin.z,
        size.width,
        size.height,
        size.width,
        chunk.params().seed
    );
    println!(
        "generated in {}ms (resources {}ms, terrain {}ms, edits {}ms, mesh {}ms)",
        stats.t_total_ms, stats.t_resources_ms, stats.t_terrain_ms, stats.t_edits_ms, stats.t_mesh_ms
    );
    if stats.occupancy.has_blocks() {
        print_stats(&reg, &stats.instances);
    } else {
        println!("  chunk is empty");
    }

    if cli.heightmap {
        print_heightmap(&chunk);
    }

    if cli.place.is_empty() && cli.remove.is_empty() {
        return Ok(());
    }
    for (x, y, z) in &cli.remove {
        let done = chunk.remove_block(*x, *y, *z);
        println!("remove ({x}, {y}, {z}): {}", if done { "ok" } else { "no-op" });
    }
    for p in &cli.place {
        let Some(id) = reg.id_by_name(&p.block) else {
            return Err(format!("unknown block {:?}", p.block).into());
        };
        let (x, y, z) = p.at;
        let done = chunk.add_block(x, y, z, id);
        println!("place {} at ({x}, {y}, {z}): {}", p.block, if done { "ok" } else { "no-op" });
    }
    println!(
        "after edits (mesh rev {}, store rev {}, stale {}):",
        chunk.mesh_rev(),
        store.chunk_rev(origin.x, origin.z),
        chunk.is_stale()
    );
    print_stats(&reg, &chunk.instance_stats());

    let regenerated = chunk.generate();
    println!("regenerated with edits replayed ({} applied):", regenerated.edits_applied);
    print_stats(&reg, &regenerated.instances);
    Ok(())
}
