use std::time::Instant;

use strata_blocks::EMPTY;
use strata_edit::{EditKey, EditStore};
use strata_world::{GenCtx, NoiseSource, ResourcePlan, TerrainPlan};

use crate::{CellGrid, ChunkOccupancy};

/// Surface height per (x, z) column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightMap {
    pub width: usize,
    heights: Vec<usize>,
}

impl HeightMap {
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Option<usize> {
        if x >= self.width || z >= self.width {
            return None;
        }
        self.heights.get(z * self.width + x).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.heights
    }
}

#[derive(Clone, Debug)]
pub struct GenerateOutcome {
    pub heights: HeightMap,
    pub occupancy: ChunkOccupancy,
    pub edits_applied: usize,
    pub t_resources_ms: u32,
    pub t_terrain_ms: u32,
    pub t_edits_ms: u32,
}

/// Stamp resource layers into the grid. Every hit overwrites, so later layers win.
pub fn place_resources<N: NoiseSource + ?Sized>(grid: &mut CellGrid, plan: &ResourcePlan, noise: &N) {
    let w = grid.size.width;
    let h = grid.size.height;
    let origin = grid.origin;
    for layer in &plan.layers {
        for x in 0..w {
            for y in 0..h {
                for z in 0..w {
                    let (wx, wy, wz) = origin.world(x, y, z);
                    if layer.places(noise, wx, wy, wz) {
                        let i = grid.idx(x, y, z);
                        grid.cell_at_index_mut(i).block = layer.block;
                    }
                }
            }
        }
    }
}

/// Carve the height field over whatever resources were placed.
///
/// Below the surface only empty cells are filled, so resources survive there.
/// The surface layer is always `top`, and everything above it is cleared.
pub fn carve_terrain<N: NoiseSource + ?Sized>(
    grid: &mut CellGrid,
    plan: &TerrainPlan,
    noise: &N,
) -> HeightMap {
    let w = grid.size.width;
    let h = grid.size.height;
    let origin = grid.origin;
    let mut heights = vec![0usize; w * w];
    for x in 0..w {
        for z in 0..w {
            let (wx, _, wz) = origin.world(x, 0, z);
            let height = plan.column_height(noise, wx, wz, h);
            heights[z * w + x] = height;
            for y in 0..h {
                let i = grid.idx(x, y, z);
                let cell = grid.cell_at_index_mut(i);
                if y < height {
                    if cell.block == EMPTY {
                        cell.block = plan.fill;
                    }
                } else if y == height {
                    cell.block = plan.top;
                } else {
                    cell.block = EMPTY;
                }
            }
        }
    }
    HeightMap { width: w, heights }
}

/// Overwrite every cell that has a stored edit, deletions included.
/// Returns the number of cells taken from the store.
pub fn apply_edits<S: EditStore + ?Sized>(grid: &mut CellGrid, store: &S) -> usize {
    let origin = grid.origin;
    if !store.chunk_has_edits(origin.x, origin.z) {
        return 0;
    }
    let w = grid.size.width;
    let h = grid.size.height;
    let mut applied = 0;
    for x in 0..w {
        for y in 0..h {
            for z in 0..w {
                let key = EditKey::new(origin.x, origin.z, x as u32, y as u32, z as u32);
                if let Some(block) = store.get(key) {
                    let i = grid.idx(x, y, z);
                    grid.cell_at_index_mut(i).block = block;
                    applied += 1;
                }
            }
        }
    }
    applied
}

/// Full block pass: initialize, resources, terrain, edits, in that order.
/// Instance slots are left cleared for the mesher.
pub fn generate_cells<N: NoiseSource, S: EditStore + ?Sized>(
    grid: &mut CellGrid,
    ctx: &GenCtx<N>,
    store: &S,
) -> GenerateOutcome {
    grid.reset();

    let t0 = Instant::now();
    place_resources(grid, &ctx.resources, &ctx.noise);
    let t_resources_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    let t1 = Instant::now();
    let heights = carve_terrain(grid, &ctx.terrain, &ctx.noise);
    let t_terrain_ms = t1.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    let t2 = Instant::now();
    let edits_applied = apply_edits(grid, store);
    let t_edits_ms = t2.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    log::trace!(
        "cells ({}, {}, {}): resources={}ms terrain={}ms edits={} in {}ms",
        grid.origin.x,
        grid.origin.y,
        grid.origin.z,
        t_resources_ms,
        t_terrain_ms,
        edits_applied,
        t_edits_ms
    );

    GenerateOutcome {
        heights,
        occupancy: ChunkOccupancy::of(grid),
        edits_applied,
        t_resources_ms,
        t_terrain_ms,
        t_edits_ms,
    }
}
