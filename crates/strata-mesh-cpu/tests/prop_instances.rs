use proptest::prelude::*;
use strata_blocks::{BlockId, BlockRegistry, EMPTY};
use strata_chunk::CellGrid;
use strata_mesh_cpu::{
    ChunkInstances, Face, InstanceStats, build_chunk_instances, is_occluded, push_instance,
    remove_instance,
};
use strata_world::{ChunkOrigin, ChunkSize};

fn registry() -> BlockRegistry {
    BlockRegistry::builtin().unwrap()
}

// Mostly-solid grids so interior occlusion actually happens.
fn grid_strategy() -> impl Strategy<Value = (usize, usize, Vec<BlockId>)> {
    (1usize..=6, 1usize..=6).prop_flat_map(|(w, h)| {
        let cell = prop_oneof![1 => Just(EMPTY), 4 => 1u16..=5];
        proptest::collection::vec(cell, w * h * w).prop_map(move |blocks| (w, h, blocks))
    })
}

/// Every cell's slot resolves to a transform for that cell, and batch counts
/// equal the number of instanced cells of their block.
fn assert_consistent(grid: &CellGrid, inst: &ChunkInstances) -> Result<(), TestCaseError> {
    let w = grid.size.width as i32;
    let h = grid.size.height as i32;
    for batch in inst.batches() {
        let mut owned = vec![false; batch.count()];
        for x in 0..w {
            for y in 0..h {
                for z in 0..w {
                    let c = grid.get(x, y, z).unwrap();
                    if c.block == EMPTY {
                        prop_assert!(c.instance.is_none());
                    }
                    if c.block != batch.block {
                        continue;
                    }
                    if let Some(slot) = c.instance {
                        let s = slot as usize;
                        prop_assert!(s < batch.count());
                        prop_assert!(!owned[s], "slot {} claimed twice", s);
                        owned[s] = true;
                        let t = batch.transform(slot).unwrap();
                        prop_assert_eq!(t.cell(), Some((x as usize, y as usize, z as usize)));
                    }
                }
            }
        }
        prop_assert!(owned.iter().all(|o| *o), "gap in batch {}", batch.block);
    }
    Ok(())
}

proptest! {
    // A cell is hidden iff all six neighbours exist and are filled
    #[test]
    fn occlusion_matches_neighbour_rule((w, h, blocks) in grid_strategy()) {
        let reg = registry();
        let mut grid = CellGrid::from_blocks(ChunkOrigin::default(), ChunkSize::new(w, h), &blocks);
        let inst = build_chunk_instances(&mut grid, &reg);
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                for z in 0..w as i32 {
                    let c = *grid.get(x, y, z).unwrap();
                    if c.is_empty() {
                        prop_assert!(c.instance.is_none());
                        continue;
                    }
                    let all_filled = Face::ALL.iter().all(|f| {
                        let (nx, ny, nz) = f.step(x, y, z);
                        grid.get(nx, ny, nz).is_some_and(|n| !n.is_empty())
                    });
                    prop_assert_eq!(is_occluded(&grid, x, y, z), all_filled);
                    prop_assert_eq!(c.instance.is_none(), all_filled);
                    let on_border = x == 0 || z == 0 || y == 0
                        || x == w as i32 - 1 || z == w as i32 - 1 || y == h as i32 - 1;
                    if on_border {
                        prop_assert!(c.instance.is_some());
                    }
                }
            }
        }
        assert_consistent(&grid, &inst)?;
        let stats = InstanceStats::collect(&grid, &inst);
        prop_assert_eq!(stats.visible, inst.total_instances());
        prop_assert_eq!(stats.visible + stats.hidden, blocks.iter().filter(|b| **b != EMPTY).count());
    }

    // Arbitrary removals and re-adds keep slots dense and pointing at their cells
    #[test]
    fn swap_remove_keeps_slots_consistent(
        (w, h, blocks) in grid_strategy(),
        ops in proptest::collection::vec((any::<bool>(), 0usize..216), 1..64),
    ) {
        let reg = registry();
        let mut grid = CellGrid::from_blocks(ChunkOrigin::new(-64, 0, 32), ChunkSize::new(w, h), &blocks);
        let mut inst = build_chunk_instances(&mut grid, &reg);
        let volume = w * h * w;
        for (remove, pick) in ops {
            let (x, y, z) = grid.position_of(pick % volume).unwrap();
            let (x, y, z) = (x as i32, y as i32, z as i32);
            let before = grid.get(x, y, z).unwrap().instance;
            let block = grid.block_at(x, y, z);
            let count = inst.batch(block).map_or(0, |b| b.count());
            if remove {
                let removed = remove_instance(&mut grid, &mut inst, x, y, z);
                prop_assert_eq!(removed, before.is_some());
                if removed {
                    prop_assert_eq!(inst.batch(block).unwrap().count(), count - 1);
                    prop_assert!(grid.get(x, y, z).unwrap().instance.is_none());
                }
            } else {
                let pushed = push_instance(&mut grid, &mut inst, x, y, z);
                if block == EMPTY || before.is_some() {
                    prop_assert!(pushed.is_none());
                } else {
                    prop_assert_eq!(pushed, Some(count as u32));
                }
            }
            assert_consistent(&grid, &inst)?;
        }
    }
}

#[test]
fn hollow_shell_keeps_every_cell_visible() {
    let reg = registry();
    let size = ChunkSize::new(5, 5);
    let mut grid = CellGrid::new(ChunkOrigin::default(), size);
    for x in 0..5 {
        for y in 0..5 {
            for z in 0..5 {
                let interior = (1..4).contains(&x) && (1..4).contains(&y) && (1..4).contains(&z);
                if !interior {
                    grid.get_mut(x, y, z).unwrap().block = 3;
                }
            }
        }
    }
    let inst = build_chunk_instances(&mut grid, &reg);
    assert_eq!(inst.batch(3).unwrap().count(), 125 - 27);
}

#[test]
fn fully_enclosed_cell_gets_no_instance() {
    let reg = registry();
    let mut grid = CellGrid::new(ChunkOrigin::default(), ChunkSize::new(3, 3));
    grid.get_mut(1, 1, 1).unwrap().block = 4;
    for f in Face::ALL {
        let (x, y, z) = f.step(1, 1, 1);
        grid.get_mut(x, y, z).unwrap().block = 2;
    }
    let inst = build_chunk_instances(&mut grid, &reg);
    assert_eq!(grid.get(1, 1, 1).unwrap().instance, None);
    assert_eq!(inst.batch(4).unwrap().count(), 0);
    assert_eq!(inst.batch(2).unwrap().count(), 6);
    // Capacity is the worst case for the whole chunk.
    assert!(inst.batches().iter().all(|b| b.capacity == 27));
}
