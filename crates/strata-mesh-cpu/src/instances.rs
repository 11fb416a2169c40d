use hashbrown::HashMap;
use strata_blocks::{BlockId, BlockRegistry, EMPTY, MaterialId};
use strata_chunk::CellGrid;
use strata_geom::Transform;

use crate::face::Face;

/// Instanced draw batch for one block type: one local-space transform per
/// visible cell. Slots `[0, count)` are always dense.
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    pub block: BlockId,
    pub material: Option<MaterialId>,
    /// Worst-case instance count (every cell of the chunk visible and of this type).
    pub capacity: usize,
    transforms: Vec<Transform>,
}

impl InstanceBatch {
    pub fn new(block: BlockId, material: Option<MaterialId>, capacity: usize) -> Self {
        Self {
            block,
            material,
            capacity,
            transforms: Vec::new(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[inline]
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    #[inline]
    pub fn transform(&self, slot: u32) -> Option<Transform> {
        self.transforms.get(slot as usize).copied()
    }

    /// Append at the end; `None` once `capacity` is reached.
    pub fn push(&mut self, t: Transform) -> Option<u32> {
        if self.transforms.len() >= self.capacity {
            return None;
        }
        let slot = self.transforms.len() as u32;
        self.transforms.push(t);
        Some(slot)
    }

    /// Remove `slot` by moving the last transform into it.
    ///
    /// Returns the transform that now occupies `slot`, or `None` when the
    /// removed slot was the last one (or out of range).
    pub fn swap_remove(&mut self, slot: u32) -> Option<Transform> {
        let i = slot as usize;
        if i >= self.transforms.len() {
            return None;
        }
        self.transforms.swap_remove(i);
        self.transforms.get(i).copied()
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
    }
}

/// Per-block-type batches for one chunk, in registry id order.
#[derive(Clone, Debug, Default)]
pub struct ChunkInstances {
    batches: Vec<InstanceBatch>,
    by_block: HashMap<BlockId, usize>,
}

impl ChunkInstances {
    /// One empty batch for every non-empty block type in `reg`.
    pub fn for_registry(reg: &BlockRegistry, capacity: usize) -> Self {
        let mut batches = Vec::new();
        let mut by_block = HashMap::new();
        for ty in reg.non_empty() {
            by_block.insert(ty.id, batches.len());
            batches.push(InstanceBatch::new(ty.id, ty.material, capacity));
        }
        Self { batches, by_block }
    }

    #[inline]
    pub fn batches(&self) -> &[InstanceBatch] {
        &self.batches
    }

    #[inline]
    pub fn batch(&self, block: BlockId) -> Option<&InstanceBatch> {
        self.by_block.get(&block).and_then(|&i| self.batches.get(i))
    }

    #[inline]
    pub fn batch_mut(&mut self, block: BlockId) -> Option<&mut InstanceBatch> {
        match self.by_block.get(&block) {
            Some(&i) => self.batches.get_mut(i),
            None => None,
        }
    }

    pub fn total_instances(&self) -> usize {
        self.batches.iter().map(InstanceBatch::count).sum()
    }

    /// Reset every batch count to zero, keeping the batch list.
    pub fn clear(&mut self) {
        for b in &mut self.batches {
            b.clear();
        }
    }
}

/// True when all six neighbours are inside the grid and non-empty.
/// Out-of-range neighbours count as empty, so border cells are never occluded.
#[inline]
pub fn is_occluded(grid: &CellGrid, x: i32, y: i32, z: i32) -> bool {
    Face::ALL.iter().all(|f| {
        let (nx, ny, nz) = f.step(x, y, z);
        !grid.is_empty_at(nx, ny, nz)
    })
}

/// Full rebuild: forget every previous instance and emit one per visible cell.
///
/// Cells are scanned x outer, y middle, z inner. Block ids absent from the
/// registry produce no instance.
pub fn build_chunk_instances(grid: &mut CellGrid, reg: &BlockRegistry) -> ChunkInstances {
    let mut out = ChunkInstances::for_registry(reg, grid.size.volume());
    rebuild_instances(grid, &mut out);
    out
}

/// Same as [`build_chunk_instances`] but reuses the batch list in `instances`.
pub fn rebuild_instances(grid: &mut CellGrid, instances: &mut ChunkInstances) {
    grid.clear_instances();
    instances.clear();
    let w = grid.size.width as i32;
    let h = grid.size.height as i32;
    let mut unknown = 0usize;
    for x in 0..w {
        for y in 0..h {
            for z in 0..w {
                let block = grid.block_at(x, y, z);
                if block == EMPTY || is_occluded(grid, x, y, z) {
                    continue;
                }
                let Some(batch) = instances.batch_mut(block) else {
                    unknown += 1;
                    continue;
                };
                let slot = batch.push(Transform::from_cell(x as usize, y as usize, z as usize));
                if let Some(cell) = grid.get_mut(x, y, z) {
                    cell.instance = slot;
                }
            }
        }
    }
    if unknown > 0 {
        log::debug!(
            "instances ({}, {}, {}): {} visible cells with unregistered block ids",
            grid.origin.x,
            grid.origin.y,
            grid.origin.z,
            unknown
        );
    }
}

/// Per-block cell and instance tallies for one chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockTally {
    pub block: BlockId,
    pub cells: usize,
    pub instances: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstanceStats {
    /// Non-empty cells that own an instance.
    pub visible: usize,
    /// Non-empty cells without an instance.
    pub hidden: usize,
    pub per_block: Vec<BlockTally>,
}

impl InstanceStats {
    pub fn collect(grid: &CellGrid, instances: &ChunkInstances) -> Self {
        let mut per_block: Vec<BlockTally> = instances
            .batches()
            .iter()
            .map(|b| BlockTally {
                block: b.block,
                cells: 0,
                instances: b.count(),
            })
            .collect();
        let mut visible = 0;
        let mut hidden = 0;
        for c in grid.cells().iter().filter(|c| !c.is_empty()) {
            if c.instance.is_some() {
                visible += 1;
            } else {
                hidden += 1;
            }
            if let Some(t) = per_block.iter_mut().find(|t| t.block == c.block) {
                t.cells += 1;
            }
        }
        Self {
            visible,
            hidden,
            per_block,
        }
    }

    pub fn tally(&self, block: BlockId) -> Option<&BlockTally> {
        self.per_block.iter().find(|t| t.block == block)
    }
}
