use std::sync::Arc;
use std::time::Instant;

use strata_blocks::{BlockId, BlockRegistry, EMPTY};
use strata_chunk::{Cell, CellGrid, ChunkOccupancy, HeightMap, generate_cells};
use strata_edit::{EditKey, EditStore};
use strata_mesh_cpu::{
    ChunkInstances, InstanceBatch, InstanceStats, push_instance, rebuild_instances, remove_instance,
};
use strata_world::{ChunkOrigin, ChunkSize, GenCtx, WorldGenParams};

/// Timings and counts from one `Chunk::generate` call.
#[derive(Clone, Debug)]
pub struct GenerateStats {
    pub occupancy: ChunkOccupancy,
    pub edits_applied: usize,
    pub instances: InstanceStats,
    /// Edit store revision the chunk was built against.
    pub built_rev: u64,
    pub t_total_ms: u32,
    pub t_resources_ms: u32,
    pub t_terrain_ms: u32,
    pub t_edits_ms: u32,
    pub t_mesh_ms: u32,
}

/// One chunk: cell grid, instance batches, and the handles generation reads.
///
/// Mutators take `&mut self`; callers serialize access per chunk. The edit
/// store is the only state shared with other chunks.
pub struct Chunk {
    origin: ChunkOrigin,
    size: ChunkSize,
    params: WorldGenParams,
    reg: Arc<BlockRegistry>,
    store: Arc<dyn EditStore>,
    grid: CellGrid,
    instances: ChunkInstances,
    heights: Option<HeightMap>,
    loaded: bool,
    built_rev: u64,
    mesh_rev: u64,
}

impl Chunk {
    pub fn new(
        origin: ChunkOrigin,
        size: ChunkSize,
        params: WorldGenParams,
        reg: Arc<BlockRegistry>,
        store: Arc<dyn EditStore>,
    ) -> Self {
        let instances = ChunkInstances::for_registry(&reg, size.volume());
        Self {
            origin,
            size,
            params,
            reg,
            store,
            grid: CellGrid::new(origin, size),
            instances,
            heights: None,
            loaded: false,
            built_rev: 0,
            mesh_rev: 0,
        }
    }

    /// Full regeneration: initialize, resources, terrain, edits, then instances.
    /// Every previous block and instance slot is discarded.
    pub fn generate(&mut self) -> GenerateStats {
        let t_start = Instant::now();
        let (ox, oz) = self.origin.column_key();
        let rev = self.store.chunk_rev(ox, oz);

        let ctx = GenCtx::new(&self.reg, &self.params);
        let outcome = generate_cells(&mut self.grid, &ctx, self.store.as_ref());

        let t0 = Instant::now();
        rebuild_instances(&mut self.grid, &mut self.instances);
        let t_mesh_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

        self.heights = Some(outcome.heights);
        self.loaded = true;
        self.built_rev = rev;
        self.mesh_rev += 1;
        self.store.mark_built(ox, oz, rev);

        let stats = GenerateStats {
            occupancy: outcome.occupancy,
            edits_applied: outcome.edits_applied,
            instances: InstanceStats::collect(&self.grid, &self.instances),
            built_rev: rev,
            t_total_ms: t_start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32,
            t_resources_ms: outcome.t_resources_ms,
            t_terrain_ms: outcome.t_terrain_ms,
            t_edits_ms: outcome.t_edits_ms,
            t_mesh_ms,
        };
        log::debug!(
            "chunk ({}, {}, {}) {}x{}x{}: {:?} total={}ms res={}ms terrain={}ms edits={}({}ms) mesh={}ms visible={} hidden={}",
            self.origin.x,
            self.origin.y,
            self.origin.z,
            self.size.width,
            self.size.height,
            self.size.width,
            stats.occupancy,
            stats.t_total_ms,
            stats.t_resources_ms,
            stats.t_terrain_ms,
            stats.edits_applied,
            stats.t_edits_ms,
            stats.t_mesh_ms,
            stats.instances.visible,
            stats.instances.hidden
        );
        stats
    }

    /// Fill an empty cell and give it an instance at the end of its batch.
    ///
    /// Returns `false` without touching anything when the position is out of
    /// range, the cell is occupied, or `block` is `EMPTY`. Neighbouring
    /// instances are left as they are until the next `generate`.
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> bool {
        if block == EMPTY {
            return false;
        }
        match self.grid.get_mut(x, y, z) {
            Some(cell) if cell.is_empty() => cell.block = block,
            _ => return false,
        }
        if push_instance(&mut self.grid, &mut self.instances, x, y, z).is_none() {
            log::debug!("block {block} at ({x}, {y}, {z}) has no batch; cell stored without instance");
        }
        self.store.set(self.edit_key(x, y, z), block);
        self.mesh_rev += 1;
        true
    }

    /// Empty a filled cell, swap-removing its instance if it has one.
    ///
    /// Returns `false` for out-of-range or already empty cells. Neighbours that
    /// become exposed stay uninstanced until the next `generate`.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> bool {
        if self.grid.get(x, y, z).is_none_or(Cell::is_empty) {
            return false;
        }
        remove_instance(&mut self.grid, &mut self.instances, x, y, z);
        if let Some(cell) = self.grid.get_mut(x, y, z) {
            cell.block = EMPTY;
        }
        self.store.set(self.edit_key(x, y, z), EMPTY);
        self.mesh_rev += 1;
        true
    }

    /// Release all batch storage and instance slots. Block data is kept, and
    /// one empty batch per block type stays so later adds still get instances.
    pub fn dispose(&mut self) {
        self.instances = ChunkInstances::for_registry(&self.reg, self.size.volume());
        self.grid.clear_instances();
        self.loaded = false;
        self.mesh_rev += 1;
    }

    /// Replace generation parameters. Takes effect on the next `generate`.
    pub fn set_params(&mut self, params: WorldGenParams) {
        self.params = params;
    }

    fn edit_key(&self, x: i32, y: i32, z: i32) -> EditKey {
        let (ox, oz) = self.origin.column_key();
        EditKey::new(ox, oz, x as u32, y as u32, z as u32)
    }

    #[inline]
    pub fn origin(&self) -> ChunkOrigin {
        self.origin
    }

    #[inline]
    pub fn size(&self) -> ChunkSize {
        self.size
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    #[inline]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.reg
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.grid.block_at(x, y, z)
    }

    #[inline]
    pub fn cell(&self, x: i32, y: i32, z: i32) -> Option<&Cell> {
        self.grid.get(x, y, z)
    }

    #[inline]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[inline]
    pub fn batches(&self) -> &[InstanceBatch] {
        self.instances.batches()
    }

    #[inline]
    pub fn batch_for(&self, block: BlockId) -> Option<&InstanceBatch> {
        self.instances.batch(block)
    }

    /// Bumped on every change to the batches.
    #[inline]
    pub fn mesh_rev(&self) -> u64 {
        self.mesh_rev
    }

    #[inline]
    pub fn heights(&self) -> Option<&HeightMap> {
        self.heights.as_ref()
    }

    pub fn instance_stats(&self) -> InstanceStats {
        InstanceStats::collect(&self.grid, &self.instances)
    }

    /// True when the store holds edits newer than the last `generate`,
    /// including this chunk's own incremental edits.
    pub fn is_stale(&self) -> bool {
        let (ox, oz) = self.origin.column_key();
        self.store.chunk_rev(ox, oz) > self.built_rev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_edit::MemoryEditStore;

    fn chunk(w: usize, h: usize) -> Chunk {
        Chunk::new(
            ChunkOrigin::default(),
            ChunkSize::new(w, h),
            WorldGenParams::default(),
            Arc::new(BlockRegistry::builtin().unwrap()),
            Arc::new(MemoryEditStore::new()),
        )
    }

    #[test]
    fn new_chunk_is_empty_and_unloaded() {
        let c = chunk(4, 4);
        assert!(!c.is_loaded());
        assert_eq!(c.batches().len(), c.registry().non_empty().count());
        assert_eq!(c.instance_stats().visible, 0);
        assert!(c.heights().is_none());
        assert_eq!(c.block_at(0, 0, 0), EMPTY);
        assert_eq!(c.mesh_rev(), 0);
    }

    #[test]
    fn add_rejects_empty_and_out_of_range() {
        let mut c = chunk(2, 2);
        c.generate();
        let rev = c.mesh_rev();
        assert!(!c.add_block(0, 5, 0, 3));
        assert!(!c.add_block(-1, 0, 0, 3));
        assert!(!c.add_block(0, 0, 0, 3));
        assert!(!c.remove_block(0, 5, 0));
        assert_eq!(c.mesh_rev(), rev);
    }

    #[test]
    fn dispose_releases_batches() {
        let mut c = chunk(2, 2);
        c.generate();
        assert!(!c.batches().is_empty());
        c.dispose();
        assert!(!c.is_loaded());
        assert!(c.batches().iter().all(InstanceBatch::is_empty));
        assert_eq!(c.batches().len(), c.registry().non_empty().count());
        assert!(c.grid().cells().iter().all(|cell| cell.instance.is_none()));
        // Blocks survive, so a later generate can rebuild from scratch.
        c.generate();
        assert!(c.is_loaded());
        assert!(!c.batches().is_empty());
    }

    #[test]
    fn add_before_generate_gets_an_instance() {
        let mut c = chunk(2, 2);
        assert!(c.add_block(1, 1, 1, 3));
        assert_eq!(c.cell(1, 1, 1).unwrap().instance, Some(0));
        assert_eq!(c.batch_for(3).unwrap().count(), 1);
    }

    #[test]
    fn add_after_dispose_gets_an_instance() {
        let mut c = chunk(2, 4);
        c.generate();
        c.dispose();
        assert!(c.add_block(0, 3, 0, 3));
        assert_eq!(c.cell(0, 3, 0).unwrap().instance, Some(0));
        assert_eq!(c.batch_for(3).unwrap().count(), 1);
        assert!(c.remove_block(0, 3, 0));
        assert_eq!(c.batch_for(3).unwrap().count(), 0);
    }

    #[test]
    fn set_params_waits_for_generate() {
        let mut c = chunk(4, 8);
        c.generate();
        let before: Vec<_> = c.grid().cells().to_vec();
        c.set_params(WorldGenParams::default().with_seed(99));
        assert_eq!(c.params().seed, 99);
        assert_eq!(c.grid().cells(), &before[..]);
    }
}
