//! Persistent player edits and per-chunk revisions.
#![forbid(unsafe_code)]

use std::sync::{PoisonError, RwLock};

use hashbrown::HashMap;
use strata_blocks::BlockId;

/// Address of one edited cell: chunk origin (x, z) plus local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub origin_x: i32,
    pub origin_z: i32,
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl EditKey {
    #[inline]
    pub const fn new(origin_x: i32, origin_z: i32, x: u32, y: u32, z: u32) -> Self {
        Self {
            origin_x,
            origin_z,
            x,
            y,
            z,
        }
    }

    #[inline]
    pub fn chunk(self) -> (i32, i32) {
        (self.origin_x, self.origin_z)
    }

    #[inline]
    pub fn local(self) -> (u32, u32, u32) {
        (self.x, self.y, self.z)
    }
}

/// Key-value store of deltas from the procedural baseline.
///
/// Shared between chunks that may generate concurrently, so every method takes
/// `&self`. Storing `EMPTY` records a deletion.
pub trait EditStore: Send + Sync {
    fn get(&self, key: EditKey) -> Option<BlockId>;

    fn set(&self, key: EditKey, block: BlockId);

    fn has(&self, key: EditKey) -> bool {
        self.get(key).is_some()
    }

    /// Fast path for the overlay pass. Returning `true` is always correct.
    fn chunk_has_edits(&self, _origin_x: i32, _origin_z: i32) -> bool {
        true
    }

    /// Latest revision recorded for a chunk; 0 when never edited.
    fn chunk_rev(&self, _origin_x: i32, _origin_z: i32) -> u64 {
        0
    }

    /// Record that a chunk was built from edits up to `rev`.
    fn mark_built(&self, _origin_x: i32, _origin_z: i32, _rev: u64) {}
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditStoreStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
    pub rev_entries: usize,
    pub built_entries: usize,
}

#[derive(Default)]
struct Inner {
    // key=(origin_x, origin_z) -> map of local coords -> block
    chunks: HashMap<(i32, i32), HashMap<(u32, u32, u32), BlockId>>,
    // Change-tracking
    rev: HashMap<(i32, i32), u64>,   // latest edit affecting chunk
    built: HashMap<(i32, i32), u64>, // last built rev for chunk
    counter: u64,
}

/// In-memory edit store with simple change tracking.
#[derive(Default)]
pub struct MemoryEditStore {
    inner: RwLock<Inner>,
}

impl MemoryEditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> EditStoreStats {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        EditStoreStats {
            chunk_entries: g.chunks.len(),
            block_edits: g.chunks.values().map(|m| m.len()).sum(),
            rev_entries: g.rev.len(),
            built_entries: g.built.len(),
        }
    }

    /// Snapshot of all edits for a specific chunk, sorted by (y, z, x).
    pub fn snapshot_for_chunk(&self, origin_x: i32, origin_z: i32) -> Vec<((u32, u32, u32), BlockId)> {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<((u32, u32, u32), BlockId)> = match g.chunks.get(&(origin_x, origin_z)) {
            Some(m) => m.iter().map(|(k, v)| (*k, *v)).collect(),
            None => Vec::new(),
        };
        out.sort_by_key(|((x, y, z), _)| (*y, *z, *x));
        out
    }

    pub fn get_built_rev(&self, origin_x: i32, origin_z: i32) -> u64 {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        g.built.get(&(origin_x, origin_z)).copied().unwrap_or(0)
    }

    /// Check if a chunk has edits newer than its last build.
    pub fn needs_rebuild(&self, origin_x: i32, origin_z: i32) -> bool {
        self.chunk_rev(origin_x, origin_z) > self.get_built_rev(origin_x, origin_z)
    }
}

impl EditStore for MemoryEditStore {
    fn get(&self, key: EditKey) -> Option<BlockId> {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        g.chunks.get(&key.chunk()).and_then(|m| m.get(&key.local()).copied())
    }

    fn set(&self, key: EditKey, block: BlockId) {
        let mut g = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        g.counter = g.counter.wrapping_add(1).max(1);
        let stamp = g.counter;
        g.chunks.entry(key.chunk()).or_default().insert(key.local(), block);
        g.rev.insert(key.chunk(), stamp);
    }

    fn chunk_has_edits(&self, origin_x: i32, origin_z: i32) -> bool {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        g.chunks
            .get(&(origin_x, origin_z))
            .is_some_and(|m| !m.is_empty())
    }

    fn chunk_rev(&self, origin_x: i32, origin_z: i32) -> u64 {
        let g = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        g.rev.get(&(origin_x, origin_z)).copied().unwrap_or(0)
    }

    fn mark_built(&self, origin_x: i32, origin_z: i32, rev: u64) {
        let mut g = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Only update if this is a newer revision
        let e = g.built.entry((origin_x, origin_z)).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }
}
