//! Chunk cell grid and the ordered generation passes.
#![forbid(unsafe_code)]

pub mod generate;

use strata_blocks::{BlockId, EMPTY};
use strata_world::{ChunkOrigin, ChunkSize};

pub use generate::{GenerateOutcome, HeightMap, generate_cells};

/// One voxel: block type plus the render instance slot it currently owns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub block: BlockId,
    pub instance: Option<u32>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        block: EMPTY,
        instance: None,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.block == EMPTY
    }
}

/// Dense `[x][y][z]` grid stored flat; `x` varies fastest.
#[derive(Clone, Debug)]
pub struct CellGrid {
    pub origin: ChunkOrigin,
    pub size: ChunkSize,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(origin: ChunkOrigin, size: ChunkSize) -> Self {
        Self {
            origin,
            size,
            cells: vec![Cell::EMPTY; size.volume()],
        }
    }

    /// Grid from a block list in `idx` order. Wrong-length input is padded with
    /// empty cells or truncated.
    pub fn from_blocks(origin: ChunkOrigin, size: ChunkSize, blocks: &[BlockId]) -> Self {
        let mut grid = Self::new(origin, size);
        for (cell, &b) in grid.cells.iter_mut().zip(blocks.iter()) {
            cell.block = b;
        }
        grid
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        let w = self.size.width;
        (y * w + z) * w + x
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        self.size.contains(x, y, z)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<&Cell> {
        if !self.contains(x, y, z) {
            return None;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.cells.get(i)
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut Cell> {
        if !self.contains(x, y, z) {
            return None;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.cells.get_mut(i)
    }

    /// Block id at a local position; out-of-range positions read as `EMPTY`.
    #[inline]
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get(x, y, z).map_or(EMPTY, |c| c.block)
    }

    #[inline]
    pub fn is_empty_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.block_at(x, y, z) == EMPTY
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to a cell by flat index, used by full-grid passes.
    #[inline]
    pub(crate) fn cell_at_index_mut(&mut self, i: usize) -> &mut Cell {
        &mut self.cells[i]
    }

    /// Every cell back to empty with no instance.
    pub fn reset(&mut self) {
        let volume = self.size.volume();
        self.cells.clear();
        self.cells.resize(volume, Cell::EMPTY);
    }

    pub fn clear_instances(&mut self) {
        for c in &mut self.cells {
            c.instance = None;
        }
    }

    pub fn count_block(&self, block: BlockId) -> usize {
        self.cells.iter().filter(|c| c.block == block).count()
    }

    #[inline]
    pub fn has_non_empty(&self) -> bool {
        self.cells.iter().any(|c| !c.is_empty())
    }

    /// Local coordinates of a flat index, `None` past the end of the grid.
    #[inline]
    pub fn position_of(&self, i: usize) -> Option<(usize, usize, usize)> {
        if i >= self.cells.len() {
            return None;
        }
        let w = self.size.width;
        Some((i % w, i / (w * w), (i / w) % w))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn of(grid: &CellGrid) -> Self {
        if grid.has_non_empty() {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        }
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}
