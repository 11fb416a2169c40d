/// World-space offset of a chunk's local (0,0,0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkOrigin {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkOrigin {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// World coordinates of a local cell. Wraps at the `i32` edge.
    #[inline]
    pub fn world(self, x: usize, y: usize, z: usize) -> (i32, i32, i32) {
        (
            self.x.wrapping_add(x as i32),
            self.y.wrapping_add(y as i32),
            self.z.wrapping_add(z as i32),
        )
    }

    /// Key used by column-addressed stores (chunks span the full height).
    #[inline]
    pub fn column_key(self) -> (i32, i32) {
        (self.x, self.z)
    }
}

impl From<(i32, i32, i32)> for ChunkOrigin {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkOrigin> for (i32, i32, i32) {
    fn from(value: ChunkOrigin) -> Self {
        (value.x, value.y, value.z)
    }
}

/// Chunk dimensions: `width` along X and Z, `height` along Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkSize {
    pub width: usize,
    pub height: usize,
}

impl ChunkSize {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.width * self.height * self.width
    }

    #[inline]
    pub fn contains(self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.width
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::new(32, 32)
    }
}
