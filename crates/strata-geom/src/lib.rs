//! Minimal geometry types for chunk instancing (no renderer dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Placement of one rendered instance in chunk-local space.
///
/// Block instances are never rotated or scaled, so only the translation is kept;
/// `to_cols_array` expands it into the 4x4 matrix a GPU instance buffer expects.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
}

impl Transform {
    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self { translation }
    }

    /// Transform for the cell at local grid coordinates `(x, y, z)`.
    #[inline]
    pub fn from_cell(x: usize, y: usize, z: usize) -> Self {
        Self::from_translation(Vec3::new(x as f32, y as f32, z as f32))
    }

    /// Inverse of [`Transform::from_cell`]: the grid cell this transform was recorded for.
    /// Returns `None` for negative or non-finite translations.
    #[inline]
    pub fn cell(self) -> Option<(usize, usize, usize)> {
        let t = self.translation;
        if !t.is_finite() {
            return None;
        }
        let (x, y, z) = (t.x.round(), t.y.round(), t.z.round());
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return None;
        }
        Some((x as usize, y as usize, z as usize))
    }

    /// Column-major 4x4 matrix.
    #[inline]
    pub fn to_cols_array(self) -> [f32; 16] {
        let t = self.translation;
        [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            t.x, t.y, t.z, 1.0,
        ]
    }
}
