use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Deterministic gradient noise, roughly in `[-1, 1]`.
pub trait NoiseSource {
    fn noise2d(&self, x: f32, z: f32) -> f32;
    fn noise3d(&self, x: f32, y: f32, z: f32) -> f32;
}

/// OpenSimplex2 noise seeded from the worldgen seed.
///
/// Frequency is fixed at 1.0; callers divide coordinates by their own scale.
pub struct SeededNoise {
    seed: i32,
    inner: FastNoiseLite,
}

impl SeededNoise {
    pub fn new(seed: i32) -> Self {
        let mut inner = FastNoiseLite::with_seed(seed);
        inner.set_noise_type(Some(NoiseType::OpenSimplex2));
        inner.set_frequency(Some(1.0));
        Self { seed, inner }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl NoiseSource for SeededNoise {
    #[inline]
    fn noise2d(&self, x: f32, z: f32) -> f32 {
        self.inner.get_noise_2d(x, z)
    }

    #[inline]
    fn noise3d(&self, x: f32, y: f32, z: f32) -> f32 {
        self.inner.get_noise_3d(x, y, z)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    #[inline]
    fn noise2d(&self, x: f32, z: f32) -> f32 {
        (**self).noise2d(x, z)
    }

    #[inline]
    fn noise3d(&self, x: f32, y: f32, z: f32) -> f32 {
        (**self).noise3d(x, y, z)
    }
}

/// Divisor guard: non-positive or non-finite scales sample at unit scale.
#[inline]
pub fn sanitize_scale(s: f32) -> f32 {
    if s.is_finite() && s > 0.0 { s } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let a = SeededNoise::new(1337);
        let b = SeededNoise::new(1337);
        for i in 0..64 {
            let x = i as f32 * 0.37;
            assert_eq!(a.noise2d(x, -x), b.noise2d(x, -x));
            assert_eq!(a.noise3d(x, x * 0.5, -x), b.noise3d(x, x * 0.5, -x));
        }
    }

    #[test]
    fn values_stay_near_unit_range() {
        let n = SeededNoise::new(7);
        for i in 0..256 {
            let x = i as f32 * 0.173;
            let v = n.noise3d(x, x * 1.7, x * 0.3);
            assert!((-1.05..=1.05).contains(&v), "{v}");
        }
    }

    #[test]
    fn sanitize_scale_guards_zero() {
        assert_eq!(sanitize_scale(0.0), 1.0);
        assert_eq!(sanitize_scale(-3.0), 1.0);
        assert_eq!(sanitize_scale(f32::NAN), 1.0);
        assert_eq!(sanitize_scale(30.0), 30.0);
    }
}
