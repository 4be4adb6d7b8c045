//! Hash-based value noise, mirrored by `NOISE_GLSL` in [`super::glsl`].

use glam::Vec2;

/// GLSL-style `fract`: always in `[0, 1)`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn hash(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(127.1, 311.7))).sin() * 43_758.547)
}

/// Value noise in `[0, 1]`, C1-continuous.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::X);
    let c = hash(i + Vec2::Y);
    let d = hash(i + Vec2::ONE);
    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

pub const FBM_OCTAVES: usize = 5;

/// Fractal sum of [`value_noise`], normalized to `[0, 1]`.
pub fn fbm(mut p: Vec2) -> f32 {
    let mut sum = 0.0;
    let mut amp = 0.5;
    let mut norm = 0.0;
    for _ in 0..FBM_OCTAVES {
        sum += amp * value_noise(p);
        norm += amp;
        // rotate and scale so octaves do not align on the lattice
        p = Vec2::new(0.8 * p.x - 0.6 * p.y, 0.6 * p.x + 0.8 * p.y) * 2.02;
        amp *= 0.5;
    }
    sum / norm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_stays_in_unit_range() {
        for i in 0..200 {
            let p = Vec2::new(i as f32 * 0.173, i as f32 * -0.311);
            let n = value_noise(p);
            assert!((0.0..=1.0).contains(&n));
            let f = fbm(p);
            assert!((0.0..=1.0).contains(&f));
        }
    }

    #[test]
    fn noise_is_continuous_across_lattice_edges() {
        let below = value_noise(Vec2::new(2.0 - 1e-4, 0.5));
        let above = value_noise(Vec2::new(2.0 + 1e-4, 0.5));
        assert!((below - above).abs() < 1e-2);
    }

    #[test]
    fn smoothstep_clamps() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}
