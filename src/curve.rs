//! Torus parametrization used by the tornado strands and particles.

use glam::Vec3;

/// A torus swept around the z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    /// Distance from the z axis to the tube center (R).
    pub major: f32,
    /// Tube radius (r) before any per-entity offset.
    pub minor: f32,
}

impl Torus {
    pub const fn new(major: f32, minor: f32) -> Self {
        Self { major, minor }
    }

    /// Point at major angle `u`, minor angle `v`, with the tube radius grown
    /// by `offset`.
    #[inline]
    pub fn point(&self, u: f32, v: f32, offset: f32) -> Vec3 {
        let tube = self.minor + offset;
        let ring = self.major + tube * v.cos();
        Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin())
    }

    /// Same as [`Torus::point`] but writes into an `[x, y, z]` slot of a
    /// vertex buffer.
    #[inline]
    pub fn write_point(&self, u: f32, v: f32, offset: f32, out: &mut [f32]) {
        let p = self.point(u, v, offset);
        out[0] = p.x;
        out[1] = p.y;
        out[2] = p.z;
    }
}

impl Default for Torus {
    fn default() -> Self {
        Self::new(0.9, 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-5;

    #[test]
    fn outer_equator_at_zero_angles() {
        let t = Torus::default();
        let p = t.point(0.0, 0.0, 0.0);
        assert!((p - Vec3::new(1.7, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn inner_equator_at_half_turn() {
        let t = Torus::default();
        let p = t.point(0.0, PI, 0.0);
        assert!((p.x - 0.1).abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn offset_grows_the_tube() {
        let t = Torus::new(1.0, 0.5);
        let p = t.point(FRAC_PI_2, FRAC_PI_2, 0.25);
        // top of the tube: ring radius is R, height is r + offset
        assert!(p.x.abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
        assert!((p.z - 0.75).abs() < EPS);
    }

    #[test]
    fn points_lie_on_the_swept_surface() {
        let t = Torus::new(0.9, 0.8);
        for i in 0..32 {
            let u = i as f32 * 0.37;
            let v = i as f32 * 1.13;
            let p = t.point(u, v, 0.05);
            let ring = (p.x * p.x + p.y * p.y).sqrt() - t.major;
            let dist = (ring * ring + p.z * p.z).sqrt();
            assert!((dist - 0.85).abs() < 1e-4, "u={u} v={v} dist={dist}");
        }
    }

    #[test]
    fn write_point_matches_point() {
        let t = Torus::default();
        let mut buf = [0.0; 6];
        t.write_point(1.0, 2.0, 0.1, &mut buf[3..]);
        let p = t.point(1.0, 2.0, 0.1);
        assert_eq!(&buf[3..], &[p.x, p.y, p.z]);
    }
}
