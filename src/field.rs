//! The gold tornado: strands and particles swirling along a torus.
//!
//! Each strand keeps a phase accumulator that advances by a fixed speed per
//! frame; its sample points are recomputed from scratch every frame, so the
//! only state carried between frames is the phase. Accumulators and time are
//! `f64` so the step stays exact for a page left open for days; angles are
//! wrapped and narrowed to `f32` only when a vertex is written.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::config::TornadoConfig;
use crate::curve::Torus;

/// Reduce an accumulated angle into `[0, TAU)` for the `f32` curve.
#[inline]
pub fn wrap_angle(a: f64) -> f32 {
    a.rem_euclid(TAU) as f32
}

/// One animated line along the torus.
#[derive(Debug, Clone)]
pub struct Strand {
    pub index: usize,
    /// Leading major angle; grows by `speed` every frame.
    pub phase: f64,
    pub speed: f64,
    /// Span of major angle covered from head to tail.
    pub length: f64,
    /// Minor-angle offset separating strands from each other.
    pub phase_offset: f64,
    /// Tube radius jitter.
    pub radial: f32,
    points: Vec<f32>,
}

impl Strand {
    /// Sampled `[x, y, z]` triples, head first.
    pub fn points(&self) -> &[f32] {
        &self.points
    }

    pub fn sample_count(&self) -> usize {
        self.points.len() / 3
    }

    fn resample(&mut self, torus: &Torus, revolutions: f64, drift: f64) {
        let n = self.sample_count();
        let last = n.saturating_sub(1).max(1) as f64;
        for (j, slot) in self.points.chunks_exact_mut(3).enumerate() {
            let t = j as f64 / last;
            let u = self.phase - t * self.length;
            let v = u * revolutions + self.phase_offset + drift;
            torus.write_point(wrap_angle(u), wrap_angle(v), self.radial, slot);
        }
    }
}

/// One free particle on the torus; its position lives in the shared buffer.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub index: usize,
    pub phase: f64,
    pub speed: f64,
    pub phase_offset: f64,
    pub radial: f32,
}

/// All strands and particles of the tornado scene.
#[derive(Debug, Clone)]
pub struct TornadoField {
    torus: Torus,
    revolutions: f64,
    strand_rate: f64,
    particle_rate: f64,
    strands: Vec<Strand>,
    particles: Vec<Particle>,
    particle_points: Vec<f32>,
    frames: u64,
}

impl TornadoField {
    pub fn new<R: Rng + ?Sized>(config: &TornadoConfig, rng: &mut R) -> Self {
        let segments = config.segments.max(1);
        let strands = (0..config.strand_count)
            .map(|index| Strand {
                index,
                phase: rng.gen::<f64>() * TAU,
                speed: 0.0005 + rng.gen::<f64>() * 0.0005,
                length: PI * 3.0 + rng.gen::<f64>() * PI,
                phase_offset: rng.gen::<f64>() * TAU,
                radial: (rng.gen::<f32>() - 0.2) * 0.1,
                points: vec![0.0; segments * 3],
            })
            .collect();
        let particles = (0..config.particle_count)
            .map(|index| Particle {
                index,
                phase: rng.gen::<f64>() * TAU,
                phase_offset: rng.gen::<f64>() * TAU,
                speed: 0.0001 - rng.gen::<f64>() * 0.001,
                radial: (rng.gen::<f32>() - 0.1) * 0.2,
            })
            .collect();

        let mut field = Self {
            torus: Torus::new(config.major_radius, config.minor_radius),
            revolutions: config.revolutions as f64,
            strand_rate: config.strand_rate as f64,
            particle_rate: config.particle_rate as f64,
            strands,
            particles,
            particle_points: vec![0.0; config.particle_count * 3],
            frames: 0,
        };
        field.sample(0.0);
        field
    }

    /// Advance every entity by one frame and resample the buffers at
    /// `time` seconds.
    pub fn advance(&mut self, time: f64) {
        for strand in &mut self.strands {
            strand.phase += strand.speed;
        }
        for particle in &mut self.particles {
            particle.phase += particle.speed;
        }
        self.frames += 1;
        self.sample(time);
    }

    fn sample(&mut self, time: f64) {
        let drift = time * self.strand_rate;
        for strand in &mut self.strands {
            strand.resample(&self.torus, self.revolutions, drift);
        }

        let drift = time * self.particle_rate;
        for (p, slot) in self.particles.iter().zip(self.particle_points.chunks_exact_mut(3)) {
            let u = p.phase;
            let v = u * self.revolutions + p.phase_offset + drift;
            self.torus.write_point(wrap_angle(u), wrap_angle(v), p.radial, slot);
        }
    }

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle positions as packed `[x, y, z]` triples.
    pub fn particle_points(&self) -> &[f32] {
        &self.particle_points
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn small_config() -> TornadoConfig {
        TornadoConfig {
            strand_count: 4,
            segments: 16,
            particle_count: 32,
            ..TornadoConfig::default()
        }
    }

    #[test]
    fn buffers_sized_at_construction() {
        let mut rng = SmallRng::seed_from_u64(7);
        let field = TornadoField::new(&small_config(), &mut rng);
        assert_eq!(field.strands().len(), 4);
        assert!(field.strands().iter().all(|s| s.sample_count() == 16));
        assert_eq!(field.particle_points().len(), 32 * 3);
    }

    #[test]
    fn random_parameters_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(11);
        let field = TornadoField::new(&TornadoConfig::default(), &mut rng);
        for s in field.strands() {
            assert!((0.0005..0.001).contains(&s.speed));
            assert!((3.0 * PI..4.0 * PI).contains(&s.length));
            assert!((-0.02..0.08).contains(&s.radial));
        }
        for p in field.particles() {
            assert!(p.speed <= 0.0001 && p.speed > -0.0009);
            assert!((-0.02..0.18).contains(&p.radial));
        }
    }

    #[test]
    fn strand_head_sits_at_its_phase() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = TornadoField::new(&small_config(), &mut rng);
        field.advance(1.5);
        let torus = field.torus();
        for s in field.strands() {
            let v = s.phase * 0.4f32 as f64 + s.phase_offset + 1.5 * 0.4f32 as f64;
            let head = torus.point(wrap_angle(s.phase), wrap_angle(v), s.radial);
            let got = &s.points()[..3];
            assert!((got[0] - head.x).abs() < 1e-4);
            assert!((got[1] - head.y).abs() < 1e-4);
            assert!((got[2] - head.z).abs() < 1e-4);
        }
    }

    #[test]
    fn strand_tail_trails_by_length() {
        let mut rng = SmallRng::seed_from_u64(5);
        let field = TornadoField::new(&small_config(), &mut rng);
        let torus = field.torus();
        for s in field.strands() {
            let u = s.phase - s.length;
            let v = u * 0.4f32 as f64 + s.phase_offset;
            let tail = torus.point(wrap_angle(u), wrap_angle(v), s.radial);
            let pts = s.points();
            let got = &pts[pts.len() - 3..];
            assert!((got[0] - tail.x).abs() < 1e-4);
            assert!((got[2] - tail.z).abs() < 1e-4);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = TornadoField::new(&small_config(), &mut SmallRng::seed_from_u64(9));
        let b = TornadoField::new(&small_config(), &mut SmallRng::seed_from_u64(9));
        assert_eq!(a.particle_points(), b.particle_points());
    }

    #[test]
    fn phase_step_stays_exact_over_a_long_session() {
        let cfg = TornadoConfig { segments: 2, particle_count: 0, ..small_config() };
        let mut field = TornadoField::new(&cfg, &mut SmallRng::seed_from_u64(2));
        let start: Vec<(f64, f64)> = field.strands().iter().map(|s| (s.phase, s.speed)).collect();

        // about fourteen hours at 60 fps
        const FRAMES: u64 = 3_000_000;
        for frame in 0..FRAMES {
            field.advance(frame as f64 / 60.0);
        }

        for (s, (phase, speed)) in field.strands().iter().zip(start) {
            let expected = phase + FRAMES as f64 * speed;
            assert!((s.phase - expected).abs() < 1e-6, "strand {} drifted: {} vs {expected}", s.index, s.phase);
        }
        assert!(field.strands()[0].points().iter().all(|c| c.is_finite() && c.abs() < 2.0));
    }

    #[test]
    fn wrapped_angle_matches_unwrapped_curve() {
        let torus = Torus::default();
        let a = 1234.567_f64;
        let wrapped = torus.point(wrap_angle(a), wrap_angle(a * 0.4), 0.0);
        let direct = Vec3::new(
            ((0.9 + 0.8 * (a * 0.4).cos()) * a.cos()) as f32,
            ((0.9 + 0.8 * (a * 0.4).cos()) * a.sin()) as f32,
            (0.8 * (a * 0.4).sin()) as f32,
        );
        assert!((wrapped - direct).length() < 1e-4);
    }

    #[test]
    fn single_segment_does_not_divide_by_zero() {
        let cfg = TornadoConfig { segments: 1, ..small_config() };
        let mut field = TornadoField::new(&cfg, &mut SmallRng::seed_from_u64(1));
        field.advance(0.1);
        assert!(field.strands()[0].points().iter().all(|c| c.is_finite()));
    }
}
