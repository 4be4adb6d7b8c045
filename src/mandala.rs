//! Harmonic mandala: a layered 2D sketch with short-lived sparks and
//! energy arcs.
//!
//! All geometry is computed in canvas-centered coordinates (y down) and sent
//! through a [`Pen`]. Transient entities live in [`MandalaState`]; nothing is
//! global.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::MandalaConfig;

/// Minimal 2D drawing surface, origin at the canvas center.
pub trait Pen {
    /// Cover the canvas with black at `alpha` (0-255), leaving trails.
    fn wash(&mut self, alpha: u8);
    /// Set stroke color, alpha (0-255) and line width for the calls that follow.
    fn stroke(&mut self, rgb: [u8; 3], alpha: f32, weight: f32);
    fn polyline(&mut self, points: &[Vec2], closed: bool);
    fn line(&mut self, a: Vec2, b: Vec2);
    fn circle(&mut self, center: Vec2, radius: f32);
    /// A dot whose diameter is the current stroke weight.
    fn point(&mut self, at: Vec2);
    fn quadratic(&mut self, start: Vec2, control: Vec2, end: Vec2);
}

/// Something that decays once per frame and is dropped when spent.
pub trait Transient {
    fn update(&mut self);
    fn lifespan(&self) -> f32;

    fn is_dead(&self) -> bool {
        self.lifespan() <= 0.0
    }
}

/// Update every entity, then drop the ones whose lifespan reached zero.
pub fn advance_transients<T: Transient>(items: &mut Vec<T>) {
    for item in items.iter_mut() {
        item.update();
    }
    items.retain(|item| !item.is_dead());
}

pub const SPARK_LIFESPAN: f32 = 100.0;
pub const SPARK_DECAY: f32 = 2.5;
pub const ARC_LIFESPAN: f32 = 50.0;
pub const ARC_DECAY: f32 = 2.0;

/// A particle flung off the hexagon that swirls around the center.
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub lifespan: f32,
    pub decay: f32,
}

impl Spark {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel, lifespan: SPARK_LIFESPAN, decay: SPARK_DECAY }
    }
}

impl Transient for Spark {
    fn update(&mut self) {
        let swirl = Vec2::new(-self.pos.y, self.pos.x).normalize_or_zero() * 0.05;
        self.vel = (self.vel + swirl) * 0.99;
        self.pos += self.vel;
        self.lifespan -= self.decay;
    }

    fn lifespan(&self) -> f32 {
        self.lifespan
    }
}

/// A fading curved link between a hexagon vertex and an arc tip.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyArc {
    pub start: Vec2,
    pub end: Vec2,
    pub lifespan: f32,
    pub max_lifespan: f32,
    pub decay: f32,
}

impl EnergyArc {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end, lifespan: ARC_LIFESPAN, max_lifespan: ARC_LIFESPAN, decay: ARC_DECAY }
    }

    /// Control point bulging sideways by a fifth of the chord.
    pub fn control_point(&self) -> Vec2 {
        let chord = self.end - self.start;
        let normal = Vec2::new(-chord.y, chord.x).normalize_or_zero();
        self.start.lerp(self.end, 0.5) + normal * chord.length() * 0.2
    }
}

impl Transient for EnergyArc {
    fn update(&mut self) {
        self.lifespan -= self.decay;
    }

    fn lifespan(&self) -> f32 {
        self.lifespan
    }
}

#[inline]
fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[inline]
fn polar(angle: f32, radius: f32) -> Vec2 {
    Vec2::from_angle(angle) * radius
}

/// Linear map of `v` from `[a, b]` to `[c, d]`.
#[inline]
fn remap(v: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    c + (v - a) / (b - a) * (d - c)
}

const ARC_SEGMENTS: usize = 10;

/// Tip of segmented arc `seg`; energy arcs end here.
fn arc_tip(seg: usize, time: f32, base: f32) -> Vec2 {
    let span = TAU / ARC_SEGMENTS as f32;
    let rotation = seg as f32 * span + time * 0.15;
    let dist = base * 0.8 + (time * 2.0).sin() * base * 0.07;
    rotate(polar(span - PI / 20.0, dist), rotation)
}

/// Vertices of hexagon `layer` (0 is outermost; sparks leave from it).
fn hex_vertices(layer: usize, time: f32, base: f32) -> [Vec2; 6] {
    let fl = layer as f32;
    let rotation = time * 0.12;
    let radius = base * 0.55 - fl * base * 0.11;
    let pulse = (time * 2.5 + fl * 0.7).sin() * base * 0.015;
    std::array::from_fn(|i| {
        let angle = i as f32 / 6.0 * TAU;
        let modulation = (angle * 6.0 - time * 1.5).cos() * base * 0.025;
        rotate(polar(angle, radius + pulse + modulation), rotation)
    })
}

/// The whole sketch state, owned by the mandala scene.
pub struct MandalaState {
    config: MandalaConfig,
    size: Vec2,
    frame: u64,
    pub sparks: Vec<Spark>,
    pub arcs: Vec<EnergyArc>,
    hex_points: Vec<Vec2>,
    arc_points: Vec<Vec2>,
    rng: SmallRng,
    scratch: Vec<Vec2>,
}

impl MandalaState {
    pub fn new(config: MandalaConfig, size: Vec2, seed: u64) -> Self {
        Self {
            config,
            size,
            frame: 0,
            sparks: Vec::new(),
            arcs: Vec::new(),
            hex_points: Vec::with_capacity(6),
            arc_points: Vec::with_capacity(10),
            rng: SmallRng::seed_from_u64(seed),
            scratch: Vec::with_capacity(256),
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn time(&self) -> f32 {
        self.frame as f32 * self.config.time_step
    }

    pub fn base_radius(&self) -> f32 {
        self.size.x.min(self.size.y) / 2.2
    }

    /// Hexagon vertices recorded during the last frame.
    pub fn hex_points(&self) -> &[Vec2] {
        &self.hex_points
    }

    /// Segmented-arc tips recorded during the last frame.
    pub fn arc_points(&self) -> &[Vec2] {
        &self.arc_points
    }

    /// Advance one frame: move the clock, record this frame's connection
    /// points, emit sparks, age the transients and maybe link a new arc.
    pub fn step(&mut self) {
        // arcs link the previous frame's points and are first aged next frame
        self.maybe_spawn_arc();

        self.frame += 1;
        let time = self.time();
        let base = self.base_radius();

        self.hex_points.clear();
        self.hex_points.extend_from_slice(&hex_vertices(0, time, base));
        self.arc_points.clear();
        self.arc_points.extend((0..ARC_SEGMENTS).map(|seg| arc_tip(seg, time, base)));

        if self.config.spark_interval > 0 && self.frame % self.config.spark_interval == 0 {
            for i in 0..self.hex_points.len() {
                let v = self.hex_points[i];
                let speed = self.rng.gen_range(1.0..2.0);
                self.sparks.push(Spark::new(v, polar(v.y.atan2(v.x), speed)));
            }
        }

        advance_transients(&mut self.sparks);
        advance_transients(&mut self.arcs);
    }

    /// Draw the current frame; nothing but scratch space changes.
    pub fn draw<P: Pen + ?Sized>(&mut self, pen: &mut P) {
        let time = self.time();
        let base = self.base_radius();

        pen.wash(self.config.trail_alpha);
        self.pulsing_waves(pen, time, base);
        self.orbital_rings(pen, time, base);
        self.segmented_arcs(pen, time, base);
        self.spiral_particles(pen, time, base);
        self.counter_squares(pen, time, base);
        self.hexagons(pen, time, base);
        self.radial_lines(pen, time, base);
        self.inner_mechanism(pen, time, base);
        self.central_flower(pen, time, base);
        self.interference_rings(pen, time, base);

        self.draw_transients(pen);
    }

    fn color(&self) -> [u8; 3] {
        self.config.color
    }

    fn pulsing_waves<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        for i in 0..3 {
            let phase = (time * 0.5 + i as f32 * PI) % PI;
            let diameter = phase.sin().powi(2) * base * 2.5;
            let alpha = phase.cos().powi(4) * 5.0;
            pen.stroke(self.color(), alpha, 2.0);
            pen.circle(Vec2::ZERO, diameter / 2.0);
        }
    }

    fn orbital_rings<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        const SEGMENTS: usize = 150;
        let spin = time * 0.1;
        for i in 0..4 {
            let fi = i as f32;
            let ring = base * 0.95 + fi * base * 0.08;
            self.scratch.clear();
            for j in 0..=SEGMENTS {
                let angle = j as f32 / SEGMENTS as f32 * TAU;
                let r = ring
                    + (angle * 10.0 + time * 2.5 + fi).sin() * base * 0.03
                    + (angle * 5.0 - time * 3.5).cos() * base * 0.025
                    + (angle * 20.0 + time * 1.5).sin() * base * 0.015;
                self.scratch.push(polar(angle + spin, r));
            }
            pen.stroke(self.color(), 25.0 - fi * 4.0, 0.7);
            pen.polyline(&self.scratch, true);
        }
    }

    fn segmented_arcs<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        const STEPS: usize = 60;
        let span = TAU / ARC_SEGMENTS as f32;
        for seg in 0..ARC_SEGMENTS {
            let rotation = seg as f32 * span + time * 0.15;
            self.scratch.clear();
            for i in 0..STEPS {
                let t = i as f32 / STEPS as f32;
                let angle = t * span - PI / 20.0;
                let dist = base * 0.8 + (t * PI * 4.0 + time * 2.0).sin() * base * 0.07;
                self.scratch.push(rotate(polar(angle, dist), rotation));
            }
            pen.stroke(self.color(), 40.0, 1.2);
            pen.polyline(&self.scratch, false);

            pen.stroke(self.color(), 90.0, 3.5);
            pen.point(arc_tip(seg, time, base));
        }
    }

    fn spiral_particles<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        let golden = PI * (3.0 - 5f32.sqrt());
        let (inner, outer) = (base * 0.15, base * 0.75);
        for i in 0..250 {
            let fi = i as f32;
            let radius = fi.sqrt() * base * 0.025;
            if radius <= inner || radius >= outer {
                continue;
            }
            let size = remap((fi * 0.1 + time).sin(), -1.0, 1.0, 0.5, 3.5);
            let alpha = remap(radius, inner, outer, 100.0, 15.0);
            pen.stroke(self.color(), alpha, size);
            pen.point(polar(fi * golden + time * 0.4, radius));
        }
    }

    fn counter_squares<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        let outer = -time * 0.08;
        let mut previous: Option<[Vec2; 4]> = None;
        for i in 0..4 {
            let fi = i as f32;
            let r = base * (0.6 - fi * 0.08) * 0.707;
            let rotation = time * 0.1 * (fi + 1.0);
            let corners: [Vec2; 4] = std::array::from_fn(|j| {
                let local = polar(PI / 4.0 + j as f32 * PI / 2.0, r);
                rotate(rotate(local, rotation), outer)
            });

            pen.stroke(self.color(), 30.0 - fi * 5.0, 1.5 - fi * 0.3);
            pen.polyline(&corners, true);

            if let Some(prev) = previous {
                pen.stroke(self.color(), 15.0 - fi * 3.0, 0.5);
                for (a, b) in prev.iter().zip(corners.iter()) {
                    pen.line(*a, *b);
                }
            }
            previous = Some(corners);
        }
    }

    fn hexagons<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        for layer in 0..3 {
            let fl = layer as f32;
            pen.stroke(self.color(), 80.0 - fl * 15.0, 2.0 - fl * 0.4);
            pen.polyline(&hex_vertices(layer, time, base), true);
        }
    }

    fn radial_lines<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        const RAYS: usize = 36;
        const STEP: f32 = 2.0;
        for i in 0..RAYS {
            let angle = i as f32 / RAYS as f32 * TAU + time * 0.2;
            self.scratch.clear();
            let mut d = base * 0.075;
            while d < base * 0.5 {
                let wave = (d * 0.1 + time * 4.5).sin() * base * 0.018;
                let flow = (d * 0.05 - time * 2.5).cos() * base * 0.012;
                self.scratch.push(rotate(Vec2::new(wave + flow, d), angle));
                d += STEP;
            }
            if self.scratch.len() > 1 {
                pen.stroke(self.color(), 15.0, 0.8);
                pen.polyline(&self.scratch, false);
            }
        }
    }

    fn inner_mechanism<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        const SIDES: usize = 12;
        let spin = -time * 0.25;
        for layer in 0..5 {
            let fl = layer as f32;
            let radius = base * 0.28 - fl * base * 0.05;
            let breathe = (time * 3.0 + fl * 0.8).sin() * base * 0.01;
            self.scratch.clear();
            for i in 0..=SIDES {
                let angle = i as f32 / SIDES as f32 * TAU;
                let modulation = (angle * (5.0 + fl) + time * 2.2).sin() * base * 0.018;
                self.scratch.push(polar(angle + spin, radius + breathe + modulation));
            }
            pen.stroke(self.color(), 90.0 - fl * 15.0, 1.5 - fl * 0.3);
            pen.polyline(&self.scratch, false);
        }
    }

    fn central_flower<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        const BLADES: usize = 12;
        let spin = time * 0.35;
        let core = base * 0.12;
        let openness = (time * 2.0 + PI).sin() * 0.5 + 0.5;
        let blade_len = core * (1.2 + (time * 2.5).sin() * 0.2);
        let blade_start = core * 0.5;

        pen.stroke(self.color(), 100.0, 1.0);
        for i in 0..BLADES {
            let angle = i as f32 / BLADES as f32 * TAU + spin;
            pen.line(
                rotate(Vec2::new(0.0, blade_start), angle),
                rotate(Vec2::new(0.0, blade_len * openness), angle),
            );
        }

        for layer in 0..4 {
            let fl = layer as f32;
            let radius = core - fl * base * 0.02;
            let pulse = (time * 3.5 + fl * 0.5).sin() * base * 0.005;
            pen.stroke(self.color(), 150.0 - fl * 25.0, 2.2 - fl * 0.4);
            pen.circle(Vec2::ZERO, (radius + pulse).max(0.0));
        }
        pen.stroke(self.color(), 220.0, 6.0);
        pen.point(Vec2::ZERO);
    }

    fn interference_rings<P: Pen + ?Sized>(&mut self, pen: &mut P, time: f32, base: f32) {
        const STEPS: usize = 240;
        pen.stroke(self.color(), 8.0, 0.5);
        for r in 0..15 {
            let fr = r as f32;
            let ring = base * 0.15 + fr * base * 0.065;
            self.scratch.clear();
            for i in 0..=STEPS {
                let angle = i as f32 / STEPS as f32 * TAU;
                let radius = ring
                    + (angle * 18.0 + time * 1.2 + fr * 0.3).sin() * base * 0.008
                    + (angle * 9.0 - time * 1.8 + fr * 0.5).cos() * base * 0.006;
                self.scratch.push(polar(angle, radius));
            }
            pen.polyline(&self.scratch, true);
        }
    }

    fn draw_transients<P: Pen + ?Sized>(&self, pen: &mut P) {
        for spark in &self.sparks {
            pen.stroke(self.config.color, spark.lifespan, 2.0);
            pen.point(spark.pos);
        }

        for arc in &self.arcs {
            let alpha = remap(arc.lifespan, 0.0, arc.max_lifespan, 0.0, 150.0);
            let weight = remap(arc.lifespan, 0.0, arc.max_lifespan, 0.0, 2.0);
            pen.stroke(self.config.color, alpha, weight);
            pen.quadratic(arc.start, arc.control_point(), arc.end);
        }
    }

    fn maybe_spawn_arc(&mut self) {
        if self.hex_points.is_empty() || self.arc_points.is_empty() {
            return;
        }
        if self.rng.gen::<f32>() >= self.config.arc_chance {
            return;
        }
        let start = self.hex_points[self.rng.gen_range(0..self.hex_points.len())];
        let end = self.arc_points[self.rng.gen_range(0..self.arc_points.len())];
        self.arcs.push(EnergyArc::new(start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts calls instead of drawing.
    #[derive(Default)]
    struct Tally {
        washes: usize,
        polylines: usize,
        points: usize,
        quadratics: usize,
        max_alpha: f32,
    }

    impl Pen for Tally {
        fn wash(&mut self, _alpha: u8) {
            self.washes += 1;
        }
        fn stroke(&mut self, _rgb: [u8; 3], alpha: f32, _weight: f32) {
            self.max_alpha = self.max_alpha.max(alpha);
        }
        fn polyline(&mut self, points: &[Vec2], _closed: bool) {
            assert!(points.iter().all(|p| p.is_finite()));
            self.polylines += 1;
        }
        fn line(&mut self, _a: Vec2, _b: Vec2) {}
        fn circle(&mut self, _center: Vec2, radius: f32) {
            assert!(radius >= 0.0);
        }
        fn point(&mut self, _at: Vec2) {
            self.points += 1;
        }
        fn quadratic(&mut self, _s: Vec2, _c: Vec2, _e: Vec2) {
            self.quadratics += 1;
        }
    }

    fn frame(st: &mut MandalaState, pen: &mut Tally) {
        st.step();
        st.draw(pen);
    }

    fn state(seed: u64) -> MandalaState {
        MandalaState::new(MandalaConfig::default(), Vec2::new(1200.0, 800.0), seed)
    }

    #[test]
    fn spark_lives_exactly_forty_frames() {
        let mut sparks = vec![Spark::new(Vec2::new(10.0, 0.0), Vec2::ZERO)];
        for frame in 1..40 {
            advance_transients(&mut sparks);
            assert_eq!(sparks.len(), 1, "dropped early at frame {frame}");
        }
        advance_transients(&mut sparks);
        assert!(sparks.is_empty());
    }

    #[test]
    fn arc_lives_exactly_twenty_five_frames() {
        let mut arcs = vec![EnergyArc::new(Vec2::ZERO, Vec2::X)];
        for _ in 0..24 {
            advance_transients(&mut arcs);
        }
        assert_eq!(arcs.len(), 1);
        advance_transients(&mut arcs);
        assert!(arcs.is_empty());
    }

    #[test]
    fn spark_swirls_around_the_center() {
        let mut s = Spark::new(Vec2::new(100.0, 0.0), Vec2::ZERO);
        s.update();
        // perpendicular of +x is +y
        assert!(s.pos.y > 0.0);
        assert!((s.vel.y - 0.05 * 0.99).abs() < 1e-6);
    }

    #[test]
    fn control_point_bulges_off_the_chord() {
        let arc = EnergyArc::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((arc.control_point() - Vec2::new(5.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn sparks_emitted_every_sixth_frame() {
        let mut st = state(1);
        let mut pen = Tally::default();
        for _ in 0..5 {
            frame(&mut st, &mut pen);
        }
        assert!(st.sparks.is_empty());
        frame(&mut st, &mut pen);
        assert_eq!(st.sparks.len(), 6);
    }

    #[test]
    fn connection_points_recorded_each_frame() {
        let mut st = state(2);
        let mut pen = Tally::default();
        frame(&mut st, &mut pen);
        frame(&mut st, &mut pen);
        assert_eq!(st.hex_points().len(), 6);
        assert_eq!(st.arc_points().len(), 10);
        assert_eq!(pen.washes, 2);
    }

    #[test]
    fn transient_population_stays_bounded() {
        let mut st = state(3);
        let mut pen = Tally::default();
        for _ in 0..2_000 {
            frame(&mut st, &mut pen);
        }
        // at most 40 frames of sparks alive, 6 per emission every 6 frames
        assert!(st.sparks.len() <= 6 * 7);
        assert!(st.arcs.len() <= 25);
        assert!(pen.max_alpha <= 255.0);
    }

    #[test]
    fn arcs_eventually_spawn() {
        let mut st = state(4);
        let mut pen = Tally::default();
        for _ in 0..400 {
            frame(&mut st, &mut pen);
        }
        assert!(pen.quadratics > 0);
    }

    #[test]
    fn drawing_does_not_advance_the_sketch() {
        let mut st = state(6);
        let mut pen = Tally::default();
        for _ in 0..12 {
            st.step();
        }
        let sparks = st.sparks.clone();
        let frame = st.frame();
        st.draw(&mut pen);
        st.draw(&mut pen);
        assert_eq!(st.frame(), frame);
        assert_eq!(st.sparks, sparks);
        assert_eq!(pen.washes, 2);
    }

    #[test]
    fn zero_sized_canvas_draws_nothing_invalid() {
        let mut st = MandalaState::new(MandalaConfig::default(), Vec2::ZERO, 5);
        let mut pen = Tally::default();
        frame(&mut st, &mut pen);
        assert_eq!(st.base_radius(), 0.0);
    }
}
