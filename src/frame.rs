//! Frame driver: the per-refresh step shared by every background scene.
//!
//! The browser loop in `wasm::scheduler` only feeds timestamps and resize
//! events into a [`FrameDriver`]; everything it does per frame lives here.

use log::warn;

use crate::error::Result;

/// Drawing-surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, pixel_ratio: 1.0 }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            (self.width / self.height) as f32
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels.
    pub fn physical(&self) -> (u32, u32) {
        let scale = self.pixel_ratio.max(1.0);
        (
            (self.width * scale).round().max(1.0) as u32,
            (self.height * scale).round().max(1.0) as u32,
        )
    }
}

/// Elapsed time and frame count since the loop started.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    start_ms: Option<f64>,
    /// Seconds since the first tick.
    pub elapsed: f64,
    /// Seconds since the previous tick.
    pub delta: f64,
    /// Ticks so far; 1 during the first frame.
    pub frame: u64,
}

impl FrameClock {
    pub fn tick(&mut self, now_ms: f64) {
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = ((now_ms - start) / 1000.0).max(0.0);
        self.delta = (elapsed - self.elapsed).max(0.0);
        self.elapsed = elapsed;
        self.frame += 1;
    }
}

/// An animated background bound to one canvas.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// Recompute animated buffers and uniforms.
    fn update(&mut self, clock: &FrameClock);

    /// Submit one render of the current state.
    fn render(&mut self) -> Result<()>;

    fn resize(&mut self, viewport: Viewport);
}

/// Owns every scene on the page and steps them together.
pub struct FrameDriver {
    scenes: Vec<Box<dyn Scene>>,
    clock: FrameClock,
    viewport: Viewport,
}

impl FrameDriver {
    pub fn new(viewport: Viewport) -> Self {
        Self { scenes: Vec::new(), clock: FrameClock::default(), viewport }
    }

    /// Add a scene; it immediately receives the current viewport.
    pub fn push(&mut self, mut scene: Box<dyn Scene>) {
        scene.resize(self.viewport);
        self.scenes.push(scene);
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// One refresh: update then render every scene. A failing render is
    /// logged and the loop carries on.
    pub fn tick(&mut self, now_ms: f64) {
        self.clock.tick(now_ms);
        for scene in &mut self.scenes {
            scene.update(&self.clock);
            if let Err(e) = scene.render() {
                warn!("{}: render failed: {e}", scene.name());
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for scene in &mut self.scenes {
            scene.resize(viewport);
        }
    }
}
