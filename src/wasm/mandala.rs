use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::config::MandalaConfig;
use crate::error::{Result, SiteError};
use crate::frame::{FrameClock, Scene, Viewport};
use crate::mandala::{MandalaState, Pen};

pub const CANVAS_ID: &str = "bg-canvas";

/// [`Pen`] over a 2D canvas context, origin moved to the canvas center.
pub struct CanvasPen {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
    weight: f32,
}

fn rgba(rgb: [u8; 3], alpha: f32) -> String {
    let a = (alpha / 255.0).clamp(0.0, 1.0);
    format!("rgba({}, {}, {}, {a:.4})", rgb[0], rgb[1], rgb[2])
}

impl Pen for CanvasPen {
    fn wash(&mut self, alpha: u8) {
        let ctx = &self.ctx;
        // reset transform before filling, then re-center for the layers
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        ctx.set_fill_style_str(&rgba([0, 0, 0], alpha as f32));
        ctx.fill_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
        ctx.translate(self.size.x as f64 / 2.0, self.size.y as f64 / 2.0).ok();
    }

    fn stroke(&mut self, rgb: [u8; 3], alpha: f32, weight: f32) {
        let style = rgba(rgb, alpha);
        self.ctx.set_stroke_style_str(&style);
        self.ctx.set_fill_style_str(&style);
        self.ctx.set_line_width(weight.max(0.0) as f64);
        self.weight = weight;
    }

    fn polyline(&mut self, points: &[Vec2], closed: bool) {
        let Some((first, rest)) = points.split_first() else { return };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        if closed {
            self.ctx.close_path();
        }
        self.ctx.stroke();
    }

    fn line(&mut self, a: Vec2, b: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(a.x as f64, a.y as f64);
        self.ctx.line_to(b.x as f64, b.y as f64);
        self.ctx.stroke();
    }

    fn circle(&mut self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU).is_ok() {
            self.ctx.stroke();
        }
    }

    fn point(&mut self, at: Vec2) {
        let r = (self.weight / 2.0).max(0.0) as f64;
        if r == 0.0 {
            return;
        }
        self.ctx.begin_path();
        if self.ctx.arc(at.x as f64, at.y as f64, r, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn quadratic(&mut self, start: Vec2, control: Vec2, end: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(start.x as f64, start.y as f64);
        self.ctx
            .quadratic_curve_to(control.x as f64, control.y as f64, end.x as f64, end.y as f64);
        self.ctx.stroke();
    }
}

pub struct MandalaScene {
    canvas: HtmlCanvasElement,
    pen: CanvasPen,
    state: MandalaState,
}

impl MandalaScene {
    pub fn new(
        document: &Document,
        container: &HtmlElement,
        config: MandalaConfig,
        seed: u64,
    ) -> Result<Self> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SiteError::Graphics("created element is not a canvas".into()))?;
        canvas.set_id(CANVAS_ID);
        let style = canvas.style();
        style.set_property("position", "fixed")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("z-index", "-2")?;
        container.append_child(&canvas)?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| SiteError::Graphics("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SiteError::Graphics("context is not 2d".into()))?;
        ctx.set_fill_style_str("#000");
        ctx.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);

        Ok(Self {
            canvas,
            pen: CanvasPen { ctx, size: Vec2::ONE, weight: 1.0 },
            state: MandalaState::new(config, Vec2::ONE, seed),
        })
    }
}

impl Scene for MandalaScene {
    fn name(&self) -> &'static str {
        "mandala"
    }

    // The sketch runs on its own frame counter, not wall-clock time.
    fn update(&mut self, _clock: &FrameClock) {
        self.state.step();
    }

    fn render(&mut self) -> Result<()> {
        self.state.draw(&mut self.pen);
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        let size = Vec2::new(viewport.width as f32, viewport.height as f32);
        self.canvas.set_width(viewport.width.max(1.0) as u32);
        self.canvas.set_height(viewport.height.max(1.0) as u32);
        self.pen.size = size;
        self.state.resize(size);
    }
}
