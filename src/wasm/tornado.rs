//! Gold tornado scene: strands as line strips, particles as points, drawn
//! additively through one WebGL2 program.

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::Mat4;
use rand::Rng;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, PointerEvent, WebGl2RenderingContext as GL,
    WebGlProgram, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::bloom::Bloom;
use super::render::{self, DynamicBuffer};
use crate::camera::OrbitCamera;
use crate::config::TornadoConfig;
use crate::error::{Result, SiteError};
use crate::field::TornadoField;
use crate::frame::{FrameClock, Scene, Viewport};
use crate::shader::glsl;

struct Uniforms {
    model: Option<WebGlUniformLocation>,
    view_proj: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    alpha: Option<WebGlUniformLocation>,
    fade: Option<WebGlUniformLocation>,
    point_size: Option<WebGlUniformLocation>,
}

/// Pointer drag accumulated between frames.
#[derive(Default)]
struct Drag {
    active: bool,
    last: (f32, f32),
    pending: (f32, f32),
}

pub struct TornadoScene {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    strand_vao: WebGlVertexArrayObject,
    strand_buf: DynamicBuffer,
    particle_vao: WebGlVertexArrayObject,
    particle_buf: DynamicBuffer,
    field: TornadoField,
    camera: OrbitCamera,
    model: Mat4,
    drag: Rc<RefCell<Drag>>,
    config: TornadoConfig,
    pixel_ratio: f32,
    bloom: Option<Bloom>,
}

fn vao(gl: &GL, program: &WebGlProgram, buffer: &DynamicBuffer) -> Result<WebGlVertexArrayObject> {
    let vao = gl
        .create_vertex_array()
        .ok_or_else(|| SiteError::Graphics("create_vertex_array returned null".into()))?;
    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer.buffer));
    let loc = gl.get_attrib_location(program, "aPosition");
    if loc < 0 {
        return Err(SiteError::Graphics("aPosition attribute missing".into()));
    }
    gl.enable_vertex_attrib_array(loc as u32);
    gl.vertex_attrib_pointer_with_i32(loc as u32, 3, GL::FLOAT, false, 0, 0);
    gl.bind_vertex_array(None);
    Ok(vao)
}

impl TornadoScene {
    /// Create a canvas inside `container` and build the scene on it.
    pub fn new<R: Rng + ?Sized>(
        document: &Document,
        container: &HtmlElement,
        config: &TornadoConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SiteError::Graphics("created element is not a canvas".into()))?;
        canvas.set_class_name("tornado-canvas");
        container.append_child(&canvas)?;

        let gl = render::context(&canvas)?;
        let program = render::program(&gl, glsl::STRAND_VS, glsl::STRAND_FS)?;
        let uniforms = Uniforms {
            model: render::uniform(&gl, &program, "uModel"),
            view_proj: render::uniform(&gl, &program, "uViewProj"),
            color: render::uniform(&gl, &program, "uColor"),
            alpha: render::uniform(&gl, &program, "uAlpha"),
            fade: render::uniform(&gl, &program, "uFade"),
            point_size: render::uniform(&gl, &program, "uPointSize"),
        };

        let field = TornadoField::new(config, rng);
        let segments = field.strands().first().map_or(0, |s| s.sample_count());
        let strand_buf = DynamicBuffer::new(&gl, field.strands().len() * segments * 3)?;
        let particle_buf = DynamicBuffer::new(&gl, field.particle_points().len())?;
        let strand_vao = vao(&gl, &program, &strand_buf)?;
        let particle_vao = vao(&gl, &program, &particle_buf)?;

        let drag = Rc::new(RefCell::new(Drag::default()));
        install_drag(&canvas, &drag)?;

        // Without bloom the additive blend alone carries the glow.
        let bloom = if config.bloom.enabled {
            Bloom::new(&gl, config.bloom)
                .map_err(|e| log::warn!("tornado bloom disabled: {e}"))
                .ok()
        } else {
            None
        };

        log::info!(
            "tornado: {} strands x {} samples, {} particles",
            field.strands().len(),
            segments,
            field.particles().len()
        );

        Ok(Self {
            canvas,
            gl,
            program,
            uniforms,
            strand_vao,
            strand_buf,
            particle_vao,
            particle_buf,
            field,
            camera: OrbitCamera::tornado(1.0),
            model: Mat4::from_rotation_x(FRAC_PI_2) * Mat4::from_rotation_y(18f32.to_radians()),
            drag,
            config: config.clone(),
            pixel_ratio: 1.0,
            bloom,
        })
    }
}

fn install_drag(canvas: &HtmlCanvasElement, drag: &Rc<RefCell<Drag>>) -> Result<()> {
    let down = {
        let drag = drag.clone();
        Closure::wrap(Box::new(move |e: PointerEvent| {
            let mut d = drag.borrow_mut();
            d.active = true;
            d.last = (e.client_x() as f32, e.client_y() as f32);
        }) as Box<dyn FnMut(PointerEvent)>)
    };
    let moved = {
        let drag = drag.clone();
        Closure::wrap(Box::new(move |e: PointerEvent| {
            let mut d = drag.borrow_mut();
            if !d.active {
                return;
            }
            let now = (e.client_x() as f32, e.client_y() as f32);
            d.pending.0 += now.0 - d.last.0;
            d.pending.1 += now.1 - d.last.1;
            d.last = now;
        }) as Box<dyn FnMut(PointerEvent)>)
    };
    let up = {
        let drag = drag.clone();
        Closure::wrap(Box::new(move |_e: PointerEvent| {
            drag.borrow_mut().active = false;
        }) as Box<dyn FnMut(PointerEvent)>)
    };

    canvas.add_event_listener_with_callback("pointerdown", down.as_ref().unchecked_ref())?;
    canvas.add_event_listener_with_callback("pointermove", moved.as_ref().unchecked_ref())?;
    for event in ["pointerup", "pointerleave", "pointercancel"] {
        canvas.add_event_listener_with_callback(event, up.as_ref().unchecked_ref())?;
    }
    down.forget();
    moved.forget();
    up.forget();
    Ok(())
}

impl Scene for TornadoScene {
    fn name(&self) -> &'static str {
        "tornado"
    }

    fn update(&mut self, clock: &FrameClock) {
        self.field.advance(clock.elapsed);

        let (dx, dy) = std::mem::take(&mut self.drag.borrow_mut().pending);
        if dx != 0.0 || dy != 0.0 {
            self.camera.drag(dx, dy);
        }
        self.camera.update();

        let segments = self.field.strands().first().map_or(0, |s| s.sample_count());
        for (i, strand) in self.field.strands().iter().enumerate() {
            self.strand_buf.stage(i * segments * 3, strand.points());
        }
        self.particle_buf.stage(0, self.field.particle_points());
    }

    fn render(&mut self) -> Result<()> {
        let gl = &self.gl;
        if let Some(bloom) = &self.bloom {
            bloom.begin(gl);
        }
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.depth_mask(false);

        gl.use_program(Some(&self.program));
        let [r, g, b] = self.config.color;
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model.as_ref(),
            false,
            &self.model.to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.view_proj.as_ref(),
            false,
            &self.camera.view_projection().to_cols_array(),
        );
        gl.uniform3f(self.uniforms.color.as_ref(), r, g, b);

        self.strand_buf.flush(gl);
        gl.uniform1f(self.uniforms.alpha.as_ref(), self.config.strand_alpha);
        gl.uniform1f(self.uniforms.fade.as_ref(), 1.0);
        gl.bind_vertex_array(Some(&self.strand_vao));
        for (i, strand) in self.field.strands().iter().enumerate() {
            let n = strand.sample_count() as i32;
            gl.draw_arrays(GL::LINE_STRIP, i as i32 * n, n);
        }

        self.particle_buf.flush(gl);
        gl.uniform1f(self.uniforms.alpha.as_ref(), self.config.particle_opacity);
        gl.uniform1f(self.uniforms.fade.as_ref(), 0.0);
        gl.uniform1f(
            self.uniforms.point_size.as_ref(),
            self.config.particle_size * self.pixel_ratio,
        );
        gl.bind_vertex_array(Some(&self.particle_vao));
        gl.draw_arrays(GL::POINTS, 0, self.field.particles().len() as i32);

        gl.bind_vertex_array(None);

        if let Some(bloom) = &self.bloom {
            bloom.finish(gl);
        }
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        render::fit(&self.gl, &self.canvas, viewport);
        let failed = match &mut self.bloom {
            Some(bloom) => bloom.resize(&self.gl, viewport).err(),
            None => None,
        };
        if let Some(e) = failed {
            log::warn!("tornado bloom disabled: {e}");
            self.bloom = None;
        }
        self.camera.set_aspect(viewport.aspect());
        self.pixel_ratio = viewport.pixel_ratio.max(1.0) as f32;
    }
}
