//! Full-screen shader background (blueprint noise or grid HUD).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent,
    WebGl2RenderingContext as GL, WebGlProgram, WebGlTexture, WebGlUniformLocation,
    WebGlVertexArrayObject, Window,
};

use super::render;
use crate::config::{ShaderConfig, ShaderVariant};
use crate::error::{Result, SiteError};
use crate::frame::{FrameClock, Scene, Viewport};
use crate::shader::{glsl, Palette, ShaderUniforms};

struct Locations {
    time: Option<WebGlUniformLocation>,
    mouse: Option<WebGlUniformLocation>,
    resolution: Option<WebGlUniformLocation>,
    base: Option<WebGlUniformLocation>,
    accent: Option<WebGlUniformLocation>,
    cells: Option<WebGlUniformLocation>,
    text_mask: Option<WebGlUniformLocation>,
    has_mask: Option<WebGlUniformLocation>,
}

/// Offscreen text rendered into an alpha texture.
struct TextMask {
    texture: WebGlTexture,
    scratch: HtmlCanvasElement,
    text: String,
    font: String,
    /// Set once the font finished loading (or failed and we fell back).
    ready: Rc<Cell<bool>>,
}

pub struct BackdropScene {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    loc: Locations,
    palette: Palette,
    variant: ShaderVariant,
    uniforms: Rc<RefCell<ShaderUniforms>>,
    mask: Option<TextMask>,
    mask_uploaded: bool,
    viewport: Viewport,
}

impl BackdropScene {
    pub fn new(window: &Window, canvas: HtmlCanvasElement, config: &ShaderConfig) -> Result<Self> {
        let gl = render::context(&canvas)?;
        let fragment = match config.variant {
            ShaderVariant::Blueprint => glsl::blueprint_fs(),
            ShaderVariant::Grid => glsl::grid_fs(),
        };
        let program = render::program(&gl, glsl::FULLSCREEN_VS, &fragment)?;
        let loc = Locations {
            time: render::uniform(&gl, &program, "uTime"),
            mouse: render::uniform(&gl, &program, "uMouse"),
            resolution: render::uniform(&gl, &program, "uResolution"),
            base: render::uniform(&gl, &program, "uBase"),
            accent: render::uniform(&gl, &program, "uAccent"),
            cells: render::uniform(&gl, &program, "uCells"),
            text_mask: render::uniform(&gl, &program, "uTextMask"),
            has_mask: render::uniform(&gl, &program, "uHasMask"),
        };
        // the full-screen triangle is generated from gl_VertexID
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SiteError::Graphics("create_vertex_array returned null".into()))?;

        let uniforms = Rc::new(RefCell::new(ShaderUniforms::default()));
        track_pointer(window, &uniforms)?;

        let mask = match (config.variant, config.text.trim().is_empty()) {
            (ShaderVariant::Blueprint, false) => {
                let document = window.document().ok_or(SiteError::MissingMount("document"))?;
                match TextMask::new(&gl, &document, config) {
                    Ok(mask) => Some(mask),
                    Err(e) => {
                        log::warn!("backdrop: text mask unavailable: {e}");
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(Self {
            canvas,
            gl,
            program,
            vao,
            loc,
            palette: Palette::from(config),
            variant: config.variant,
            uniforms,
            mask,
            mask_uploaded: false,
            viewport: Viewport::new(1.0, 1.0),
        })
    }
}

fn track_pointer(window: &Window, uniforms: &Rc<RefCell<ShaderUniforms>>) -> Result<()> {
    let on_move = {
        let uniforms = uniforms.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let size = super::scheduler::viewport(&window);
            uniforms.borrow_mut().set_pointer(
                e.client_x() as f32,
                e.client_y() as f32,
                Vec2::new(size.width as f32, size.height as f32),
            );
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    window.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();
    Ok(())
}

impl TextMask {
    fn new(gl: &GL, document: &Document, config: &ShaderConfig) -> Result<Self> {
        let texture = gl
            .create_texture()
            .ok_or_else(|| SiteError::Graphics("create_texture returned null".into()))?;
        let scratch = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SiteError::Graphics("created element is not a canvas".into()))?;
        let ready = Rc::new(Cell::new(false));

        // Font loading is optional: on failure the mask still renders with
        // whatever fallback face the browser picks.
        let pending = document.fonts().load(&config.font);
        let flag = ready.clone();
        let font = config.font.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(pending).await {
                log::warn!("backdrop: font {font} failed to load: {e:?}");
            }
            flag.set(true);
        });

        Ok(Self {
            texture,
            scratch,
            text: config.text.clone(),
            font: config.font.clone(),
            ready,
        })
    }

    /// Draw the text at viewport size and upload it as the mask texture.
    fn upload(&self, gl: &GL, viewport: Viewport) -> Result<()> {
        let (w, h) = viewport.physical();
        self.scratch.set_width(w);
        self.scratch.set_height(h);
        let ctx = self
            .scratch
            .get_context("2d")?
            .ok_or_else(|| SiteError::Graphics("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SiteError::Graphics("context is not 2d".into()))?;
        ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        ctx.set_font(&self.font);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str("#fff");
        ctx.fill_text(&self.text, w as f64 / 2.0, h as f64 / 2.0)?;

        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        gl.tex_image_2d_with_u32_and_u32_and_html_canvas_element(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            &self.scratch,
        )?;
        Ok(())
    }
}

impl Scene for BackdropScene {
    fn name(&self) -> &'static str {
        "backdrop"
    }

    fn update(&mut self, clock: &FrameClock) {
        self.uniforms.borrow_mut().time = clock.elapsed as f32;

        if self.mask_uploaded {
            return;
        }
        let Some(mask) = &self.mask else { return };
        if !mask.ready.get() {
            return;
        }
        match mask.upload(&self.gl, self.viewport) {
            Ok(()) => self.mask_uploaded = true,
            Err(e) => {
                log::warn!("backdrop: dropping text mask: {e}");
                self.mask = None;
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let gl = &self.gl;
        let u = *self.uniforms.borrow();
        gl.use_program(Some(&self.program));
        gl.uniform1f(self.loc.time.as_ref(), u.time);
        gl.uniform2f(self.loc.mouse.as_ref(), u.mouse.x, u.mouse.y);
        gl.uniform2f(self.loc.resolution.as_ref(), u.resolution.x, u.resolution.y);
        let (b, a) = (self.palette.base, self.palette.accent);
        gl.uniform3f(self.loc.base.as_ref(), b.x, b.y, b.z);
        gl.uniform3f(self.loc.accent.as_ref(), a.x, a.y, a.z);

        match self.variant {
            ShaderVariant::Grid => gl.uniform1f(self.loc.cells.as_ref(), self.palette.grid_cells),
            ShaderVariant::Blueprint => {
                let has_mask = self.mask_uploaded && self.mask.is_some();
                if let (true, Some(mask)) = (has_mask, &self.mask) {
                    gl.active_texture(GL::TEXTURE0);
                    gl.bind_texture(GL::TEXTURE_2D, Some(&mask.texture));
                }
                gl.uniform1i(self.loc.text_mask.as_ref(), 0);
                gl.uniform1f(self.loc.has_mask.as_ref(), if has_mask { 1.0 } else { 0.0 });
            }
        }

        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        render::fit(&self.gl, &self.canvas, viewport);
        let (w, h) = viewport.physical();
        self.uniforms.borrow_mut().resolution = Vec2::new(w as f32, h as f32);
        self.viewport = viewport;
        // redraw the mask at the new size on the next update
        self.mask_uploaded = false;
    }
}
