//! Offscreen bloom chain for the tornado: scene target, bright pass, two
//! blur passes at half resolution, composite to the canvas.

use web_sys::{
    WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlProgram, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::render;
use crate::config::BloomConfig;
use crate::error::{Result, SiteError};
use crate::frame::Viewport;
use crate::shader::bloom::{self, BLUR_TAPS};
use crate::shader::glsl;

/// A color texture with a framebuffer rendering into it.
struct Target {
    fbo: WebGlFramebuffer,
    texture: WebGlTexture,
    size: (i32, i32),
}

impl Target {
    fn new(gl: &GL) -> Result<Self> {
        let fbo = gl
            .create_framebuffer()
            .ok_or_else(|| SiteError::Graphics("create_framebuffer returned null".into()))?;
        let texture = gl
            .create_texture()
            .ok_or_else(|| SiteError::Graphics("create_texture returned null".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        gl.bind_texture(GL::TEXTURE_2D, None);
        Ok(Self { fbo, texture, size: (0, 0) })
    }

    fn resize(&mut self, gl: &GL, width: u32, height: u32) -> Result<()> {
        let size = (width as i32, height as i32);
        if size == self.size {
            return Ok(());
        }
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            size.0,
            size.1,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        )?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.fbo));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&self.texture),
            0,
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.bind_texture(GL::TEXTURE_2D, None);
        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(SiteError::Graphics(format!("framebuffer incomplete: 0x{status:x}")));
        }
        self.size = size;
        Ok(())
    }

    fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.fbo));
        gl.viewport(0, 0, self.size.0, self.size.1);
    }
}

struct Pass {
    program: WebGlProgram,
    inputs: Vec<Option<WebGlUniformLocation>>,
}

impl Pass {
    fn new(gl: &GL, fragment: &str, inputs: &[&str]) -> Result<Self> {
        let program = render::program(gl, glsl::FULLSCREEN_VS, fragment)?;
        let inputs = inputs.iter().map(|name| render::uniform(gl, &program, name)).collect();
        Ok(Self { program, inputs })
    }

    fn uniform(&self, gl: &GL, name: &str) -> Option<WebGlUniformLocation> {
        render::uniform(gl, &self.program, name)
    }

    /// Bind `textures` to units 0.. and draw the full-screen triangle.
    fn run(&self, gl: &GL, vao: &WebGlVertexArrayObject, textures: &[&WebGlTexture]) {
        for (unit, (texture, loc)) in textures.iter().zip(&self.inputs).enumerate() {
            gl.active_texture(GL::TEXTURE0 + unit as u32);
            gl.bind_texture(GL::TEXTURE_2D, Some(texture));
            gl.uniform1i(loc.as_ref(), unit as i32);
        }
        gl.bind_vertex_array(Some(vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }
}

pub struct Bloom {
    settings: BloomConfig,
    weights: [f32; BLUR_TAPS],
    scene: Target,
    ping: Target,
    pong: Target,
    bright: Pass,
    blur: Pass,
    composite: Pass,
    vao: WebGlVertexArrayObject,
    screen: (i32, i32),
}

impl Bloom {
    pub fn new(gl: &GL, settings: BloomConfig) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SiteError::Graphics("create_vertex_array returned null".into()))?;
        Ok(Self {
            settings,
            weights: bloom::gaussian_weights(bloom::blur_sigma(settings.radius)),
            scene: Target::new(gl)?,
            ping: Target::new(gl)?,
            pong: Target::new(gl)?,
            bright: Pass::new(gl, glsl::BRIGHT_FS, &["uScene"])?,
            blur: Pass::new(gl, &glsl::blur_fs(), &["uSource"])?,
            composite: Pass::new(gl, glsl::COMPOSITE_FS, &["uScene", "uBloom"])?,
            vao,
            screen: (1, 1),
        })
    }

    /// Reallocate the targets for a new canvas size.
    pub fn resize(&mut self, gl: &GL, viewport: Viewport) -> Result<()> {
        let (w, h) = viewport.physical();
        let (bw, bh) = bloom::blur_size(w, h);
        self.scene.resize(gl, w, h)?;
        self.ping.resize(gl, bw, bh)?;
        self.pong.resize(gl, bw, bh)?;
        self.screen = (w as i32, h as i32);
        Ok(())
    }

    /// Redirect drawing into the offscreen scene target.
    pub fn begin(&self, gl: &GL) {
        self.scene.bind(gl);
    }

    /// Run the post chain and draw the result to the canvas.
    pub fn finish(&self, gl: &GL) {
        gl.disable(GL::BLEND);

        self.ping.bind(gl);
        gl.use_program(Some(&self.bright.program));
        gl.uniform1f(self.bright.uniform(gl, "uThreshold").as_ref(), self.settings.threshold);
        gl.uniform1f(self.bright.uniform(gl, "uKnee").as_ref(), bloom::KNEE);
        self.bright.run(gl, &self.vao, &[&self.scene.texture]);

        let (bw, bh) = self.ping.size;
        let texel = (1.0 / bw.max(1) as f32, 1.0 / bh.max(1) as f32);
        gl.use_program(Some(&self.blur.program));
        let step = self.blur.uniform(gl, "uStep");
        gl.uniform1fv_with_f32_array(self.blur.uniform(gl, "uWeights").as_ref(), &self.weights);

        self.pong.bind(gl);
        gl.uniform2f(step.as_ref(), texel.0, 0.0);
        self.blur.run(gl, &self.vao, &[&self.ping.texture]);

        self.ping.bind(gl);
        gl.uniform2f(step.as_ref(), 0.0, texel.1);
        self.blur.run(gl, &self.vao, &[&self.pong.texture]);

        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(0, 0, self.screen.0, self.screen.1);
        gl.use_program(Some(&self.composite.program));
        gl.uniform1f(self.composite.uniform(gl, "uStrength").as_ref(), self.settings.strength);
        gl.uniform1f(self.composite.uniform(gl, "uExposure").as_ref(), self.settings.exposure);
        self.composite
            .run(gl, &self.vao, &[&self.scene.texture, &self.ping.texture]);
        gl.active_texture(GL::TEXTURE0);
    }
}
