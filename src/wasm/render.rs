//! WebGL2 plumbing shared by the GPU scenes.

use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::error::{Result, SiteError};
use crate::frame::Viewport;

pub fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
    let ctx = canvas
        .get_context("webgl2")?
        .ok_or_else(|| SiteError::Graphics("WebGL2 not supported".into()))?;
    ctx.dyn_into::<GL>()
        .map_err(|_| SiteError::Graphics("context is not WebGL2".into()))
}

pub fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SiteError::Graphics("create_shader returned null".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SiteError::ShaderCompile(log))
    }
}

/// Compile both stages and link them.
pub fn program(gl: &GL, vertex: &str, fragment: &str) -> Result<WebGlProgram> {
    let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or_else(|| SiteError::Graphics("create_program returned null".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // stages are owned by the program once linked
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(SiteError::ProgramLink(log))
    }
}

pub fn buffer(gl: &GL) -> Result<WebGlBuffer> {
    gl.create_buffer()
        .ok_or_else(|| SiteError::Graphics("create_buffer returned null".into()))
}

/// A vertex buffer plus a JS-side staging array reused every frame.
pub struct DynamicBuffer {
    pub buffer: WebGlBuffer,
    staging: Float32Array,
    len: usize,
}

impl DynamicBuffer {
    pub fn new(gl: &GL, len: usize) -> Result<Self> {
        let buffer = buffer(gl)?;
        let staging = Float32Array::new_with_length(len as u32);
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &staging, GL::DYNAMIC_DRAW);
        Ok(Self { buffer, staging, len })
    }

    /// Copy `data` into the staging array at float offset `at`.
    pub fn stage(&self, at: usize, data: &[f32]) {
        let end = (at + data.len()).min(self.len);
        if at >= end {
            return;
        }
        self.staging
            .subarray(at as u32, end as u32)
            .copy_from(&data[..end - at]);
    }

    /// Push the whole staging array to the GPU.
    pub fn flush(&self, gl: &GL) {
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.buffer));
        gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &self.staging);
    }
}

pub fn uniform(gl: &GL, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
    let loc = gl.get_uniform_location(program, name);
    if loc.is_none() {
        log::debug!("uniform {name} not active");
    }
    loc
}

/// Match the canvas backing store to the viewport and reset the GL viewport.
pub fn fit(gl: &GL, canvas: &HtmlCanvasElement, viewport: Viewport) {
    let (w, h) = viewport.physical();
    canvas.set_width(w);
    canvas.set_height(h);
    gl.viewport(0, 0, w as i32, h as i32);
}
