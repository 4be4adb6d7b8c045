//! Per-pixel background fields.
//!
//! The functions here are the CPU reference of the fragment shaders in
//! [`glsl`]: same constants, same operations. The browser runs the GLSL; the
//! Rust versions exist so the fields can be reasoned about (and tested)
//! without a GPU.
//!
//! Every term is built from continuous primitives (`smoothstep`, `mix`,
//! smooth noise, triangle waves) so the output never jumps as time or the
//! pointer moves.

pub mod bloom;
pub mod glsl;
pub mod noise;

use glam::{Vec2, Vec3};

use crate::config::{ShaderConfig, ShaderVariant};
use noise::{fbm, fract, mix, smoothstep};

pub type Rgb = Vec3;

/// Values uploaded as uniforms each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    /// Seconds since the scene started.
    pub time: f32,
    /// Pointer in uv space: origin bottom-left, `[0, 1]` on both axes.
    pub mouse: Vec2,
    /// Drawing-buffer size in pixels.
    pub resolution: Vec2,
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            mouse: Vec2::splat(0.5),
            resolution: Vec2::new(1.0, 1.0),
        }
    }
}

impl ShaderUniforms {
    /// Update the pointer from client coordinates (origin top-left).
    pub fn set_pointer(&mut self, client_x: f32, client_y: f32, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        self.mouse = Vec2::new(
            (client_x / viewport.x).clamp(0.0, 1.0),
            (1.0 - client_y / viewport.y).clamp(0.0, 1.0),
        );
    }

    fn aspect(&self) -> f32 {
        if self.resolution.y > 0.0 {
            self.resolution.x / self.resolution.y
        } else {
            1.0
        }
    }
}

/// Colors and scale shared by both variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub base: Rgb,
    pub accent: Rgb,
    pub grid_cells: f32,
}

impl From<&ShaderConfig> for Palette {
    fn from(cfg: &ShaderConfig) -> Self {
        Self {
            base: Vec3::from(cfg.base_color),
            accent: Vec3::from(cfg.accent_color),
            grid_cells: cfg.grid_cells,
        }
    }
}

const FIELD_SCALE: f32 = 3.0;
const BAND_DENSITY: f32 = 12.0;

/// Distance from `x` to the nearest integer, in `[0, 0.5]`.
#[inline]
fn to_nearest_int(x: f32) -> f32 {
    0.5 - (fract(x) - 0.5).abs()
}

/// Pointer attraction in `[0, 1]`, 1 under the cursor.
fn proximity(p: Vec2, m: Vec2) -> f32 {
    let d = p.distance(m);
    (-d * d * 1.5).exp()
}

fn centered(uv: Vec2, aspect: f32) -> Vec2 {
    Vec2::new((uv.x - 0.5) * aspect, uv.y - 0.5) * FIELD_SCALE
}

/// Band intensity of the noise field at `uv`, before the text mask.
pub fn noise_bands(uv: Vec2, u: &ShaderUniforms) -> f32 {
    let aspect = u.aspect();
    let p = centered(uv, aspect);
    let pull = proximity(p, centered(u.mouse, aspect));
    let t = u.time;

    let q = Vec2::new(
        fbm(p + Vec2::splat(t * 0.05)),
        fbm(p + Vec2::new(5.2, 1.3) - Vec2::splat(t * 0.04)),
    );
    let n = fbm(p + 2.0 * q + Vec2::splat(pull * 0.6 + t * 0.1));

    let width = 0.06 + 0.06 * pull;
    let line = 1.0 - smoothstep(0.0, width, to_nearest_int(n * BAND_DENSITY));
    line * mix(0.25, 1.0, pull)
}

/// Blueprint variant: noise bands max-blended with the text mask sample,
/// then used to mix base and accent.
pub fn blueprint(uv: Vec2, u: &ShaderUniforms, palette: &Palette, text_mask: f32) -> Rgb {
    let mask = noise_bands(uv, u).max(text_mask.clamp(0.0, 1.0));
    palette.base.lerp(palette.accent, mask)
}

/// Antialiased grid line coverage for `coord` whose per-pixel change is `fw`.
fn grid_lines(coord: Vec2, fw: Vec2) -> f32 {
    let fw = fw.max(Vec2::splat(1e-6));
    let g = Vec2::new(
        (fract(coord.x - 0.5) - 0.5).abs(),
        (fract(coord.y - 0.5) - 0.5).abs(),
    ) / fw;
    1.0 - g.x.min(g.y).min(1.0)
}

/// Grid variant. `footprint` is how much one pixel advances the grid
/// coordinate (what `fwidth` yields on the GPU).
pub fn grid(uv: Vec2, u: &ShaderUniforms, palette: &Palette, footprint: Vec2) -> Rgb {
    let aspect = u.aspect();
    let coord = Vec2::new(uv.x * aspect, uv.y) * palette.grid_cells;
    let minor = grid_lines(coord, footprint);
    let major = grid_lines(coord / 4.0, footprint / 4.0);

    // HUD ring around the pointer, measured in screen-height units
    let delta = Vec2::new((uv.x - u.mouse.x) * aspect, uv.y - u.mouse.y);
    let d = delta.length();
    let px = 1.5 / u.resolution.y.max(1.0);
    let radius = 0.12 + 0.01 * (u.time * 2.0).sin();
    let ring = 1.0 - smoothstep(0.0, px * 2.0, (d - radius).abs());

    let angle = delta.y.atan2(delta.x);
    let tick_band = 1.0 - smoothstep(0.0, 0.012, (d - radius * 1.18).abs());
    let ticks = smoothstep(0.8, 1.0, (angle * 24.0 + u.time).cos()) * tick_band;

    let glow = (minor * 0.25 + major * 0.4 + ring * 0.9 + ticks * 0.6).min(1.0);
    palette.base.lerp(palette.accent, glow)
}

/// Evaluate the configured variant. `text_mask` is ignored by the grid.
pub fn evaluate(
    variant: ShaderVariant,
    uv: Vec2,
    u: &ShaderUniforms,
    palette: &Palette,
    text_mask: f32,
) -> Rgb {
    match variant {
        ShaderVariant::Blueprint => blueprint(uv, u, palette, text_mask),
        ShaderVariant::Grid => {
            let footprint = Vec2::splat(palette.grid_cells / u.resolution.y.max(1.0));
            grid(uv, u, palette, footprint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms() -> ShaderUniforms {
        ShaderUniforms {
            time: 3.25,
            mouse: Vec2::new(0.4, 0.6),
            resolution: Vec2::new(1280.0, 720.0),
        }
    }

    fn palette() -> Palette {
        Palette::from(&ShaderConfig::default())
    }

    #[test]
    fn pointer_is_flipped_into_uv_space() {
        let mut u = ShaderUniforms::default();
        u.set_pointer(200.0, 150.0, Vec2::new(800.0, 600.0));
        assert!((u.mouse - Vec2::new(0.25, 0.75)).length() < 1e-6);
    }

    #[test]
    fn pointer_ignores_degenerate_viewport() {
        let mut u = ShaderUniforms::default();
        u.set_pointer(10.0, 10.0, Vec2::ZERO);
        assert_eq!(u.mouse, Vec2::splat(0.5));
    }

    #[test]
    fn full_text_mask_saturates_to_accent() {
        let p = palette();
        let c = blueprint(Vec2::new(0.3, 0.3), &uniforms(), &p, 1.0);
        assert!((c - p.accent).length() < 1e-6);
    }

    #[test]
    fn output_stays_between_base_and_accent() {
        let p = palette();
        let u = uniforms();
        for i in 0..50 {
            let uv = Vec2::new(i as f32 / 50.0, 1.0 - i as f32 / 70.0);
            for c in [blueprint(uv, &u, &p, 0.0), evaluate(ShaderVariant::Grid, uv, &u, &p, 0.0)] {
                for k in 0..3 {
                    let lo = p.base[k].min(p.accent[k]) - 1e-5;
                    let hi = p.base[k].max(p.accent[k]) + 1e-5;
                    assert!((lo..=hi).contains(&c[k]));
                }
            }
        }
    }

    #[test]
    fn ring_is_brightest_on_its_radius() {
        let p = palette();
        let mut u = uniforms();
        u.time = 0.0;
        u.mouse = Vec2::new(0.5, 0.5);
        let fw = Vec2::splat(1e-6);
        let on_ring = grid(Vec2::new(0.5, 0.62), &u, &p, fw);
        let inside = grid(Vec2::new(0.5, 0.56), &u, &p, fw);
        assert!(on_ring.distance(p.base) > inside.distance(p.base));
    }

    #[test]
    fn grid_lines_cover_integer_coordinates() {
        assert!((grid_lines(Vec2::new(3.0, 0.37), Vec2::splat(0.05)) - 1.0).abs() < 1e-5);
        assert_eq!(grid_lines(Vec2::new(3.5, 0.5), Vec2::splat(0.05)), 0.0);
    }
}
