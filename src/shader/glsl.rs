//! GLSL ES 3.00 sources for the WebGL2 back end.
//!
//! Keep these in lockstep with the Rust reference in [`super`].

/// Full-screen triangle; no vertex buffer needed (`gl_VertexID` driven).
pub const FULLSCREEN_VS: &str = r#"#version 300 es
out vec2 vUv;
void main() {
    vec2 pos = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    vUv = pos;
    gl_Position = vec4(pos * 2.0 - 1.0, 0.0, 1.0);
}
"#;

const HEADER: &str = r#"#version 300 es
precision highp float;
in vec2 vUv;
out vec4 outColor;
uniform float uTime;
uniform vec2 uMouse;
uniform vec2 uResolution;
uniform vec3 uBase;
uniform vec3 uAccent;
"#;

const NOISE_GLSL: &str = r#"
float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.547);
}
float valueNoise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = p - i;
    vec2 u = f * f * (3.0 - 2.0 * f);
    float a = hash(i);
    float b = hash(i + vec2(1.0, 0.0));
    float c = hash(i + vec2(0.0, 1.0));
    float d = hash(i + vec2(1.0, 1.0));
    return mix(mix(a, b, u.x), mix(c, d, u.x), u.y);
}
float fbm(vec2 p) {
    float sum = 0.0;
    float amp = 0.5;
    float norm = 0.0;
    for (int i = 0; i < 5; i++) {
        sum += amp * valueNoise(p);
        norm += amp;
        p = vec2(0.8 * p.x - 0.6 * p.y, 0.6 * p.x + 0.8 * p.y) * 2.02;
        amp *= 0.5;
    }
    return sum / norm;
}
"#;

const BLUEPRINT_MAIN: &str = r#"
uniform sampler2D uTextMask;
uniform float uHasMask;

vec2 centered(vec2 uv, float aspect) {
    return vec2((uv.x - 0.5) * aspect, uv.y - 0.5) * 3.0;
}

void main() {
    float aspect = uResolution.x / max(uResolution.y, 1.0);
    vec2 p = centered(vUv, aspect);
    float d = distance(p, centered(uMouse, aspect));
    float pull = exp(-d * d * 1.5);
    float t = uTime;

    vec2 q = vec2(fbm(p + vec2(t * 0.05)), fbm(p + vec2(5.2, 1.3) - vec2(t * 0.04)));
    float n = fbm(p + 2.0 * q + vec2(pull * 0.6 + t * 0.1));

    float width = 0.06 + 0.06 * pull;
    float nearest = 0.5 - abs(fract(n * 12.0) - 0.5);
    float line = (1.0 - smoothstep(0.0, width, nearest)) * mix(0.25, 1.0, pull);

    float text = uHasMask * texture(uTextMask, vec2(vUv.x, 1.0 - vUv.y)).a;
    float mask = max(line, clamp(text, 0.0, 1.0));
    outColor = vec4(mix(uBase, uAccent, mask), 1.0);
}
"#;

const GRID_MAIN: &str = r#"
uniform float uCells;

float gridLines(vec2 coord) {
    vec2 fw = max(fwidth(coord), vec2(1e-6));
    vec2 g = abs(fract(coord - 0.5) - 0.5) / fw;
    return 1.0 - min(min(g.x, g.y), 1.0);
}

void main() {
    float aspect = uResolution.x / max(uResolution.y, 1.0);
    vec2 coord = vec2(vUv.x * aspect, vUv.y) * uCells;
    float minor = gridLines(coord);
    float major = gridLines(coord / 4.0);

    vec2 delta = vec2((vUv.x - uMouse.x) * aspect, vUv.y - uMouse.y);
    float d = length(delta);
    float px = 1.5 / max(uResolution.y, 1.0);
    float radius = 0.12 + 0.01 * sin(uTime * 2.0);
    float ring = 1.0 - smoothstep(0.0, px * 2.0, abs(d - radius));

    float angle = atan(delta.y, delta.x);
    float tickBand = 1.0 - smoothstep(0.0, 0.012, abs(d - radius * 1.18));
    float ticks = smoothstep(0.8, 1.0, cos(angle * 24.0 + uTime)) * tickBand;

    float glow = min(minor * 0.25 + major * 0.4 + ring * 0.9 + ticks * 0.6, 1.0);
    outColor = vec4(mix(uBase, uAccent, glow), 1.0);
}
"#;

/// Fragment source for the noise-band variant.
pub fn blueprint_fs() -> String {
    [HEADER, NOISE_GLSL, BLUEPRINT_MAIN].concat()
}

/// Fragment source for the grid/HUD variant.
pub fn grid_fs() -> String {
    [HEADER, GRID_MAIN].concat()
}

/// Strand lines: world-space fade plus the |x|, |z| <= 1 clip box.
pub const STRAND_VS: &str = r#"#version 300 es
in vec3 aPosition;
uniform mat4 uModel;
uniform mat4 uViewProj;
uniform float uPointSize;
out vec3 vLocal;
out vec3 vWorld;
void main() {
    vec4 world = uModel * vec4(aPosition, 1.0);
    vLocal = aPosition;
    vWorld = world.xyz;
    gl_PointSize = uPointSize;
    gl_Position = uViewProj * world;
}
"#;

pub const STRAND_FS: &str = r#"#version 300 es
precision highp float;
in vec3 vLocal;
in vec3 vWorld;
out vec4 outColor;
uniform vec3 uColor;
uniform float uAlpha;
uniform float uFade;
void main() {
    if (abs(vWorld.x) > 1.0 || abs(vWorld.z) > 1.0) discard;
    float fromCenter = length(vLocal.xz);
    float fade = 1.0 - smoothstep(0.6, 0.9, fromCenter / 0.9);
    float zFade = 1.0 - smoothstep(0.4, 0.8, abs(vLocal.z));
    float xFade = 1.0 - smoothstep(0.4, 0.8, abs(vLocal.x));
    float shaped = mix(1.0, fade * zFade * xFade, uFade);
    outColor = vec4(uColor, shaped * uAlpha);
}
"#;

/// Bloom bright pass; mirrors [`super::bloom::bright_pass`].
pub const BRIGHT_FS: &str = r#"#version 300 es
precision highp float;
in vec2 vUv;
out vec4 outColor;
uniform sampler2D uScene;
uniform float uThreshold;
uniform float uKnee;
void main() {
    vec3 c = texture(uScene, vUv).rgb;
    float luma = dot(c, vec3(0.299, 0.587, 0.114));
    outColor = vec4(c * smoothstep(uThreshold, uThreshold + uKnee, luma), 1.0);
}
"#;

/// One direction of the separable Gaussian blur.
pub fn blur_fs() -> String {
    format!(
        r#"#version 300 es
precision highp float;
in vec2 vUv;
out vec4 outColor;
uniform sampler2D uSource;
uniform vec2 uStep;
uniform float uWeights[{taps}];
void main() {{
    vec3 sum = texture(uSource, vUv).rgb * uWeights[0];
    for (int i = 1; i < {taps}; i++) {{
        vec2 offset = uStep * float(i);
        sum += texture(uSource, vUv + offset).rgb * uWeights[i];
        sum += texture(uSource, vUv - offset).rgb * uWeights[i];
    }}
    outColor = vec4(sum, 1.0);
}}
"#,
        taps = super::bloom::BLUR_TAPS
    )
}

/// Scene plus blurred highlights, tone mapped; mirrors
/// [`super::bloom::composite`].
pub const COMPOSITE_FS: &str = r#"#version 300 es
precision highp float;
in vec2 vUv;
out vec4 outColor;
uniform sampler2D uScene;
uniform sampler2D uBloom;
uniform float uStrength;
uniform float uExposure;
void main() {
    vec3 c = texture(uScene, vUv).rgb + texture(uBloom, vUv).rgb * uStrength;
    c *= max(uExposure, 0.0);
    outColor = vec4(c / (1.0 + c), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_sources_start_with_version_directive() {
        for src in [blueprint_fs(), grid_fs()] {
            assert!(src.starts_with("#version 300 es\n"));
            assert_eq!(src.matches("void main()").count(), 1);
        }
    }

    #[test]
    fn blur_kernel_size_matches_uploaded_weights() {
        let src = blur_fs();
        let taps = super::super::bloom::BLUR_TAPS;
        assert!(src.contains(&format!("uniform float uWeights[{taps}];")));
        assert!(src.contains(&format!("i < {taps};")));
        assert!(!src.contains("{{"));
    }

    #[test]
    fn grid_uses_derivatives_and_blueprint_samples_mask() {
        assert!(grid_fs().contains("fwidth("));
        assert!(blueprint_fs().contains("uTextMask"));
        assert!(!grid_fs().contains("uTextMask"));
    }
}
