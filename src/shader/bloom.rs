//! Bloom post-process: bright pass, separable Gaussian blur at half
//! resolution, then an additive composite with Reinhard tone mapping.
//!
//! The blur weights computed here are uploaded as-is to the blur shader.

use glam::Vec3;

use super::noise::smoothstep;
use super::Rgb;
use crate::config::BloomConfig;

/// Taps on each side of the center sample, center included.
pub const BLUR_TAPS: usize = 9;

/// Width of the soft knee above the threshold.
pub const KNEE: f32 = 0.01;

const LUMA: Vec3 = Vec3::new(0.299, 0.587, 0.114);

pub fn luminance(c: Rgb) -> f32 {
    c.dot(LUMA)
}

/// Keep only the pixels brighter than `threshold`.
pub fn bright_pass(c: Rgb, threshold: f32) -> Rgb {
    c * smoothstep(threshold, threshold + KNEE, luminance(c))
}

/// Blur standard deviation, in half-resolution texels, for a `radius` in
/// `[0, 1]`.
pub fn blur_sigma(radius: f32) -> f32 {
    1.0 + radius.clamp(0.0, 1.0) * 4.0
}

/// One-sided Gaussian weights; `w[0]` is the center. Normalized so the full
/// symmetric kernel (`w[0] + 2 * sum(w[1..])`) sums to one.
pub fn gaussian_weights(sigma: f32) -> [f32; BLUR_TAPS] {
    let sigma = sigma.max(1e-3);
    let mut w: [f32; BLUR_TAPS] =
        std::array::from_fn(|i| (-(i as f32).powi(2) / (2.0 * sigma * sigma)).exp());
    let total = w[0] + 2.0 * w[1..].iter().sum::<f32>();
    for v in &mut w {
        *v /= total;
    }
    w
}

pub fn reinhard(c: Rgb, exposure: f32) -> Rgb {
    let c = c * exposure.max(0.0);
    c / (Vec3::ONE + c)
}

/// Final color of one pixel from the scene and its blurred highlights.
pub fn composite(scene: Rgb, bloom: Rgb, settings: &BloomConfig) -> Rgb {
    reinhard(scene + bloom * settings.strength, settings.exposure)
}

/// Size of the blur targets for a `width` x `height` scene.
pub fn blur_size(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_pixels_do_not_glow() {
        assert_eq!(bright_pass(Vec3::splat(0.1), 0.2), Vec3::ZERO);
        let gold = Vec3::new(0.83, 0.69, 0.22);
        assert_eq!(bright_pass(gold, 0.2), gold);
    }

    #[test]
    fn kernel_sums_to_one_and_falls_off() {
        for radius in [0.0, 0.5, 1.0] {
            let w = gaussian_weights(blur_sigma(radius));
            let total = w[0] + 2.0 * w[1..].iter().sum::<f32>();
            assert!((total - 1.0).abs() < 1e-5);
            assert!(w.windows(2).all(|p| p[0] >= p[1]));
        }
    }

    #[test]
    fn composite_adds_glow_and_stays_below_white() {
        let settings = BloomConfig::default();
        let scene = Vec3::new(0.4, 0.3, 0.1);
        let plain = composite(scene, Vec3::ZERO, &settings);
        let lit = composite(scene, Vec3::ONE, &settings);
        assert!(lit.cmpgt(plain).all());
        assert!(composite(Vec3::splat(50.0), Vec3::splat(50.0), &settings).cmplt(Vec3::ONE).all());
    }

    #[test]
    fn blur_targets_are_half_size_and_never_empty() {
        assert_eq!(blur_size(1920, 1080), (960, 540));
        assert_eq!(blur_size(1, 1), (1, 1));
    }
}
