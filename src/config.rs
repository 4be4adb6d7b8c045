//! Site configuration.
//!
//! Every field has a default matching the published site, so an empty JSON
//! object (or no config block at all) yields a working page. A page can
//! override any subset through an inline
//! `<script type="application/json" id="site-config">` block.

use serde::Deserialize;

use crate::error::{Result, SiteError};
use crate::github::RepoSource;

/// Element id of the inline JSON configuration block.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub log_level: String,
    pub nav: NavConfig,
    pub tornado: TornadoConfig,
    pub shader: ShaderConfig,
    pub mandala: MandalaConfig,
    pub github: GitHubConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            nav: NavConfig::default(),
            tornado: TornadoConfig::default(),
            shader: ShaderConfig::default(),
            mandala: MandalaConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON document. Whitespace-only input is
    /// treated as "use defaults".
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|e| SiteError::Config(e.to_string()))
    }

    /// Requested log level; unknown names fall back to `Info`.
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

/// One entry of the shared navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    /// Value of the `data-page` attribute; `home` is special-cased for root paths.
    pub page: String,
}

impl NavLink {
    fn new(label: &str, href: &str, page: &str) -> Self {
        Self { label: label.into(), href: href.into(), page: page.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub brand: String,
    pub links: Vec<NavLink>,
    pub contact_href: String,
    pub footer_blurb: String,
    pub owner: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub twitter_url: String,
    /// Vertical scroll (px) past which the navbar gets the `scrolled` class.
    pub scroll_threshold: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            brand: "DVP".into(),
            links: vec![
                NavLink::new("Home", "/", "home"),
                NavLink::new("About", "/pages/about.html", "about"),
                NavLink::new("Projects", "/pages/projects.html", "projects"),
                NavLink::new("Open Source", "/pages/open-source.html", "os"),
            ],
            contact_href: "/pages/contact.html".into(),
            footer_blurb: "ADHD Computer Science Student specializing in AI architectures and low-level system engineering.".into(),
            owner: "Devansh".into(),
            github_url: "https://github.com/devanshvpurohit".into(),
            linkedin_url: "#".into(),
            twitter_url: "#".into(),
            scroll_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TornadoConfig {
    pub major_radius: f32,
    pub minor_radius: f32,
    pub strand_count: usize,
    pub segments: usize,
    /// Minor-angle turns per major-angle radian.
    pub revolutions: f32,
    /// Minor-angle drift per second for strands.
    pub strand_rate: f32,
    pub particle_count: usize,
    /// Minor-angle drift per second for particles.
    pub particle_rate: f32,
    /// Viewports at or below this width skip the scene entirely.
    pub min_width: f64,
    pub color: [f32; 3],
    pub strand_alpha: f32,
    pub particle_opacity: f32,
    pub particle_size: f32,
    /// Fixed RNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    pub bloom: BloomConfig,
}

/// Glow post-process applied to the tornado.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    /// Weight of the blurred highlights added back onto the scene.
    pub strength: f32,
    /// Blur spread, 0 to 1.
    pub radius: f32,
    /// Luminance a pixel needs before it glows.
    pub threshold: f32,
    /// Reinhard tone-mapping exposure.
    pub exposure: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self { enabled: true, strength: 0.5, radius: 0.5, threshold: 0.2, exposure: 1.0 }
    }
}

impl Default for TornadoConfig {
    fn default() -> Self {
        Self {
            major_radius: 0.9,
            minor_radius: 0.8,
            strand_count: 60,
            segments: 1000,
            revolutions: 0.4,
            strand_rate: 0.4,
            particle_count: 3000,
            particle_rate: 0.2,
            min_width: 768.0,
            color: [0.83, 0.69, 0.22],
            strand_alpha: 0.2,
            particle_opacity: 0.12,
            particle_size: 2.0,
            seed: None,
            bloom: BloomConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderVariant {
    /// Turbulent noise bands with an optional text mask.
    Blueprint,
    /// Antialiased grid with a HUD ring around the pointer.
    Grid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub variant: ShaderVariant,
    pub base_color: [f32; 3],
    pub accent_color: [f32; 3],
    /// Text rendered into the mask texture; empty disables the mask.
    pub text: String,
    pub font: String,
    /// Grid cells across the shorter screen axis.
    pub grid_cells: f32,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            variant: ShaderVariant::Blueprint,
            base_color: [0.02, 0.03, 0.06],
            accent_color: [0.83, 0.69, 0.22],
            text: String::new(),
            font: "bold 160px 'Space Grotesk', sans-serif".into(),
            grid_cells: 24.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MandalaConfig {
    pub color: [u8; 3],
    /// Animation time advanced per frame.
    pub time_step: f32,
    /// Alpha (0-255) of the black wash that leaves trails.
    pub trail_alpha: u8,
    /// Sparks are emitted from the outer hexagon every this many frames.
    pub spark_interval: u64,
    /// Per-frame probability of a new energy arc.
    pub arc_chance: f32,
    pub seed: Option<u64>,
}

impl Default for MandalaConfig {
    fn default() -> Self {
        Self {
            color: [197, 160, 89],
            time_step: 0.008,
            trail_alpha: 20,
            spark_interval: 6,
            arc_chance: 0.05,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub username: String,
    pub api_base: String,
    pub repos: RepoSource,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: "devanshvpurohit".into(),
            api_base: "https://api.github.com".into(),
            repos: RepoSource::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let cfg = SiteConfig::from_json("  ").unwrap();
        assert_eq!(cfg.tornado.strand_count, 60);
        assert_eq!(cfg.nav.links.len(), 4);
        assert_eq!(cfg.log_level(), log::Level::Info);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteConfig::from_json(
            r#"{ "tornado": { "strand_count": 8 }, "shader": { "variant": "grid" }, "log_level": "debug" }"#,
        )
        .unwrap();
        assert_eq!(cfg.tornado.strand_count, 8);
        assert_eq!(cfg.tornado.segments, 1000);
        assert_eq!(cfg.shader.variant, ShaderVariant::Grid);
        assert_eq!(cfg.log_level(), log::Level::Debug);
    }

    #[test]
    fn named_repo_source_parses() {
        let cfg = SiteConfig::from_json(
            r#"{ "github": { "repos": { "kind": "named", "names": ["a", "b"] } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.github.repos, RepoSource::Named { names: vec!["a".into(), "b".into()] });
    }

    #[test]
    fn partial_repo_listing_keeps_the_rest_of_the_config() {
        let cfg = SiteConfig::from_json(
            r#"{ "tornado": { "strand_count": 8 }, "github": { "repos": { "kind": "listing", "per_page": 5 } } }"#,
        )
        .unwrap();
        assert_eq!(cfg.tornado.strand_count, 8);
        assert_eq!(
            cfg.github.repos,
            RepoSource::Listing { sort: "created".into(), direction: "asc".into(), per_page: 5 }
        );
    }

    #[test]
    fn bloom_can_be_switched_off_alone() {
        let cfg = SiteConfig::from_json(r#"{ "tornado": { "bloom": { "enabled": false } } }"#).unwrap();
        assert!(!cfg.tornado.bloom.enabled);
        assert_eq!(cfg.tornado.bloom.threshold, 0.2);
        assert_eq!(cfg.tornado.bloom.strength, 0.5);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cfg = SiteConfig { log_level: "loud".into(), ..SiteConfig::default() };
        assert_eq!(cfg.log_level(), log::Level::Info);
    }
}
