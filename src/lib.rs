//! Portfolio site runtime: shared page chrome, GitHub project cards and the
//! animated backgrounds, compiled to WebAssembly.
//!
//! The animation and markup logic is plain Rust and builds (and tests) on
//! the host; the browser bindings live in [`wasm`] and only compile for
//! `wasm32`.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod camera;
pub mod config;
pub mod curve;
pub mod effects;
pub mod error;
pub mod field;
pub mod frame;
pub mod github;
pub mod mandala;
pub mod markup;
pub mod nav;
pub mod shader;

pub use error::{Result, SiteError};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use wasm_bindgen::prelude::*;

    use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
    use crate::frame::FrameDriver;

    pub mod backdrop;
    pub mod bloom;
    pub mod dom;
    pub mod github;
    pub mod mandala;
    pub mod mounts;
    pub mod render;
    pub mod scheduler;
    pub mod tornado;

    use mounts::Mounts;

    fn read_config(document: &web_sys::Document) -> crate::Result<SiteConfig> {
        match document.get_element_by_id(CONFIG_ELEMENT_ID) {
            Some(el) => SiteConfig::from_json(&el.text_content().unwrap_or_default()),
            None => Ok(SiteConfig::default()),
        }
    }

    fn seed(fixed: Option<u64>) -> u64 {
        fixed.unwrap_or_else(|| js_sys::Date::now() as u64)
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let config = read_config(&document);
        let level = config.as_ref().map(SiteConfig::log_level).unwrap_or(log::Level::Info);
        console_log::init_with_level(level).ok();
        let config = config.unwrap_or_else(|e| {
            log::warn!("ignoring site config: {e}");
            SiteConfig::default()
        });

        let mounts = Mounts::bind(&document);

        if let Err(e) = dom::inject_shared(&document, &config.nav) {
            log::warn!("shared chrome not injected: {e}");
        }
        dom::refresh_icons(&window);
        match window.location().pathname() {
            Ok(path) => dom::mark_active(&document, &path, &config.nav.links),
            Err(e) => log::warn!("no location path; nav left unmarked: {e:?}"),
        }
        dom::install_effects(&window, &document, &mounts, &config.nav);

        let mut driver = FrameDriver::new(scheduler::viewport(&window));

        if let Some(container) = &mounts.tornado {
            let width = scheduler::viewport(&window).width;
            if width <= config.tornado.min_width {
                log::info!("tornado: skipped on narrow viewport ({width}px)");
            } else {
                let mut rng = SmallRng::seed_from_u64(seed(config.tornado.seed));
                match tornado::TornadoScene::new(&document, container, &config.tornado, &mut rng) {
                    Ok(scene) => driver.push(Box::new(scene)),
                    Err(e) => log::warn!("tornado: disabled: {e}"),
                }
            }
        }

        if let Some(canvas) = &mounts.backdrop {
            match backdrop::BackdropScene::new(&window, canvas.clone(), &config.shader) {
                Ok(scene) => driver.push(Box::new(scene)),
                Err(e) => log::warn!("backdrop: disabled: {e}"),
            }
        }

        if let Some(container) = &mounts.mandala {
            let seed = seed(config.mandala.seed);
            match mandala::MandalaScene::new(&document, container, config.mandala.clone(), seed) {
                Ok(scene) => driver.push(Box::new(scene)),
                Err(e) => log::warn!("mandala: disabled: {e}"),
            }
        }

        if driver.is_empty() {
            log::debug!("no background mounts on this page");
        } else {
            log::info!("starting frame loop with {} scene(s)", driver.len());
            if let Err(e) = scheduler::run(&window, driver) {
                log::error!("frame loop not started: {e}");
            }
        }

        wasm_bindgen_futures::spawn_local(github::load(window, config.github.clone(), mounts));
        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
