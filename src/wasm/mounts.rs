use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};

pub const TORNADO_SELECTOR: &str = ".background-container";
pub const BACKDROP_ID: &str = "shader-bg";
pub const MANDALA_SELECTOR: &str = ".mandala-container";
pub const PROJECTS_ID: &str = "projects-container";
pub const PROFILE_ID: &str = "gh-profile";
pub const PROGRESS_ID: &str = "scroll-progress";
pub const CURSOR_SELECTOR: &str = ".cursor-glow";

/// Typed handles to every element the runtime writes into, resolved once at
/// startup. Absent mounts are `None` and their feature is skipped.
#[derive(Clone)]
pub struct Mounts {
    pub body: Option<HtmlElement>,
    pub tornado: Option<HtmlElement>,
    pub backdrop: Option<HtmlCanvasElement>,
    pub mandala: Option<HtmlElement>,
    pub projects: Option<HtmlElement>,
    pub profile: Option<HtmlElement>,
    pub progress: Option<HtmlElement>,
    pub cursor: Option<HtmlElement>,
}

fn html(el: Option<Element>, what: &str) -> Option<HtmlElement> {
    let el = el?;
    match el.dyn_into::<HtmlElement>() {
        Ok(el) => Some(el),
        Err(_) => {
            log::warn!("mount {what} is not an HTML element");
            None
        }
    }
}

fn by_selector(document: &Document, selector: &str) -> Option<HtmlElement> {
    html(document.query_selector(selector).ok().flatten(), selector)
}

fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    html(document.get_element_by_id(id), id)
}

impl Mounts {
    /// Never fails: every missing or mistyped mount is logged and left `None`.
    pub fn bind(document: &Document) -> Self {
        let body = document.body();
        if body.is_none() {
            log::warn!("mount body not found");
        }

        let backdrop = document.get_element_by_id(BACKDROP_ID).and_then(|el| {
            el.dyn_into::<HtmlCanvasElement>()
                .map_err(|_| log::warn!("#{BACKDROP_ID} is not a canvas"))
                .ok()
        });

        let mounts = Self {
            body,
            tornado: by_selector(document, TORNADO_SELECTOR),
            backdrop,
            mandala: by_selector(document, MANDALA_SELECTOR),
            projects: by_id(document, PROJECTS_ID),
            profile: by_id(document, PROFILE_ID),
            progress: by_id(document, PROGRESS_ID),
            cursor: by_selector(document, CURSOR_SELECTOR),
        };
        log::debug!(
            "mounts: tornado={} backdrop={} mandala={} projects={} profile={}",
            mounts.tornado.is_some(),
            mounts.backdrop.is_some(),
            mounts.mandala.is_some(),
            mounts.projects.is_some(),
            mounts.profile.is_some(),
        );
        mounts
    }
}
