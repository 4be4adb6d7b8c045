#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, HtmlElement};

use folio_wasm::config::NavConfig;
use folio_wasm::nav;
use folio_wasm::wasm::mounts::{self, Mounts};
use folio_wasm::wasm::{dom, github};
use folio_wasm::SiteError;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn count(document: &Document, selector: &str) -> u32 {
    document.query_selector_all(selector).unwrap().length()
}

#[wasm_bindgen_test]
fn shared_chrome_is_injected_once() {
    let document = document();
    let cfg = NavConfig::default();

    dom::inject_shared(&document, &cfg).unwrap();
    let again = dom::inject_shared(&document, &cfg).unwrap();

    assert!(!again, "second injection should be a no-op");
    assert_eq!(count(&document, &format!("#{}", nav::NAVBAR_ID)), 1);
    assert_eq!(count(&document, "footer"), 1);
}

#[wasm_bindgen_test]
fn only_matching_link_is_active() {
    let document = document();
    let cfg = NavConfig::default();
    dom::inject_shared(&document, &cfg).unwrap();

    let active = |path: &str| -> Vec<String> {
        dom::mark_active(&document, path, &cfg.links);
        let nodes = document
            .query_selector_all(&format!(".{}.{}", nav::NAV_LINK_CLASS, nav::ACTIVE_CLASS))
            .unwrap();
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .filter_map(|el| el.get_attribute("data-page"))
            .collect()
    };

    assert_eq!(active("/pages/about.html"), ["about"]);
    assert_eq!(active("/"), [nav::HOME_PAGE]);
}

fn div(document: &Document) -> HtmlElement {
    document.create_element("div").unwrap().dyn_into::<HtmlElement>().unwrap()
}

#[wasm_bindgen_test]
fn bare_page_binds_without_mounts() {
    let mounts = Mounts::bind(&document());

    assert!(mounts.body.is_some());
    assert!(mounts.tornado.is_none());
    assert!(mounts.backdrop.is_none());
    assert!(mounts.mandala.is_none());
    assert!(mounts.projects.is_none());
    assert!(mounts.profile.is_none());
    assert!(mounts.cursor.is_none());
}

#[wasm_bindgen_test]
fn scrolling_marks_navbar_and_sets_progress() {
    let window = web_sys::window().unwrap();
    let document = document();
    let cfg = NavConfig { scroll_threshold: -1.0, ..NavConfig::default() };
    dom::inject_shared(&document, &cfg).unwrap();

    let bar = div(&document);
    bar.set_id(mounts::PROGRESS_ID);
    document.body().unwrap().append_child(&bar).unwrap();

    let mounts = Mounts::bind(&document);
    assert!(mounts.progress.is_some());
    dom::install_effects(&window, &document, &mounts, &cfg);
    window.dispatch_event(&Event::new("scroll").unwrap()).unwrap();

    let navbar = document.get_element_by_id(nav::NAVBAR_ID).unwrap();
    assert!(navbar.class_list().contains(nav::SCROLLED_CLASS));
    assert_eq!(bar.style().get_property_value("width").unwrap(), "0%");

    bar.remove();
    navbar.class_list().remove_1(nav::SCROLLED_CLASS).unwrap();
}

#[wasm_bindgen_test]
fn failed_repo_fetch_keeps_existing_cards() {
    let window = web_sys::window().unwrap();
    let container = div(&document());
    container.set_inner_html("<p class=\"placeholder\">Loading projects</p>");

    let failure = SiteError::Fetch {
        url: "https://api.github.com/users/someone/repos".into(),
        reason: "HTTP 500".into(),
    };
    github::render_repos(&window, &container, Err(failure));

    assert_eq!(container.inner_html(), "<p class=\"placeholder\">Loading projects</p>");
}

#[wasm_bindgen_test]
fn failed_profile_fetch_keeps_profile_card() {
    let window = web_sys::window().unwrap();
    let document = document();
    let card = div(&document);
    card.set_inner_html("placeholder");
    let mounts = Mounts { profile: Some(card.clone()), ..Mounts::bind(&document) };

    let failure = SiteError::Fetch {
        url: "https://api.github.com/users/someone".into(),
        reason: "HTTP 404".into(),
    };
    github::render_profile(&window, &mounts, Err(failure));

    assert_eq!(card.inner_html(), "placeholder");
}
