//! Shared page chrome: navbar/footer injection, active link, scroll and
//! pointer effects.

use js_sys::{Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, MouseEvent, Window};

use super::mounts::Mounts;
use crate::config::{NavConfig, NavLink};
use crate::effects::{self, Magnet};
use crate::error::Result;
use crate::nav;

/// Insert the navbar and footer unless they are already on the page.
/// Returns whether anything was inserted.
pub fn inject_shared(document: &Document, cfg: &NavConfig) -> Result<bool> {
    let Some(body) = document.body() else {
        log::warn!("no <body>; skipping shared chrome");
        return Ok(false);
    };
    let mut inserted = false;

    if document.get_element_by_id(nav::NAVBAR_ID).is_none() {
        body.insert_adjacent_html("afterbegin", &nav::navbar_html(cfg))?;
        inserted = true;
    }
    if document.query_selector("footer")?.is_none() {
        let year = js_sys::Date::new_0().get_full_year();
        body.insert_adjacent_html("beforeend", &nav::footer_html(cfg, year))?;
        inserted = true;
    }
    Ok(inserted)
}

/// Re-run the icon substitution pass (`lucide.createIcons()`) if the icon
/// library is loaded.
pub fn refresh_icons(window: &Window) {
    let Ok(lucide) = Reflect::get(window, &JsValue::from_str("lucide")) else { return };
    if !lucide.is_object() {
        return;
    }
    let create = Reflect::get(&lucide, &JsValue::from_str("createIcons"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok());
    if let Some(create) = create {
        if let Err(e) = create.call0(&lucide) {
            log::warn!("icon refresh failed: {e:?}");
        }
    }
}

/// Mark exactly the nav entry matching `path` as active; clear the rest.
pub fn mark_active(document: &Document, path: &str, links: &[NavLink]) {
    let active = nav::active_link(path, links).map(|l| l.page.as_str());
    let Ok(nodes) = document.query_selector_all(&format!(".{}", nav::NAV_LINK_CLASS)) else {
        return;
    };
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let on = active.is_some() && el.get_attribute("data-page").as_deref() == active;
        if let Err(e) = el.class_list().toggle_with_force(nav::ACTIVE_CLASS, on) {
            log::debug!("class toggle failed: {e:?}");
        }
    }
}

/// Scroll, magnetic and cursor effects. Listeners live as long as the page.
/// Each effect is installed on its own; one failing is logged and skipped.
pub fn install_effects(window: &Window, document: &Document, mounts: &Mounts, cfg: &NavConfig) {
    if let Err(e) = install_scroll(window, document, mounts, cfg.scroll_threshold) {
        log::warn!("scroll effects disabled: {e}");
    }
    if let Err(e) = install_magnets(document) {
        log::warn!("magnetic effects disabled: {e}");
    }
    if let (Some(glow), Some(body)) = (&mounts.cursor, &mounts.body) {
        if let Err(e) = install_cursor(document, body, glow) {
            log::warn!("cursor glow disabled: {e}");
        }
    }
}

fn install_scroll(
    window: &Window,
    document: &Document,
    mounts: &Mounts,
    threshold: f64,
) -> Result<()> {
    let navbar = document.get_element_by_id(nav::NAVBAR_ID);
    let progress = mounts.progress.clone();
    let root = document.document_element();
    let win = window.clone();

    let on_scroll = Closure::wrap(Box::new(move || {
        let y = win.scroll_y().unwrap_or(0.0);
        if let Some(navbar) = &navbar {
            navbar
                .class_list()
                .toggle_with_force(nav::SCROLLED_CLASS, nav::is_scrolled(y, threshold))
                .ok();
        }
        if let (Some(bar), Some(root)) = (&progress, &root) {
            let pct = nav::scroll_progress(
                root.scroll_top() as f64,
                root.scroll_height() as f64,
                root.client_height() as f64,
            );
            bar.style().set_property("width", &format!("{pct}%")).ok();
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

fn install_magnets(document: &Document) -> Result<()> {
    let nodes = document.query_selector_all(effects::MAGNETIC_SELECTOR)?;
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let magnet = if el.class_list().contains(effects::CARD_CLASS) {
            Magnet::Card
        } else {
            Magnet::Control
        };

        let on_move = {
            let el = el.clone();
            Closure::wrap(Box::new(move |e: MouseEvent| {
                let rect = el.get_bounding_client_rect();
                let (dx, dy) = effects::center_offset(
                    (e.client_x() as f64, e.client_y() as f64),
                    rect.left(),
                    rect.top(),
                    rect.width(),
                    rect.height(),
                );
                el.style()
                    .set_property("transform", &effects::magnetic_transform(dx, dy, magnet))
                    .ok();
            }) as Box<dyn FnMut(MouseEvent)>)
        };
        let on_leave = {
            let el = el.clone();
            Closure::wrap(Box::new(move || {
                el.style().set_property("transform", "").ok();
            }) as Box<dyn FnMut()>)
        };
        el.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        el.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
        on_move.forget();
        on_leave.forget();
    }
    Ok(())
}

fn install_cursor(document: &Document, body: &HtmlElement, glow: &HtmlElement) -> Result<()> {
    let follower = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| crate::SiteError::Js("div is not an HtmlElement".into()))?;
    follower.set_class_name("cursor-follower");
    body.append_child(&follower)?;

    let on_move = {
        let glow = glow.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            let (x, y) = (format!("{}px", e.client_x()), format!("{}px", e.client_y()));
            let gs = glow.style();
            gs.set_property("left", &x).ok();
            gs.set_property("top", &y).ok();
            let fs = follower.style();
            fs.set_property("display", "block").ok();
            fs.set_property("left", &x).ok();
            fs.set_property("top", &y).ok();
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    let press = |scale: &'static str| {
        let glow = glow.clone();
        Closure::wrap(Box::new(move || {
            glow.style().set_property("transform", scale).ok();
        }) as Box<dyn FnMut()>)
    };
    let down = press("scale(0.8)");
    let up = press("scale(1)");

    document.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    document.add_event_listener_with_callback("mousedown", down.as_ref().unchecked_ref())?;
    document.add_event_listener_with_callback("mouseup", up.as_ref().unchecked_ref())?;
    on_move.forget();
    down.forget();
    up.forget();
    Ok(())
}
