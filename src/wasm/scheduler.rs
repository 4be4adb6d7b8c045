use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::error::Result;
use crate::frame::{FrameDriver, Viewport};

/// Current window size in CSS pixels.
pub fn viewport(window: &Window) -> Viewport {
    let dim = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport {
        width: dim(window.inner_width()),
        height: dim(window.inner_height()),
        pixel_ratio: window.device_pixel_ratio(),
    }
}

/// Drive `driver` from `requestAnimationFrame` for the lifetime of the page
/// and forward window resizes to it.
pub fn run(window: &Window, driver: FrameDriver) -> Result<()> {
    let driver = Rc::new(RefCell::new(driver));

    let resize_closure = {
        let driver = driver.clone();
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            driver.borrow_mut().resize(viewport(&window));
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let loop_window = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        driver.borrow_mut().tick(now);

        // schedule next
        if let Some(cb) = f.borrow().as_ref() {
            if let Err(e) = loop_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("frame loop stopped: {e:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}
