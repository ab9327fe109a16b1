use std::rc::Rc;

use super::dom;
use super::frame::{self, FrameContext};

pub mod keyboard;
pub mod pointer;

/// Attach every input listener. Optional calibration controls are wired by
/// element id; pages without them simply get no calibration UI.
pub fn wire(ctx: &Rc<FrameContext>, document: &web_sys::Document) {
    pointer::wire(ctx);
    keyboard::wire(ctx, document);

    // Window resizes restart the progressive-resolution ramp
    let ctx2 = ctx.clone();
    let on_resize = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
        frame::request_render(&ctx2, None);
    }) as Box<dyn FnMut()>);
    if let Some(w) = web_sys::window() {
        use wasm_bindgen::JsCast;
        _ = w.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
    }
    on_resize.forget();

    let ctx2 = ctx.clone();
    dom::add_click_listener(document, "calibrate", move || {
        ctx2.session.borrow_mut().begin();
        ctx2.observer.plane_points_changed(&[]);
        log::info!("[calibrate] session started");
    });
    let ctx2 = ctx.clone();
    dom::add_click_listener(document, "calibrate-finish", move || {
        frame::finish_calibration(&ctx2);
    });
    let ctx2 = ctx.clone();
    dom::add_click_listener(document, "calibrate-reset", move || {
        ctx2.session.borrow_mut().reset();
        ctx2.observer.plane_points_changed(&[]);
    });
}
