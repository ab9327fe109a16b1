use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use super::super::frame::FrameContext;

/// Keydown/keyup write into the polled [`KeyState`] snapshot; the fixed-rate
/// key tick does the actual movement. Movement keys only register in
/// free-fly mode and while movement is unlocked.
///
/// [`KeyState`]: super::super::input::KeyState
pub fn wire(ctx: &Rc<FrameContext>, document: &web::Document) {
    let ctx2 = ctx.clone();
    let on_keydown = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.repeat() {
            return;
        }
        {
            let camera = ctx2.camera.borrow();
            if !camera.free_fly || camera.movement_locked {
                return;
            }
        }
        if ctx2.keys.borrow_mut().set_code(&ev.code(), true) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = document
        .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    on_keydown.forget();

    // Keyup always clears, even when locked mid-press, so keys never stick
    let ctx2 = ctx.clone();
    let on_keyup = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        ctx2.keys.borrow_mut().set_code(&ev.code(), false);
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("keyup", on_keyup.as_ref().unchecked_ref());
    on_keyup.forget();
}
