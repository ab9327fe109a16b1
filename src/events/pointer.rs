use std::rc::Rc;

use glam::Vec3;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use super::super::calibrate::{pick_ray, raycast_splats};
use super::super::constants::*;
use super::super::dom;
use super::super::frame::{request_render, FrameContext};

pub fn wire(ctx: &Rc<FrameContext>) {
    let canvas = ctx.canvas;

    // Drag to rotate. Raw mouse deltas; the sign flip on dy maps
    // drag-down to looking down.
    let ctx2 = ctx.clone();
    let on_mousemove = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if ev.buttons() & 1 == 0 {
            return;
        }
        ctx2.pointer.borrow_mut().dragging = true;
        let dx = ev.movement_x() as f32;
        let dy = ev.movement_y() as f32;
        ctx2.camera.borrow_mut().rotate_orbit(
            dx * MOUSE_ROTATE_SENSITIVITY,
            -dy * MOUSE_ROTATE_SENSITIVITY,
        );
        request_render(&ctx2, None);
    }) as Box<dyn FnMut(_)>);
    _ = canvas
        .add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    on_mousemove.forget();

    // Mouseup ends a drag; a plain click while calibrating picks a point.
    let ctx2 = ctx.clone();
    let on_mouseup = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let was_dragging = {
            let mut pointer = ctx2.pointer.borrow_mut();
            let d = pointer.dragging;
            pointer.dragging = false;
            d
        };
        if was_dragging || !ctx2.session.borrow().is_active() {
            return;
        }
        if let Some(hit) = pick_at(&ctx2, ev.client_x() as f32, ev.client_y() as f32) {
            let mut session = ctx2.session.borrow_mut();
            if session.push_hit(hit) {
                ctx2.observer.plane_points_changed(session.points());
                log::info!(
                    "[calibrate] point {}/{CALIBRATION_POINT_COUNT} at ({:.3},{:.3},{:.3})",
                    session.points().len(),
                    hit.x,
                    hit.y,
                    hit.z
                );
            }
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    on_mouseup.forget();

    let ctx2 = ctx.clone();
    let on_wheel = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        ev.prevent_default();
        ctx2.camera.borrow_mut().zoom(ev.delta_y() as f32);
        request_render(&ctx2, None);
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref());
    on_wheel.forget();

    // Touch: absolute coordinates, so deltas come from the stored last
    // position. Touch sensitivity is asymmetric on purpose.
    let ctx2 = ctx.clone();
    let on_touchstart = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        if let Some(touch) = ev.touches().item(0) {
            let mut state = ctx2.touch.borrow_mut();
            state.last_x = touch.client_x() as f32;
            state.last_y = touch.client_y() as f32;
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas
        .add_event_listener_with_callback("touchstart", on_touchstart.as_ref().unchecked_ref());
    on_touchstart.forget();

    let ctx2 = ctx.clone();
    let on_touchmove = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        ev.prevent_default();
        let Some(touch) = ev.touches().item(0) else {
            return;
        };
        let x = touch.client_x() as f32;
        let y = touch.client_y() as f32;
        let (dx, dy) = {
            let mut state = ctx2.touch.borrow_mut();
            let d = (x - state.last_x, y - state.last_y);
            state.last_x = x;
            state.last_y = y;
            d
        };
        ctx2.camera
            .borrow_mut()
            .rotate_orbit(-dx * TOUCH_THETA_SENSITIVITY, dy * TOUCH_PHI_SENSITIVITY);
        request_render(&ctx2, None);
    }) as Box<dyn FnMut(_)>);
    _ = canvas
        .add_event_listener_with_callback("touchmove", on_touchmove.as_ref().unchecked_ref());
    on_touchmove.forget();
}

/// Cast a calibration pick ray through the clicked pixel and return the
/// nearest opaque splat along it.
fn pick_at(ctx: &Rc<FrameContext>, x: f32, y: f32) -> Option<Vec3> {
    let (vpm, lookat) = {
        let camera = ctx.camera.borrow();
        (camera.vpm, camera.lookat)
    };
    let (vw, vh) = dom::viewport_size();
    let (origin, dir) = pick_ray(&vpm, lookat, x, y, vw, vh);
    let splats = ctx.splats.borrow();
    raycast_splats(origin, dir, &splats.positions, &splats.opacities)
}
