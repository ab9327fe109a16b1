use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use super::constants::MIN_RESOLUTION_INCREMENT;

/// Next step of the progressive-resolution ramp: quantize up to the next
/// 0.25 step, bumping by an extra step when the increment would be too
/// small to be worth a redraw.
#[inline]
pub fn next_resolution(resolution: f32) -> f32 {
    let mut next = ((resolution * 4.0).floor() + 1.0) / 4.0;
    if next - resolution < MIN_RESOLUTION_INCREMENT {
        next += 0.25;
    }
    next
}

/// A refinement frame is only worthwhile while there is headroom below full
/// resolution and both the camera and the sort pipeline have settled.
#[inline]
pub fn should_refine(next: f32, sort_dirty: bool, sort_in_flight: bool) -> bool {
    next <= 1.0 && !sort_dirty && !sort_in_flight
}

/// Single-slot `requestAnimationFrame` handle: requesting a frame always
/// supersedes and cancels the previously scheduled, not-yet-executed one.
pub struct FrameRequest {
    pending: Option<(i32, Closure<dyn FnMut()>)>,
}

impl FrameRequest {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn request(&mut self, callback: impl FnOnce() + 'static) {
        self.cancel();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(f) = callback.take() {
                f();
            }
        }) as Box<dyn FnMut()>);
        if let Some(w) = web::window() {
            if let Ok(id) = w.request_animation_frame(closure.as_ref().unchecked_ref()) {
                self.pending = Some((id, closure));
            }
        }
    }

    /// Cancelling an id that has already fired is a browser no-op, so the
    /// slot may be cleared unconditionally.
    pub fn cancel(&mut self) {
        if let Some((id, _)) = self.pending.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
    }
}

impl Default for FrameRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-slot `setTimeout` used to debounce refinement frames; scheduling
/// replaces any pending timer.
pub struct DebounceTimer {
    pending: Option<(i32, Closure<dyn FnMut()>)>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn schedule(&mut self, delay_ms: i32, callback: impl FnOnce() + 'static) {
        self.cancel();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(f) = callback.take() {
                f();
            }
        }) as Box<dyn FnMut()>);
        if let Some(w) = web::window() {
            if let Ok(id) = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            ) {
                self.pending = Some((id, closure));
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some((id, _)) = self.pending.take() {
            if let Some(w) = web::window() {
                w.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Default for DebounceTimer {
    fn default() -> Self {
        Self::new()
    }
}
