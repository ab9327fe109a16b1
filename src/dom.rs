use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// CSS pixel size of the canvas element; the backing store is sized to a
/// fraction of this by the progressive-resolution scheduler.
pub fn canvas_css_size(canvas: &web::HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (rect.width(), rect.height())
}

pub fn set_backing_size(canvas: &web::HtmlCanvasElement, width: u32, height: u32) {
    let width = width.max(1);
    let height = height.max(1);
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
}

pub fn viewport_size() -> (f32, f32) {
    let Some(w) = web::window() else {
        return (1.0, 1.0);
    };
    let width = w
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let height = w
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    (width as f32, height as f32)
}

/// Attach a click handler to an element by id; missing elements are
/// ignored so optional controls stay optional.
pub fn add_click_listener(document: &web::Document, id: &str, mut f: impl FnMut() + 'static) {
    if let Some(el) = document.get_element_by_id(id) {
        let closure = Closure::wrap(Box::new(move || f()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
