use web_sys as web;

/// Loading overlay shown while a scene downloads and parses.

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("loading-container") {
        _ = el.set_attribute("style", "opacity:1");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("loading-container") {
        _ = el.set_attribute("style", "opacity:0");
    }
}

pub fn set_text(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id("loading-text") {
        el.set_text_content(Some(text));
    }
}

pub fn set_error(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id("loading-text") {
        _ = el.set_attribute("style", "color:red");
        el.set_text_content(Some(text));
    }
}
