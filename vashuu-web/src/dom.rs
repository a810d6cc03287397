use js_sys::Array;
use vashuu_game::ExportDocument;
use vashuu_game::numbers::f64_to_ms;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlElement, HtmlInputElement, Storage,
    Url, Window,
};

/// Retrieve the global `window` object.
///
/// # Panics
/// Panics if executed outside of a browser context where `window` is unavailable.
#[must_use]
pub fn window() -> Window {
    web_sys::window().expect("`window` should be available in web context")
}

/// Retrieve the document object for DOM interactions.
///
/// # Panics
/// Panics when the document cannot be accessed from the current browser window.
#[must_use]
pub fn document() -> Document {
    window()
        .document()
        .expect("`document` should exist in browser context")
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Wall-clock milliseconds since the epoch.
#[must_use]
pub fn now_ms() -> u64 {
    f64_to_ms(js_sys::Date::now())
}

/// Seed for the experience RNG, mixed from the clock and `Math.random`.
#[must_use]
pub fn random_seed() -> u64 {
    let noise = f64_to_ms(js_sys::Math::random() * 4_294_967_296.0);
    now_ms().rotate_left(17) ^ noise
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

fn input_by_id(id: &str) -> Option<HtmlInputElement> {
    web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

/// Move keyboard focus to the input with `id`, if it is mounted.
pub fn focus_input(id: &str) {
    if let Some(input) = input_by_id(id)
        && let Err(err) = input.focus()
    {
        log::debug!("focus {id} failed: {}", js_error_message(&err));
    }
}

/// Empty the input with `id`, if it is mounted.
pub fn clear_input(id: &str) {
    if let Some(input) = input_by_id(id) {
        input.set_value("");
    }
}

/// Offer `doc` to the user as a JSON file download.
///
/// # Errors
/// Returns an error if the blob, object URL or anchor cannot be created.
pub fn download(doc: &ExportDocument) -> Result<(), JsValue> {
    let parts = Array::of1(&JsValue::from_str(&doc.contents));
    let options = BlobPropertyBag::new();
    options.set_type(doc.mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document().create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&doc.filename);
    let body: HtmlElement = document()
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)
}
