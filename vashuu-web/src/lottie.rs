//! Bridge to the global `lottie` player loaded by `index.html`.

use serde::Serialize;
use vashuu_game::{Renderer, VectorAnimation};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom::js_error_message;
use crate::paths::asset_path;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = lottie, js_name = loadAnimation, catch)]
    fn load_animation(params: &JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Debug, Serialize)]
struct PlayerParams<'a> {
    renderer: Renderer,
    #[serde(rename = "loop")]
    looping: bool,
    autoplay: bool,
    path: &'a str,
}

/// A running player; destroyed on drop.
pub struct PlayerHandle(JsValue);

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        let destroy = js_sys::Reflect::get(&self.0, &JsValue::from_str("destroy"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        if let Some(destroy) = destroy
            && let Err(err) = destroy.call0(&self.0)
        {
            log::debug!("lottie destroy failed: {}", js_error_message(&err));
        }
    }
}

/// Empty `container` and mount `animation` into it.
///
/// # Errors
/// Returns an error if the player script is missing or rejects the parameters.
pub fn mount(container: &HtmlElement, animation: &VectorAnimation) -> Result<PlayerHandle, JsValue> {
    container.set_inner_html("");
    let style = container.style();
    if let Some(width) = animation.options.width.as_deref() {
        style.set_property("width", width)?;
    }
    if let Some(height) = animation.options.height.as_deref() {
        style.set_property("height", height)?;
    }

    let path = asset_path(&animation.path);
    let params = serde_wasm_bindgen::to_value(&PlayerParams {
        renderer: animation.options.renderer,
        looping: animation.options.looping,
        autoplay: animation.options.autoplay,
        path: &path,
    })
    .map_err(JsValue::from)?;
    js_sys::Reflect::set(&params, &JsValue::from_str("container"), container)?;
    load_animation(&params).map(PlayerHandle)
}
