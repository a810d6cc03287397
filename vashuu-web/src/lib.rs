#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod a11y;
pub mod app;
pub mod audio;
pub mod components;
pub mod dom;
pub mod lottie;
pub mod pages;
pub mod paths;
pub mod storage;
pub mod view;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        crate::dom::console_error(&format!("logger init failed: {err}"));
    }
    yew::Renderer::<app::App>::new().render();
}
