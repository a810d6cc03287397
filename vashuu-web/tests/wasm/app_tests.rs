#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;
use yew::Renderer;

use vashuu_web::app::App;
use vashuu_web::dom;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn ensure_app_root() -> web_sys::Element {
    let doc = dom::document();
    if let Some(root) = doc.get_element_by_id("app") {
        root.set_inner_html("");
        return root;
    }
    let root = doc.create_element("div").expect("create app root");
    root.set_id("app");
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append app root");
    root
}

async fn next_frame() {
    gloo::timers::future::TimeoutFuture::new(50).await;
}

#[wasm_bindgen_test]
async fn app_starts_on_landing() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    next_frame().await;
    let doc = dom::document();
    let landing = doc
        .get_element_by_id("screen-landing")
        .expect("landing screen exists");
    assert!(landing.class_list().contains("active"));
    assert!(doc.get_element_by_id("start-btn").is_some());
}

#[wasm_bindgen_test]
async fn start_button_moves_to_q1_and_focuses_date() {
    Renderer::<App>::with_root(ensure_app_root()).render();
    next_frame().await;
    let doc = dom::document();
    let start: HtmlElement = doc
        .get_element_by_id("start-btn")
        .expect("start button")
        .dyn_into()
        .expect("button is html");
    start.click();
    next_frame().await;
    next_frame().await;
    let q1 = doc.get_element_by_id("screen-q1").expect("q1 screen");
    assert!(q1.class_list().contains("active"));
    let focused = doc.active_element().map(|el| el.id()).unwrap_or_default();
    assert_eq!(focused, "q1-date-input");
}

#[wasm_bindgen_test]
fn asset_paths_are_root_anchored() {
    assert_eq!(
        vashuu_web::paths::asset_path("assets/animations/rose.json"),
        "/assets/animations/rose.json"
    );
}
