// Accessibility helpers

/// Get CSS for visible focus indicators and screen reader utilities
///
/// Returns critical accessibility CSS that should be injected early in the page load.
#[must_use]
pub const fn visible_focus_css() -> &'static str {
    ":focus-visible{outline:3px solid #ff6fa5;outline-offset:2px} .sr-only{position:absolute;width:1px;height:1px;margin:-1px;overflow:hidden;clip:rect(0 0 0 0);white-space:nowrap;}"
}

/// Id of the polite live region announcing screen changes.
pub const STATUS_REGION_ID: &str = "status-live";

/// Update the live region status for screen readers
///
/// Updates the text content of the status region if present.
pub fn set_status(msg: &str) {
    if let Some(node) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(STATUS_REGION_ID))
    {
        node.set_text_content(Some(msg));
    }
}

/// Return keyboard focus to the element with `id`, if present.
pub fn restore_focus(id: &str) {
    use wasm_bindgen::JsCast;
    if let Some(el) = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        let _ = el.focus();
    }
}

/// Spoken label for a screen.
#[must_use]
pub const fn screen_announcement(screen: vashuu_game::ScreenId) -> &'static str {
    use vashuu_game::ScreenId;
    match screen {
        ScreenId::Landing => "Welcome",
        ScreenId::Q1 => "Question one",
        ScreenId::Unlock => "Unlocked",
        ScreenId::Q2 => "Question two",
        ScreenId::Q3 => "Question three",
        ScreenId::Game => "Catch the hearts",
        ScreenId::Q4 => "Question four",
        ScreenId::Final => "For you",
    }
}
