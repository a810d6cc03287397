//! Carries out [`AudioCommand`]s on a detached `<audio>` element.
//!
//! Everything that can fail asynchronously comes back to the controller as
//! an [`Input`] through the `report` callback.

use std::cell::RefCell;

use gloo::events::EventListener;
use vashuu_game::{AudioCommand, Input};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;
use yew::Callback;

use crate::dom::js_error_message;
use crate::paths::asset_path;

pub struct AudioDriver {
    element: Option<HtmlAudioElement>,
    listeners: RefCell<Vec<EventListener>>,
    report: Callback<Input>,
}

impl AudioDriver {
    #[must_use]
    pub fn new(report: Callback<Input>) -> Self {
        let element = match HtmlAudioElement::new() {
            Ok(element) => {
                element.set_preload("auto");
                element.set_loop(true);
                element.set_volume(0.0);
                Some(element)
            }
            Err(err) => {
                log::warn!("audio element unavailable: {}", js_error_message(&err));
                None
            }
        };
        Self {
            element,
            listeners: RefCell::new(Vec::new()),
            report,
        }
    }

    pub fn run(&self, command: AudioCommand) {
        let Some(element) = self.element.as_ref() else {
            if let AudioCommand::Load { .. } = command {
                self.report
                    .emit(Input::MusicFailed("audio element unavailable".to_string()));
            }
            return;
        };
        match command {
            AudioCommand::Load { src } => self.load(element, &src),
            AudioCommand::Prime => prime(element),
            AudioCommand::Play => self.play(element),
            AudioCommand::Pause => {
                if let Err(err) = element.pause() {
                    log::debug!("pause failed: {}", js_error_message(&err));
                }
            }
            AudioCommand::SetVolume(volume) => element.set_volume(volume.clamp(0.0, 1.0)),
        }
    }

    fn load(&self, element: &HtmlAudioElement, src: &str) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.clear();
        let ready = self.report.clone();
        listeners.push(EventListener::once(element, "canplaythrough", move |_| {
            ready.emit(Input::MusicReady);
        }));
        let failed = self.report.clone();
        listeners.push(EventListener::once(element, "error", move |_| {
            failed.emit(Input::MusicFailed("audio failed to load".to_string()));
        }));
        element.set_src(&asset_path(src));
        element.load();
    }

    fn play(&self, element: &HtmlAudioElement) {
        let promise = match element.play() {
            Ok(promise) => promise,
            Err(err) => {
                self.report
                    .emit(Input::PlaybackRejected(js_error_message(&err)));
                return;
            }
        };
        let report = self.report.clone();
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                report.emit(Input::PlaybackRejected(js_error_message(&err)));
            }
        });
    }
}

/// Play and immediately pause inside the user gesture so later `play()` calls
/// are allowed.
fn prime(element: &HtmlAudioElement) {
    let Ok(promise) = element.play() else {
        return;
    };
    let element = element.clone();
    spawn_local(async move {
        if JsFuture::from(promise).await.is_ok() {
            let _ = element.pause();
            element.set_current_time(0.0);
        }
    });
}
