use vashuu_game::{Input, ParticleField, RevealSlot, VectorSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::{Modal, RevealText, VectorSlotView};

const OPEN_BUTTON_ID: &str = "open-message-btn";

#[function_component(FinalPage)]
pub fn final_page(props: &ScreenProps) -> Html {
    let view = &props.view;
    let final_view = &view.final_view;
    let on_close = {
        let on_input = props.on_input.clone();
        Callback::from(move |()| on_input.emit(Input::CloseMessage))
    };

    html! {
        <>
            { props.particles(ParticleField::Final) }
            <VectorSlotView
                id={VectorSlot::FinalHeartPulse.element_id()}
                animation={view.vector(VectorSlot::FinalHeartPulse).cloned()}
            />
            <VectorSlotView
                id={VectorSlot::FinalSqueezeBunny.element_id()}
                animation={view.vector(VectorSlot::FinalSqueezeBunny).cloned()}
            />
            <button
                id={OPEN_BUTTON_ID}
                type="button"
                class="open-message-btn"
                disabled={!final_view.armed}
                onclick={props.emit(Input::OpenMessage)}
            >
                { "💌 Open your message" }
                if final_view.badge_visible {
                    <span class="badge" aria-label="unread">{ "1" }</span>
                }
            </button>
            <div class="final-actions">
                <button id="final-music-btn" type="button" class="music-btn" onclick={props.emit(Input::ToggleMusic)}>
                    <span class="music-icon" aria-hidden="true">{ "🎵" }</span>
                    <span class="music-text">{ view.music_label }</span>
                </button>
                <button id="export-btn" type="button" class="secondary-btn" onclick={props.emit(Input::Export)}>
                    { "Save our memories" }
                </button>
                <button id="replay-btn" type="button" class="secondary-btn" onclick={props.emit(Input::Replay)}>
                    { "Play again" }
                </button>
            </div>
            <Modal
                open={final_view.modal_open}
                title="For you, Vashuu"
                on_close={on_close}
                return_focus_id={Some(AttrValue::Static(OPEN_BUTTON_ID))}
            >
                <RevealText
                    id={RevealSlot::FinalTypewriter.element_id()}
                    class={classes!("typewriter")}
                    state={view.reveal(RevealSlot::FinalTypewriter).cloned()}
                />
            </Modal>
        </>
    }
}
