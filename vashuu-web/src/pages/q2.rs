use vashuu_game::{Input, InputId, ParticleField, Question, RevealSlot, VectorSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::{QuestionCard, RevealText, VectorSlotView};

#[function_component(Q2Page)]
pub fn q2_page(props: &ScreenProps) -> Html {
    let view = &props.view;
    html! {
        <>
            { props.particles(ParticleField::Q2) }
            <QuestionCard
                input={InputId::Q2}
                prompt="What do you do to me every time I see you? 🫠"
                placeholder="You..."
                view={view.question(Question::Q2)}
                on_submit={props.submit_for(Question::Q2)}
            />
            <RevealText id={RevealSlot::Q2Message.element_id()} state={view.reveal(RevealSlot::Q2Message).cloned()} />
            <VectorSlotView
                id={VectorSlot::Q2Pulse.element_id()}
                animation={view.vector(VectorSlot::Q2Pulse).cloned()}
            />
            if view.continue_visible {
                <button id="q2-continue-btn" type="button" class="primary-btn" onclick={props.emit(Input::Continue)}>
                    { "Continue 💕" }
                </button>
            }
        </>
    }
}
