use vashuu_game::{InputId, ParticleField, Question, RevealSlot, VectorSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::{QuestionCard, RevealText, VectorSlotView};

#[function_component(Q3Page)]
pub fn q3_page(props: &ScreenProps) -> Html {
    let view = &props.view;
    html! {
        <>
            { props.particles(ParticleField::Q3) }
            <VectorSlotView
                id={VectorSlot::Q3Rose.element_id()}
                animation={view.vector(VectorSlot::Q3Rose).cloned()}
            />
            <QuestionCard
                input={InputId::Q3}
                prompt="Which flower are you to me? 🌻"
                placeholder="A flower..."
                view={view.question(Question::Q3)}
                on_submit={props.submit_for(Question::Q3)}
            />
            <RevealText id={RevealSlot::Q3Message.element_id()} state={view.reveal(RevealSlot::Q3Message).cloned()} />
        </>
    }
}
