use vashuu_game::{InputId, ParticleField, Question, RevealSlot, VectorSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::{QuestionCard, RevealText, VectorSlotView};

#[function_component(Q4Page)]
pub fn q4_page(props: &ScreenProps) -> Html {
    let view = &props.view;
    html! {
        <>
            { props.particles(ParticleField::Q4) }
            <QuestionCard
                input={InputId::Q4}
                prompt="What do I miss the most? 💋"
                placeholder="Tell me..."
                view={view.question(Question::Q4)}
                on_submit={props.submit_for(Question::Q4)}
            />
            <VectorSlotView
                id={VectorSlot::Q4Rose.element_id()}
                animation={view.vector(VectorSlot::Q4Rose).cloned()}
            />
            <RevealText
                id={RevealSlot::Q4Typewriter.element_id()}
                class={classes!("typewriter")}
                state={view.reveal(RevealSlot::Q4Typewriter).cloned()}
            />
        </>
    }
}
