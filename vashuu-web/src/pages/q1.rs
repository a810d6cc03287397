use vashuu_game::{InputId, ParticleField, Question, RevealSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::{QuestionCard, RevealText};

#[function_component(Q1Page)]
pub fn q1_page(props: &ScreenProps) -> Html {
    let view = &props.view;
    html! {
        <>
            { props.particles(ParticleField::Q1) }
            <QuestionCard
                input={InputId::Q1Date}
                prompt="When did we first meet? 📅"
                placeholder="dd/mm"
                view={view.question(Question::Q1Date)}
                on_submit={props.submit_for(Question::Q1Date)}
            />
            <RevealText id={RevealSlot::Q1Message.element_id()} state={view.reveal(RevealSlot::Q1Message).cloned()} />
            if view.name_section_visible {
                <div id="q1-name-section" class="name-section">
                    <QuestionCard
                        input={InputId::Q1Name}
                        prompt="And what are you to me? 👑"
                        placeholder="Your title..."
                        view={view.question(Question::Q1Name)}
                        on_submit={props.submit_for(Question::Q1Name)}
                    />
                    <RevealText id={RevealSlot::Q1NameMessage.element_id()} state={view.reveal(RevealSlot::Q1NameMessage).cloned()} />
                </div>
            }
        </>
    }
}
