//! The eight screens and the shell stacking them.

pub mod final_screen;
pub mod game;
pub mod landing;
pub mod q1;
pub mod q2;
pub mod q3;
pub mod q4;
pub mod unlock;

use std::rc::Rc;

use vashuu_game::{Input, ParticleField, Question, ScreenId};
use yew::prelude::*;

use crate::a11y::{STATUS_REGION_ID, visible_focus_css};
use crate::components::{ParticleLayer, Screen};
use crate::view::ExperienceView;

pub use final_screen::FinalPage;
pub use game::GamePage;
pub use landing::LandingPage;
pub use q1::Q1Page;
pub use q2::Q2Page;
pub use q3::Q3Page;
pub use q4::Q4Page;
pub use unlock::UnlockPage;

/// Props shared by every screen.
#[derive(Properties, Clone, PartialEq)]
pub struct ScreenProps {
    pub view: Rc<ExperienceView>,
    pub on_input: Callback<Input>,
}

impl ScreenProps {
    pub(crate) fn particles(&self, field: ParticleField) -> Html {
        html! {
            <ParticleLayer
                id={field.element_id()}
                particles={self.view.particles(field).to_vec()}
                bursts={self.view.bursts_in(field).cloned().collect::<Vec<_>>()}
            />
        }
    }

    pub(crate) fn submit_for(&self, question: Question) -> Callback<String> {
        let on_input = self.on_input.clone();
        Callback::from(move |answer: String| on_input.emit(Input::Submit { question, answer }))
    }

    pub(crate) fn emit(&self, input: Input) -> Callback<MouseEvent> {
        let on_input = self.on_input.clone();
        Callback::from(move |_| on_input.emit(input.clone()))
    }
}

#[function_component(ExperienceShell)]
pub fn experience_shell(props: &ScreenProps) -> Html {
    let screen = |id: ScreenId, body: Html| {
        html! {
            <Screen id={id.element_id()} active={props.view.is_active(id)}>
                { body }
            </Screen>
        }
    };
    html! {
        <main class="experience">
            <style>{ visible_focus_css() }</style>
            <div id={STATUS_REGION_ID} class="sr-only" aria-live="polite"></div>
            { screen(ScreenId::Landing, html! { <LandingPage ..props.clone() /> }) }
            { screen(ScreenId::Q1, html! { <Q1Page ..props.clone() /> }) }
            { screen(ScreenId::Unlock, html! { <UnlockPage ..props.clone() /> }) }
            { screen(ScreenId::Q2, html! { <Q2Page ..props.clone() /> }) }
            { screen(ScreenId::Q3, html! { <Q3Page ..props.clone() /> }) }
            { screen(ScreenId::Game, html! { <GamePage ..props.clone() /> }) }
            { screen(ScreenId::Q4, html! { <Q4Page ..props.clone() /> }) }
            { screen(ScreenId::Final, html! { <FinalPage ..props.clone() /> }) }
        </main>
    }
}
