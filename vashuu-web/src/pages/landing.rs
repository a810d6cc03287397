use vashuu_game::{Input, ParticleField};
use yew::prelude::*;

use super::ScreenProps;

#[function_component(LandingPage)]
pub fn landing_page(props: &ScreenProps) -> Html {
    html! {
        <>
            { props.particles(ParticleField::Landing) }
            <div class="landing-card">
                <h1 class="title">{ "For Vashuu" }</h1>
                <p class="greeting">{ format!("Hi {} 💕", props.view.greeting) }</p>
                <p class="subtitle">{ "A few little questions, just for you." }</p>
                <button id="start-btn" type="button" class="primary-btn" onclick={props.emit(Input::Start)}>
                    { "Start" }
                </button>
            </div>
        </>
    }
}
