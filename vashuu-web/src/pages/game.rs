use vashuu_game::{ParticleField, VectorSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::{CatchArea, VectorSlotView};

#[function_component(GamePage)]
pub fn game_page(props: &ScreenProps) -> Html {
    let view = &props.view;
    html! {
        <>
            { props.particles(ParticleField::Game) }
            <h2 class="game-title">{ "Catch the falling hearts! 💖" }</h2>
            <CatchArea game={view.game.clone()} on_input={props.on_input.clone()} />
            <div id="game-reward" class="game-reward" aria-live="polite">
                { for view.game_reward.iter().map(|reward| html! { <p>{ reward.clone() }</p> }) }
            </div>
            <VectorSlotView
                id={VectorSlot::GameBunny.element_id()}
                animation={view.vector(VectorSlot::GameBunny).cloned()}
            />
        </>
    }
}
