use vashuu_game::{ParticleField, VectorSlot};
use yew::prelude::*;

use super::ScreenProps;
use crate::components::VectorSlotView;

#[function_component(UnlockPage)]
pub fn unlock_page(props: &ScreenProps) -> Html {
    html! {
        <>
            { props.particles(ParticleField::Unlock) }
            <h2 class="unlock-title">{ "Unlocked 💖" }</h2>
            <VectorSlotView
                id={VectorSlot::UnlockHearts.element_id()}
                animation={props.view.vector(VectorSlot::UnlockHearts).cloned()}
            />
        </>
    }
}
