use vashuu_game::VectorAnimation;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    #[prop_or_default]
    pub animation: Option<VectorAnimation>,
    #[prop_or_default]
    pub class: Classes,
}

/// Host element for a vector animation. The player is rebuilt whenever the
/// animation's generation changes and torn down when the slot empties.
#[function_component(VectorSlotView)]
pub fn vector_slot_view(props: &Props) -> Html {
    let node = use_node_ref();
    {
        let node = node.clone();
        use_effect_with(props.animation.clone(), move |animation| {
            let player = mount_player(&node, animation.as_ref());
            move || drop(player)
        });
    }
    html! {
        <div
            id={props.id.clone()}
            class={classes!("vector-slot", props.class.clone())}
            ref={node}
            aria-hidden="true"
        ></div>
    }
}

#[cfg(target_arch = "wasm32")]
fn mount_player(
    node: &NodeRef,
    animation: Option<&VectorAnimation>,
) -> Option<crate::lottie::PlayerHandle> {
    let container = node.cast::<web_sys::HtmlElement>()?;
    let animation = animation?;
    match crate::lottie::mount(&container, animation) {
        Ok(player) => Some(player),
        Err(err) => {
            log::warn!(
                "animation {} failed to load: {}",
                animation.path,
                crate::dom::js_error_message(&err)
            );
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn mount_player(_node: &NodeRef, _animation: Option<&VectorAnimation>) -> Option<()> {
    None
}
