use vashuu_game::RevealState;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    #[prop_or_default]
    pub state: Option<RevealState>,
    #[prop_or_default]
    pub class: Classes,
}

/// Container for typewriter text; one block per revealed line.
#[function_component(RevealText)]
pub fn reveal_text(props: &Props) -> Html {
    let complete = props.state.as_ref().is_some_and(|state| state.complete);
    let class = classes!(
        "reveal-text",
        props.class.clone(),
        complete.then_some("complete")
    );
    html! {
        <div id={props.id.clone()} {class} aria-live="polite" style="white-space: pre-wrap;">
            { for props.state.iter().flat_map(|state| state.lines.iter()).map(|line| html! {
                <div class="reveal-line">{ line.clone() }</div>
            }) }
        </div>
    }
}
