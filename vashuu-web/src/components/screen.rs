use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    pub active: bool,
    #[prop_or_default]
    pub children: Children,
}

/// One full-viewport screen. Inactive screens stay mounted but hidden.
#[function_component(Screen)]
pub fn screen(props: &Props) -> Html {
    let class = classes!("screen", props.active.then_some("active"));
    html! {
        <section
            id={props.id.clone()}
            {class}
            aria-hidden={(!props.active).to_string()}
            hidden={!props.active}
        >
            { for props.children.iter() }
        </section>
    }
}
