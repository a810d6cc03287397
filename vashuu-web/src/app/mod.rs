#[cfg(target_arch = "wasm32")]
use crate::pages::ExperienceShell;
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;

pub mod bootstrap;
#[cfg(target_arch = "wasm32")]
pub mod runtime;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let snapshot = use_state(|| None);
    let runtime = {
        let setter = snapshot.setter();
        use_memo((), move |()| {
            runtime::Runtime::start(Callback::from(move |view| setter.set(Some(view))))
        })
    };
    let view = (*snapshot).clone().unwrap_or_else(|| runtime.view());
    let on_input = {
        let runtime = (*runtime).clone();
        Callback::from(move |input| runtime.dispatch(input))
    };
    html! { <ExperienceShell {view} {on_input} /> }
}
