use vashuu_game::{InputId, QuestionView};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub input: InputId,
    pub prompt: AttrValue,
    pub placeholder: AttrValue,
    pub view: QuestionView,
    pub on_submit: Callback<String>,
    #[prop_or(AttrValue::Static("Submit"))]
    pub button_label: AttrValue,
}

/// Prompt, text input, submit button and hint line for one question.
///
/// The input is uncontrolled; the controller clears it through a command
/// after every submission.
#[function_component(QuestionCard)]
pub fn question_card(props: &Props) -> Html {
    let input_ref = use_node_ref();
    let input_id = props.input.element_id();
    let hint_id = format!("{input_id}-hint");

    let submit = {
        let input_ref = input_ref.clone();
        let on_submit = props.on_submit.clone();
        move || {
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                on_submit.emit(input.value());
            }
        }
    };
    let on_click = {
        let submit = submit.clone();
        Callback::from(move |_: MouseEvent| submit())
    };
    let on_keydown = Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            e.prevent_default();
            submit();
        }
    });

    let shake = props.view.shaking.then_some("shake");
    html! {
        <div class={classes!("question-card", props.view.solved.then_some("solved"))}>
            <label class="question-prompt" for={input_id}>{ props.prompt.clone() }</label>
            if props.view.input_visible {
                <div class={classes!("answer-row", shake)}>
                    <input
                        id={input_id}
                        type="text"
                        class="answer-input"
                        placeholder={props.placeholder.clone()}
                        autocomplete="off"
                        aria-describedby={hint_id.clone()}
                        onkeydown={on_keydown}
                        ref={input_ref}
                    />
                    <button type="button" class="answer-submit" onclick={on_click}>
                        { props.button_label.clone() }
                    </button>
                </div>
            }
            <p id={hint_id} class="error-message" role="alert">
                { props.view.hint.clone().unwrap_or_default() }
            </p>
        </div>
    }
}
