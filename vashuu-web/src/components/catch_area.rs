use gloo::events::EventListener;
use vashuu_game::{CatchPhase, Input, Point};
use web_sys::{Element, HtmlElement, MouseEvent, TouchEvent};
use yew::prelude::*;

use crate::view::GameView;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    #[prop_or_default]
    pub game: Option<GameView>,
    pub on_input: Callback<Input>,
}

fn arena_point(area: &Element, client_x: f64, client_y: f64) -> Point {
    let rect = area.get_bounding_client_rect();
    Point::new(client_x - rect.left(), client_y - rect.top())
}

fn report_size(area: &Element, on_input: &Callback<Input>) {
    let rect = area.get_bounding_client_rect();
    if rect.width() > 0.0 && rect.height() > 0.0 {
        on_input.emit(Input::ArenaResized {
            width: rect.width(),
            height: rect.height(),
        });
    }
}

/// The catch arena: falling hearts plus the score line.
#[function_component(CatchArea)]
pub fn catch_area(props: &Props) -> Html {
    let area_ref = use_node_ref();
    let active = props
        .game
        .as_ref()
        .is_some_and(|game| game.phase == CatchPhase::Active);

    {
        let area_ref = area_ref.clone();
        let on_input = props.on_input.clone();
        use_effect_with(active, move |active| {
            let listener = active
                .then(|| area_ref.cast::<HtmlElement>())
                .flatten()
                .and_then(|area| {
                    report_size(&area, &on_input);
                    let window = web_sys::window()?;
                    Some(EventListener::new(&window, "resize", move |_| {
                        report_size(&area, &on_input);
                    }))
                });
            move || drop(listener)
        });
    }

    let on_click = {
        let area_ref = area_ref.clone();
        let on_input = props.on_input.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(area) = area_ref.cast::<Element>() {
                let at = arena_point(&area, f64::from(e.client_x()), f64::from(e.client_y()));
                on_input.emit(Input::Pointer(at));
            }
        })
    };
    let on_touch = {
        let area_ref = area_ref.clone();
        let on_input = props.on_input.clone();
        Callback::from(move |e: TouchEvent| {
            e.prevent_default();
            let Some(area) = area_ref.cast::<Element>() else {
                return;
            };
            if let Some(touch) = e.touches().get(0) {
                let at = arena_point(
                    &area,
                    f64::from(touch.client_x()),
                    f64::from(touch.client_y()),
                );
                on_input.emit(Input::Pointer(at));
            }
        })
    };

    let score = props
        .game
        .as_ref()
        .map(|game| game.score_label.clone())
        .unwrap_or_default();
    let targets = props.game.iter().flat_map(|game| {
        game.targets.iter().map(move |target| {
            let style = format!(
                "left: {:.2}%; width: {size}px; height: {size}px; font-size: {size}px; animation-duration: {}ms;",
                target.left_pct,
                game.lifetime_ms,
                size = game.target_size,
            );
            html! {
                <span key={target.id} class="catch-target" {style} aria-hidden="true">{"💖"}</span>
            }
        })
    });

    html! {
        <div class="catch-game">
            <p id="game-score" class="game-score" aria-live="polite">{ score }</p>
            <div
                id="game-area"
                class={classes!("game-area", active.then_some("active"))}
                role="application"
                aria-label="Tap the falling hearts"
                onclick={on_click}
                ontouchstart={on_touch}
                ref={area_ref}
            >
                { for targets }
            </div>
        </div>
    }
}
