use vashuu_game::{Burst, Particle};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    #[prop_or_default]
    pub particles: Vec<Particle>,
    #[prop_or_default]
    pub bursts: Vec<Burst>,
    #[prop_or_default]
    pub children: Children,
}

fn particle_style(particle: &Particle) -> String {
    format!(
        "left: {:.2}%; animation-delay: {:.2}s; animation-duration: {:.2}s;",
        particle.left_pct, particle.delay_secs, particle.duration_secs
    )
}

fn burst_view(burst: &Burst) -> Html {
    html! {
        <div key={burst.id} class="burst" aria-hidden="true">
            { for burst.sparks.iter().map(|spark| {
                let dx = spark.angle.cos() * spark.distance_px;
                let dy = spark.angle.sin() * spark.distance_px;
                let style = format!(
                    "--dx: {dx:.1}px; --dy: {dy:.1}px; animation-duration: {:.2}s; background: {};",
                    spark.duration_secs, burst.color
                );
                html! { <span class="burst-spark" {style}></span> }
            }) }
        </div>
    }
}

/// Decorative layer: ambient particles plus any live bursts.
#[function_component(ParticleLayer)]
pub fn particle_layer(props: &Props) -> Html {
    html! {
        <div id={props.id.clone()} class="particle-layer">
            { for props.particles.iter().map(|particle| html! {
                <span
                    key={particle.id}
                    class={particle.kind.css_class()}
                    style={particle_style(particle)}
                    aria-hidden="true"
                >
                    { particle.kind.glyph().unwrap_or_default() }
                </span>
            }) }
            { for props.bursts.iter().map(burst_view) }
            { for props.children.iter() }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vashuu_game::ParticleKind;

    #[test]
    fn particle_style_carries_position_and_timing() {
        let particle = Particle {
            id: 1,
            kind: ParticleKind::Heart,
            left_pct: 42.5,
            delay_secs: 1.25,
            duration_secs: 9.0,
            born_at: 0,
        };
        assert_eq!(
            particle_style(&particle),
            "left: 42.50%; animation-delay: 1.25s; animation-duration: 9.00s;"
        );
    }
}
