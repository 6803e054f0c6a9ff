use roadshock_core::constants::{
    INTENSITY_MAX_PERCENT, INTENSITY_MIN_PERCENT, INTENSITY_STEP_PERCENT, SAMPLE_PAIRS_MAX,
    SAMPLE_PAIRS_MIN,
};
use roadshock_core::{RunConfig, Scenario};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::button::Button;
use crate::components::notice::Notice;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub controls: RunConfig,
    pub scenarios: Vec<Scenario>,
    pub on_change: Callback<RunConfig>,
    pub on_run: Callback<()>,
    #[prop_or_default]
    pub busy: bool,
    #[prop_or_default]
    pub validation: Option<String>,
}

#[function_component(RunControls)]
pub fn run_controls(p: &Props) -> Html {
    let on_scenario = {
        let current = p.controls.clone();
        let cb = p.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = current.clone();
            next.scenario = select.value().parse::<Scenario>().ok();
            cb.emit(next);
        })
    };

    let on_intensity = {
        let current = p.controls.clone();
        let cb = p.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(intensity) = input.value().parse::<i32>() {
                cb.emit(current.clone().with_intensity(intensity));
            }
        })
    };

    let on_pairs = {
        let current = p.controls.clone();
        let cb = p.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(pairs) = input.value().parse::<u32>() {
                let pairs = pairs.clamp(SAMPLE_PAIRS_MIN, SAMPLE_PAIRS_MAX);
                cb.emit(current.clone().with_sample_pairs(pairs));
            }
        })
    };

    let on_flood = {
        let current = p.controls.clone();
        let cb = p.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            cb.emit(current.clone().with_flood_data(input.checked()));
        })
    };

    let on_city_override = {
        let current = p.controls.clone();
        let cb = p.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = current.clone();
            next.city_query = input.value();
            cb.emit(next);
        })
    };

    let selected = p.controls.scenario;
    let info = selected.map(Scenario::info);
    let severity = p.controls.severity();
    let run_label = if p.busy { "Running…" } else { "Run simulation" };

    html! {
        <section class="panel run-controls" aria-label="Apply disruption">
            <h3>{ "Apply Disruption" }</h3>
            <p class="muted">{ "Select a disruption type and intensity." }</p>

            <label for="scenario-select">{ "Disruption type" }</label>
            <select id="scenario-select" onchange={on_scenario}>
                <option value="" selected={selected.is_none()}>{ "Choose…" }</option>
                { for p.scenarios.iter().map(|scenario| html! {
                    <option value={scenario.wire_name()} selected={selected == Some(*scenario)}>
                        { scenario.wire_name() }
                    </option>
                }) }
            </select>
            if let Some(info) = info {
                <p class="scenario-description">{ info.short }</p>
                <details class="scenario-insight">
                    <summary>{ "What this scenario models" }</summary>
                    <p>{ info.long }</p>
                </details>
            }

            <label for="intensity-range">
                { format!("Intensity: {}% (severity {severity:.2})", p.controls.intensity_percent) }
            </label>
            <input
                id="intensity-range"
                type="range"
                min={INTENSITY_MIN_PERCENT.to_string()}
                max={INTENSITY_MAX_PERCENT.to_string()}
                step={INTENSITY_STEP_PERCENT.to_string()}
                value={p.controls.intensity_percent.to_string()}
                oninput={on_intensity}
            />

            <label for="pairs-input">{ "Sampled trips" }</label>
            <input
                id="pairs-input"
                type="number"
                min={SAMPLE_PAIRS_MIN.to_string()}
                max={SAMPLE_PAIRS_MAX.to_string()}
                value={p.controls.sample_pairs.to_string()}
                onchange={on_pairs}
            />

            if selected.is_some_and(Scenario::accepts_flood_data) {
                <label class="checkbox">
                    <input type="checkbox" checked={p.controls.flood_data} onchange={on_flood} />
                    { "Use USGS flood data" }
                </label>
            }

            <label for="city-override">{ "Or type any city" }</label>
            <input
                id="city-override"
                type="text"
                placeholder="City, State, Country"
                value={p.controls.city_query.clone()}
                oninput={on_city_override}
            />

            if let Some(message) = p.validation.clone() {
                <Notice message={message} />
            }
            <Button
                label={run_label}
                class={classes!("primary", "run-button")}
                onclick={p.on_run.clone()}
            />
        </section>
    }
}
