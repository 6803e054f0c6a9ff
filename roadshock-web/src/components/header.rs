use roadshock_core::{CityRef, SessionPhase};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub phase: SessionPhase,
    #[prop_or_default]
    pub city: Option<CityRef>,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let city = p
        .city
        .as_ref()
        .map_or_else(|| "No city selected".to_string(), |c| c.label().to_string());
    let status_class = classes!(
        "status-pill",
        if p.phase.is_busy() {
            Some("status-busy")
        } else if matches!(p.phase, SessionPhase::Error { .. }) {
            Some("status-error")
        } else {
            None
        }
    );
    html! {
        <header role="banner" class="top-bar">
            <div class="brand">
                <h1>{ "Roadshock" }</h1>
                <p class="muted">{ "How much disruption can a city's road network absorb?" }</p>
            </div>
            <div class="header-right" aria-live="polite">
                <span class="current-city">{ city }</span>
                <span class={status_class}>{ p.phase.status_text() }</span>
            </div>
        </header>
    }
}
