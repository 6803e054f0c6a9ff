use std::rc::Rc;

use roadshock_core::{CityCatalog, CityRef, preset_cities};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub catalog: Rc<CityCatalog>,
    #[prop_or_default]
    pub selected: Option<CityRef>,
    pub on_select: Callback<CityRef>,
    /// The selected city's network is still loading. Picking another city
    /// replaces that request.
    #[prop_or_default]
    pub loading: bool,
}

#[function_component(CitySelector)]
pub fn city_selector(p: &Props) -> Html {
    let query = use_state(String::new);

    let on_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
        })
    };

    let pick = |city: CityRef| {
        let cb = p.on_select.clone();
        let query = query.clone();
        Callback::from(move |_: MouseEvent| {
            query.set(city.label().to_string());
            cb.emit(city.clone());
        })
    };

    let on_search = {
        let cb = p.on_select.clone();
        let query = query.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !query.trim().is_empty() {
                cb.emit(CityRef::free_text(query.as_str()));
            }
        })
    };

    let matches = p.catalog.search(query.as_str());
    let selected_label = p.selected.as_ref().map(CityRef::label);

    html! {
        <section class="panel city-selector" aria-label="City">
            <form class="city-search" onsubmit={on_search}>
                <label for="city-search-input">{ "Search for a city" }</label>
                <input
                    id="city-search-input"
                    type="search"
                    placeholder="e.g. Pittsburgh, PA"
                    value={(*query).clone()}
                    oninput={on_input}
                />
                <button type="submit">{ "Load" }</button>
            </form>
            if p.loading {
                <p class="muted loading-hint" aria-live="polite">
                    { "Loading road network… pick another city to switch." }
                </p>
            }
            if !matches.is_empty() {
                <ul class="city-results" role="listbox">
                    { for matches.into_iter().map(|city| html! {
                        <li role="option">
                            <button type="button" onclick={pick(city.clone())}>{ city.label().to_string() }</button>
                        </li>
                    }) }
                </ul>
            }
            <div class="city-presets" role="group" aria-label="Popular cities">
                { for preset_cities().into_iter().map(|city| {
                    let active = selected_label == Some(city.label());
                    html! {
                        <button
                            type="button"
                            class={classes!("preset", active.then_some("active"))}
                            aria-pressed={active.to_string()}
                            onclick={pick(city.clone())}
                        >
                            { city.label().to_string() }
                        </button>
                    }
                }) }
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn presets_render_and_mark_selection() {
        let props = Props {
            catalog: Rc::new(CityCatalog::new(preset_cities())),
            selected: Some(CityRef::new("Phoenix, AZ", "Phoenix, Arizona, USA")),
            on_select: Callback::noop(),
            loading: false,
        };
        let html = block_on(LocalServerRenderer::<CitySelector>::with_props(props).render());
        for city in preset_cities() {
            assert!(html.contains(city.label()), "missing preset {}", city.label());
        }
        assert!(html.contains("aria-pressed=\"true\""));
        assert!(!html.contains("city-results"));
        assert!(!html.contains("loading-hint"));
    }
}
