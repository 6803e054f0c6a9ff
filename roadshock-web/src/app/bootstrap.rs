use roadshock_core::{CityCatalog, preset_cities};
use yew::prelude::*;

use crate::app::state::AppState;
use crate::dom;

const CITY_DATA: &str = include_str!("../../static/data/cities.json");

/// City search catalog bundled with the app; the preset list if it is unreadable.
#[must_use]
pub fn city_catalog() -> CityCatalog {
    CityCatalog::from_json(CITY_DATA).unwrap_or_else(|err| {
        log::error!("Failed to parse bundled city catalog: {err}");
        CityCatalog::new(preset_cities())
    })
}

/// Fetch the service's scenario list once on mount.
#[hook]
pub fn use_bootstrap(app_state: &AppState) {
    let driver = app_state.driver.clone();
    use_effect_with((), move |_| {
        yew::platform::spawn_local(async move {
            if let Err(err) = driver.load_scenarios().await {
                dom::console_error(&format!("Could not load scenarios: {err}"));
            }
        });
        || ()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses_and_searches() {
        let catalog = city_catalog();
        assert!(catalog.len() > preset_cities().len());
        let hits = catalog.search("san");
        assert!(hits.iter().any(|city| city.label() == "San Francisco, CA"));
        assert!(catalog.search("s").is_empty());
    }
}
