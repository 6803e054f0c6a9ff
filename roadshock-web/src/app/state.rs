use std::rc::Rc;
use std::sync::Arc;

use roadshock_core::{
    CityCatalog, CityRef, History, PublishedRun, RunConfig, Scenario, SessionController,
    SessionDriver, SessionPhase, SessionSettings,
};
use yew::prelude::*;

use crate::api::WebSimulationService;

pub type WebDriver = SessionDriver<WebSimulationService>;

/// Render-ready copy of the session, refreshed after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub selected_city: Option<CityRef>,
    pub published: Option<Arc<PublishedRun>>,
    pub history: History,
    pub notice: Option<String>,
    pub scenarios: Vec<Scenario>,
    pub result_version: u64,
    pub baseline_segments: Option<usize>,
}

impl SessionView {
    #[must_use]
    pub fn capture(session: &SessionController) -> Self {
        Self {
            phase: session.phase().clone(),
            selected_city: session.selected_city().cloned(),
            published: session.published().cloned(),
            history: session.history(),
            notice: session.notice().map(str::to_string),
            scenarios: session.scenarios().to_vec(),
            result_version: session.result_version(),
            baseline_segments: session.baseline().map(|geometry| geometry.feature_count()),
        }
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::capture(&SessionController::default())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub driver: Rc<WebDriver>,
    pub view: UseStateHandle<SessionView>,
    pub controls: UseStateHandle<RunConfig>,
    pub validation: UseStateHandle<Option<String>>,
    pub catalog: Rc<CityCatalog>,
}

fn web_settings() -> SessionSettings {
    SessionSettings::default().with_api_base(crate::paths::api_base())
}

#[hook]
pub fn use_app_state() -> AppState {
    let view = use_state(SessionView::default);
    let driver = {
        let view = view.clone();
        use_memo((), move |_| {
            let settings = web_settings();
            SessionDriver::new(
                WebSimulationService::new(settings.clone()),
                SessionController::new(settings),
            )
            .with_observer(move |session| view.set(SessionView::capture(session)))
        })
    };
    AppState {
        driver,
        view,
        controls: use_state(RunConfig::default),
        validation: use_state(|| None::<String>),
        catalog: use_memo((), |_| super::bootstrap::city_catalog()),
    }
}
