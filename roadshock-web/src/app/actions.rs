//! Callbacks that route user input into the session driver.
use roadshock_core::{CityRef, RunConfig, SessionError};
use yew::prelude::*;

use crate::app::state::AppState;
use crate::dom;

#[derive(Clone)]
pub struct Actions {
    pub select_city: Callback<CityRef>,
    pub edit_controls: Callback<RunConfig>,
    pub run: Callback<()>,
    pub dismiss_notice: Callback<()>,
}

impl Actions {
    #[must_use]
    pub fn new(app_state: &AppState) -> Self {
        Self {
            select_city: select_city(app_state),
            edit_controls: edit_controls(app_state),
            run: run(app_state),
            dismiss_notice: dismiss_notice(app_state),
        }
    }
}

fn select_city(app_state: &AppState) -> Callback<CityRef> {
    let driver = app_state.driver.clone();
    let controls = app_state.controls.clone();
    let validation = app_state.validation.clone();
    Callback::from(move |city: CityRef| {
        let mut next = (*controls).clone();
        next.city_query.clear();
        controls.set(next);
        validation.set(None);
        let driver = driver.clone();
        yew::platform::spawn_local(async move {
            if let Err(err) = driver.select_city(city).await {
                log::warn!("Baseline load failed: {err}");
            }
        });
    })
}

fn edit_controls(app_state: &AppState) -> Callback<RunConfig> {
    let controls = app_state.controls.clone();
    Callback::from(move |next: RunConfig| controls.set(next))
}

fn run(app_state: &AppState) -> Callback<()> {
    let driver = app_state.driver.clone();
    let controls = app_state.controls.clone();
    let validation = app_state.validation.clone();
    Callback::from(move |()| {
        let config = (*controls).clone();
        let driver = driver.clone();
        let validation = validation.clone();
        yew::platform::spawn_local(async move {
            match driver.run_disruption(config).await {
                Ok(_) => validation.set(None),
                Err(SessionError::InvalidConfiguration(err)) => {
                    validation.set(Some(err.to_string()));
                }
                Err(err) => dom::console_error(&format!("Simulation failed: {err}")),
            }
        });
    })
}

fn dismiss_notice(app_state: &AppState) -> Callback<()> {
    let driver = app_state.driver.clone();
    Callback::from(move |()| driver.dismiss_notice())
}
