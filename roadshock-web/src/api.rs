//! Browser `fetch` implementation of the simulation service.
use roadshock_core::constants::{SCENARIOS_PATH, SIMULATE_PATH};
use roadshock_core::{
    RunRequest, RunResponse, ScenarioListing, ServiceError, SessionSettings, SimulationService,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::Response;

use crate::dom;

#[derive(Debug, Clone, PartialEq)]
pub struct WebSimulationService {
    settings: SessionSettings,
}

impl WebSimulationService {
    #[must_use]
    pub const fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }
}

fn transport(err: &JsValue) -> ServiceError {
    let message = dom::js_error_message(err);
    log::warn!("simulation service unreachable: {message}");
    ServiceError::Transport(message)
}

#[allow(clippy::future_not_send)]
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let body = dom::response_text(&response)
        .await
        .map_err(|err| transport(&err))?;
    if !response.ok() {
        return Err(ServiceError::status(response.status(), body));
    }
    serde_json::from_str(&body).map_err(|err| ServiceError::Decode(err.to_string()))
}

#[async_trait::async_trait(?Send)]
impl SimulationService for WebSimulationService {
    async fn list_scenarios(&self) -> Result<Vec<String>, ServiceError> {
        let url = self.settings.endpoint(SCENARIOS_PATH);
        let response = dom::fetch_response(&url)
            .await
            .map_err(|err| transport(&err))?;
        let listing: ScenarioListing = read_json(response).await?;
        Ok(listing.scenarios)
    }

    async fn run_simulation(&self, request: &RunRequest) -> Result<RunResponse, ServiceError> {
        let url = self.settings.endpoint(SIMULATE_PATH);
        let body =
            serde_json::to_string(request).map_err(|err| ServiceError::Decode(err.to_string()))?;
        let response = dom::post_json(&url, &body)
            .await
            .map_err(|err| transport(&err))?;
        read_json(response).await
    }
}
