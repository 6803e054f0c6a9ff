//! `reqwest` implementation of the simulation service.
use std::time::Duration;

use roadshock_core::constants::{SCENARIOS_PATH, SIMULATE_PATH};
use roadshock_core::{
    RunRequest, RunResponse, ScenarioListing, ServiceError, SessionSettings, SimulationService,
};
use serde::de::DeserializeOwned;

/// Road-network downloads on the service side can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct HttpSimulationService {
    http: reqwest::Client,
    settings: SessionSettings,
}

impl HttpSimulationService {
    pub fn new(settings: SessionSettings) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| transport(&err))?;
        Ok(Self { http, settings })
    }
}

fn transport(err: &reqwest::Error) -> ServiceError {
    log::warn!("simulation service unreachable: {err}");
    ServiceError::Transport(err.to_string())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await.map_err(|err| transport(&err))?;
    if !status.is_success() {
        log::warn!("simulation service answered {status}");
        return Err(ServiceError::status(status.as_u16(), body));
    }
    serde_json::from_str(&body).map_err(|err| ServiceError::Decode(err.to_string()))
}

#[async_trait::async_trait(?Send)]
impl SimulationService for HttpSimulationService {
    async fn list_scenarios(&self) -> Result<Vec<String>, ServiceError> {
        let url = self.settings.endpoint(SCENARIOS_PATH);
        log::debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| transport(&err))?;
        let listing: ScenarioListing = read_json(response).await?;
        Ok(listing.scenarios)
    }

    async fn run_simulation(&self, request: &RunRequest) -> Result<RunResponse, ServiceError> {
        let url = self.settings.endpoint(SIMULATE_PATH);
        log::debug!("POST {url} city={} scenario={}", request.city, request.scenario);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| transport(&err))?;
        read_json(response).await
    }
}
