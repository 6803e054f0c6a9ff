//! Seam to the external simulation service.
//!
//! Implementations live with their platform: browser `fetch` in the web
//! crate, `reqwest` in the CLI, scripted fakes in tests.
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::error::ServiceError;
use crate::request::RunRequest;
use crate::result::RunResponse;

/// Body of the scenario listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScenarioListing {
    #[serde(default)]
    pub scenarios: Vec<String>,
}

#[async_trait::async_trait(?Send)]
pub trait SimulationService {
    /// Scenario identifiers the service accepts.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the service is unreachable, answers
    /// with a non-success status, or sends an unreadable body.
    async fn list_scenarios(&self) -> Result<Vec<String>, ServiceError>;

    /// Run one disruption simulation.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the service is unreachable, answers
    /// with a non-success status, or sends an unreadable body.
    async fn run_simulation(&self, request: &RunRequest) -> Result<RunResponse, ServiceError>;
}

#[async_trait::async_trait(?Send)]
impl<S: SimulationService + ?Sized> SimulationService for Rc<S> {
    async fn list_scenarios(&self) -> Result<Vec<String>, ServiceError> {
        (**self).list_scenarios().await
    }

    async fn run_simulation(&self, request: &RunRequest) -> Result<RunResponse, ServiceError> {
        (**self).run_simulation(request).await
    }
}
