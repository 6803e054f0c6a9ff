//! Multi-city disruption sweeps over one session.
use serde::Serialize;

use roadshock_core::{
    CityRef, History, PublishedRun, RunConfig, Scenario, SessionDriver, SimulationService,
    severity_from_intensity,
};

/// Cities, scenarios and shared run controls for one sweep.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub cities: Vec<CityRef>,
    pub scenarios: Vec<Scenario>,
    pub intensity_percent: i32,
    pub sample_pairs: u32,
    pub flood_data: bool,
}

impl SweepPlan {
    fn config(&self, scenario: Scenario) -> RunConfig {
        // Blank city query: runs target the selected city.
        RunConfig::new("", scenario)
            .with_intensity(self.intensity_percent)
            .with_sample_pairs(self.sample_pairs)
            .with_flood_data(self.flood_data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed {
        resilience_score: Option<f64>,
        resilience_label: String,
        shock_level: String,
        avg_ratio: Option<f64>,
        median_ratio: Option<f64>,
        disconnected_pct: Option<f64>,
        removed_edges: u64,
        remaining_edges: u64,
        narrative: String,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub city: String,
    pub scenario: Scenario,
    pub severity: f64,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl RunRecord {
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed { .. })
    }

    fn completed(city: &CityRef, run: &PublishedRun) -> Self {
        let insight = run.insight();
        let result = run.result();
        Self {
            city: city.label().to_string(),
            scenario: run.request().scenario,
            severity: run.request().severity,
            outcome: RunOutcome::Completed {
                resilience_score: insight.resilience_score(),
                resilience_label: insight.resilience_label().as_str().to_string(),
                shock_level: insight.shock_level().as_str().to_string(),
                avg_ratio: insight.delay_factor(),
                median_ratio: result.median_ratio,
                disconnected_pct: result.disconnected_percent(),
                removed_edges: result.removed_edge_count,
                remaining_edges: result.remaining_edge_count(),
                narrative: insight.narrative().to_string(),
            },
        }
    }

    fn failed(city: &CityRef, scenario: Scenario, severity: f64, message: String) -> Self {
        Self {
            city: city.label().to_string(),
            scenario,
            severity,
            outcome: RunOutcome::Failed { message },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub records: Vec<RunRecord>,
    pub history: History,
}

impl SweepReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| !r.passed()).count()
    }
}

/// Load each city's baseline, then run every scenario against it.
///
/// A failed baseline marks that city's scenarios failed and moves on.
pub async fn run_sweep<S: SimulationService>(
    driver: &SessionDriver<S>,
    plan: &SweepPlan,
) -> SweepReport {
    let severity = severity_from_intensity(plan.intensity_percent);
    let mut records = Vec::with_capacity(plan.cities.len() * plan.scenarios.len());

    for city in &plan.cities {
        log::info!("loading road network for {}", city.label());
        if let Err(err) = driver.select_city(city.clone()).await {
            let message = format!("baseline load failed: {err}");
            log::warn!("{}: {message}", city.label());
            records.extend(
                plan.scenarios
                    .iter()
                    .map(|&scenario| RunRecord::failed(city, scenario, severity, message.clone())),
            );
            continue;
        }

        for &scenario in &plan.scenarios {
            log::info!("running {scenario} on {}", city.label());
            match driver.run_disruption(plan.config(scenario)).await {
                Ok(Some(run)) => records.push(RunRecord::completed(city, &run)),
                Ok(None) => log::debug!("{scenario} on {} was superseded", city.label()),
                Err(err) => {
                    log::warn!("{scenario} on {} failed: {err}", city.label());
                    records.push(RunRecord::failed(city, scenario, severity, err.to_string()));
                }
            }
        }
    }

    let history = driver.controller().history();
    SweepReport { records, history }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadshock_core::{
        RunRequest, RunResponse, ServiceError, SessionController, SessionSettings,
    };
    use std::cell::RefCell;

    #[derive(Default)]
    struct CannedService {
        requests: RefCell<Vec<RunRequest>>,
        failing_city: Option<&'static str>,
    }

    #[async_trait::async_trait(?Send)]
    impl SimulationService for CannedService {
        async fn list_scenarios(&self) -> Result<Vec<String>, ServiceError> {
            Ok(Scenario::ALL.iter().map(|s| s.wire_name().to_string()).collect())
        }

        async fn run_simulation(&self, request: &RunRequest) -> Result<RunResponse, ServiceError> {
            self.requests.borrow_mut().push(request.clone());
            if self.failing_city == Some(request.city.as_str()) {
                return Err(ServiceError::status(404, "City not found"));
            }
            Ok(RunResponse {
                avg_ratio: Some(1.25),
                pct_disconnected: Some(5.0),
                n_removed_edges: 3,
                n_pairs: request.sample_pairs,
                ..RunResponse::default()
            })
        }
    }

    fn plan(cities: &[(&str, &str)]) -> SweepPlan {
        SweepPlan {
            cities: cities.iter().map(|(l, q)| CityRef::new(*l, *q)).collect(),
            scenarios: vec![Scenario::BridgeCollapse, Scenario::HighwayFlood],
            intensity_percent: 80,
            sample_pairs: 60,
            flood_data: true,
        }
    }

    #[tokio::test]
    async fn sweeps_every_city_and_scenario() {
        let driver = SessionDriver::new(
            CannedService::default(),
            SessionController::new(SessionSettings::default()),
        );
        let report = run_sweep(
            &driver,
            &plan(&[("Austin, TX", "Austin, Texas, USA"), ("Reno, NV", "Reno, Nevada, USA")]),
        )
        .await;

        assert_eq!(report.records.len(), 4);
        assert_eq!(report.failures(), 0);
        assert_eq!(report.history.len(), 4);
        let requests = driver.service().requests.borrow();
        // baseline + two runs per city
        assert_eq!(requests.len(), 6);
        assert!(!requests[1].flood_data, "bridge collapse never carries flood data");
        assert!(requests[2].flood_data);
        assert!((requests[1].severity - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn failed_baseline_marks_city_runs_failed() {
        let service = CannedService {
            failing_city: Some("Atlantis"),
            ..CannedService::default()
        };
        let driver = SessionDriver::new(service, SessionController::new(SessionSettings::default()));
        let report = run_sweep(
            &driver,
            &plan(&[("Atlantis", "Atlantis"), ("Austin, TX", "Austin, Texas, USA")]),
        )
        .await;

        assert_eq!(report.failures(), 2);
        assert!(report.records[0].city == "Atlantis" && !report.records[0].passed());
        assert!(report.records[2].passed());
        assert_eq!(report.history.len(), 2);
    }
}
