//! Roadshock Session Engine
//!
//! Platform-agnostic core of the Roadshock road-network resilience dashboard.
//! This crate sequences the city → baseline → disruption workflow and turns
//! raw simulation metrics into scores, labels and narratives, without any UI
//! or network dependencies.

pub mod city;
pub mod constants;
pub mod display;
pub mod driver;
pub mod error;
pub mod history;
pub mod insight;
pub mod metrics;
pub mod numbers;
pub mod request;
pub mod result;
pub mod scenario;
pub mod service;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use city::{CityCatalog, CityRef, preset_cities, resolve_city_query};
pub use driver::SessionDriver;
pub use error::{ConfigError, ServiceError, SessionError, SessionResult};
pub use history::{
    CitySummary, DashboardTotals, History, HistoryEntry, TrendPoint, append_entry,
    dashboard_totals, resilience_trend, summarize_by_city,
};
pub use insight::{DerivedInsight, derive_insight, derive_insight_with};
pub use metrics::{
    CommuteBand, ResilienceLabel, ShockLevel, TimeOfDay, TimeOfDayRow, TripImpact, commute_band,
    commuter_narrative, connectivity_sentence, resilience_label, resilience_score, shock_level,
    time_of_day_impact,
};
pub use request::{
    RunConfig, RunRequest, baseline_request, build_run_request, severity_from_intensity,
};
pub use result::{DisconnectedUnits, Geometry, RunResponse, RunResult, disconnected_fraction};
pub use scenario::{Scenario, ScenarioInfo, UnknownScenario};
pub use service::{ScenarioListing, SimulationService};
pub use session::{
    BaselineTicket, Clock, Epoch, PublishedRun, ReadyPhase, RunTicket, SessionController,
    SessionPhase,
};
pub use settings::SessionSettings;
