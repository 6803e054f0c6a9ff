//! Run request builder: user controls to simulation payload.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASELINE_SAMPLE_PAIRS, BASELINE_SEVERITY, INTENSITY_DEFAULT_PERCENT, INTENSITY_MAX_PERCENT,
    INTENSITY_MIN_PERCENT, SAMPLE_PAIRS_DEFAULT, SAMPLE_PAIRS_MAX, SAMPLE_PAIRS_MIN, SEVERITY_MAX,
    SEVERITY_MIN,
};
use crate::error::ConfigError;
use crate::numbers::i32_to_f64;
use crate::scenario::Scenario;

/// Controls the user edits before pressing "run".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub city_query: String,
    pub scenario: Option<Scenario>,
    pub intensity_percent: i32,
    pub sample_pairs: u32,
    #[serde(default)]
    pub flood_data: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            city_query: String::new(),
            scenario: None,
            intensity_percent: INTENSITY_DEFAULT_PERCENT,
            sample_pairs: SAMPLE_PAIRS_DEFAULT,
            flood_data: false,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn new(city_query: impl Into<String>, scenario: Scenario) -> Self {
        Self {
            city_query: city_query.into(),
            scenario: Some(scenario),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_intensity(mut self, intensity_percent: i32) -> Self {
        self.intensity_percent = intensity_percent;
        self
    }

    #[must_use]
    pub const fn with_sample_pairs(mut self, sample_pairs: u32) -> Self {
        self.sample_pairs = sample_pairs;
        self
    }

    #[must_use]
    pub const fn with_flood_data(mut self, flood_data: bool) -> Self {
        self.flood_data = flood_data;
        self
    }

    /// Flood data flag after coercion: only `Highway Flood` may carry it.
    #[must_use]
    pub fn effective_flood_data(&self) -> bool {
        self.flood_data && self.scenario.is_some_and(Scenario::accepts_flood_data)
    }

    /// Severity the current slider position maps to.
    #[must_use]
    pub fn severity(&self) -> f64 {
        severity_from_intensity(self.intensity_percent)
    }
}

/// Payload for the simulation service's run endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub city: String,
    pub scenario: Scenario,
    pub severity: f64,
    #[serde(rename = "n_pairs")]
    pub sample_pairs: u32,
    #[serde(rename = "use_usgs_flood")]
    pub flood_data: bool,
}

/// Map the intensity slider onto the service's severity range.
///
/// Out-of-range input is clamped, never rejected. Both slider ends map
/// exactly onto the severity bounds.
#[must_use]
pub fn severity_from_intensity(intensity_percent: i32) -> f64 {
    let clamped = intensity_percent.clamp(INTENSITY_MIN_PERCENT, INTENSITY_MAX_PERCENT);
    if clamped == INTENSITY_MAX_PERCENT {
        return SEVERITY_MAX;
    }
    let span = i32_to_f64(INTENSITY_MAX_PERCENT - INTENSITY_MIN_PERCENT);
    let t = i32_to_f64(clamped - INTENSITY_MIN_PERCENT) / span;
    (SEVERITY_MAX - SEVERITY_MIN).mul_add(t, SEVERITY_MIN)
}

/// Validate controls and produce the request payload.
///
/// # Errors
///
/// Returns [`ConfigError`] when the city query is blank or no scenario is
/// selected. No request should be issued in that case.
pub fn build_run_request(config: &RunConfig) -> Result<RunRequest, ConfigError> {
    let city = config.city_query.trim();
    if city.is_empty() {
        return Err(ConfigError::MissingCity);
    }
    let scenario = config.scenario.ok_or(ConfigError::MissingScenario)?;
    Ok(RunRequest {
        city: city.to_string(),
        scenario,
        severity: config.severity(),
        sample_pairs: config.sample_pairs.clamp(SAMPLE_PAIRS_MIN, SAMPLE_PAIRS_MAX),
        flood_data: config.effective_flood_data(),
    })
}

/// Near-zero disruption used only to fetch the intact network geometry.
#[must_use]
pub fn baseline_request(city_query: &str) -> RunRequest {
    RunRequest {
        city: city_query.trim().to_string(),
        scenario: Scenario::RandomFailure,
        severity: BASELINE_SEVERITY,
        sample_pairs: BASELINE_SAMPLE_PAIRS,
        flood_data: false,
    }
}
