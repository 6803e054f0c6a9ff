//! Derived insight: the atomic bundle of score, labels and narrative for a run.
use serde::Serialize;

use crate::constants::COMMUTE_BASE_MINUTES;
use crate::metrics::{
    CommuteBand, ResilienceLabel, ShockLevel, TimeOfDayRow, commute_band, connectivity_sentence,
    resilience_label, resilience_score, shock_level, time_of_day_impact,
};
use crate::result::RunResult;

const NARRATIVE_UNAVAILABLE: &str = "Travel-time impact is not available for this run.";

/// Everything the insight panels show for one run.
///
/// Only [`derive_insight`] builds these, so every field comes from the same
/// [`RunResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedInsight {
    resilience_score: Option<f64>,
    resilience_label: ResilienceLabel,
    shock_level: ShockLevel,
    narrative: String,
    delay_factor: Option<f64>,
    disconnected_fraction: Option<f64>,
    commute: Option<CommuteBand>,
    connectivity: Option<&'static str>,
    time_of_day: Option<Vec<TimeOfDayRow>>,
}

impl DerivedInsight {
    #[must_use]
    pub const fn resilience_score(&self) -> Option<f64> {
        self.resilience_score
    }

    #[must_use]
    pub const fn resilience_label(&self) -> ResilienceLabel {
        self.resilience_label
    }

    #[must_use]
    pub const fn shock_level(&self) -> ShockLevel {
        self.shock_level
    }

    #[must_use]
    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    /// The delay ratio every other field was computed from.
    #[must_use]
    pub const fn delay_factor(&self) -> Option<f64> {
        self.delay_factor
    }

    #[must_use]
    pub const fn disconnected_fraction(&self) -> Option<f64> {
        self.disconnected_fraction
    }

    #[must_use]
    pub const fn commute(&self) -> Option<&CommuteBand> {
        self.commute.as_ref()
    }

    #[must_use]
    pub const fn connectivity(&self) -> Option<&'static str> {
        self.connectivity
    }

    /// `None` when the run has no delay ratio to scale trips by.
    #[must_use]
    pub fn time_of_day(&self) -> Option<&[TimeOfDayRow]> {
        self.time_of_day.as_deref()
    }

    /// True when either raw metric was missing from the response.
    #[must_use]
    pub const fn has_gap(&self) -> bool {
        self.delay_factor.is_none() || self.disconnected_fraction.is_none()
    }
}

/// Derive the insight for a run using the default 20-minute reference trip.
#[must_use]
pub fn derive_insight(result: &RunResult) -> DerivedInsight {
    derive_insight_with(result, COMMUTE_BASE_MINUTES)
}

/// Derive the insight for a run with a custom reference trip length.
#[must_use]
pub fn derive_insight_with(result: &RunResult, base_minutes: f64) -> DerivedInsight {
    let ratio = result.avg_ratio;
    let fraction = result.disconnected_fraction;
    let score = resilience_score(ratio, fraction);
    let commute = commute_band(ratio, base_minutes);
    let narrative = crate::metrics::commuter_narrative(ratio, fraction, base_minutes)
        .unwrap_or_else(|| NARRATIVE_UNAVAILABLE.to_string());
    DerivedInsight {
        resilience_score: score,
        resilience_label: resilience_label(score),
        shock_level: shock_level(ratio, fraction),
        narrative,
        delay_factor: ratio,
        disconnected_fraction: fraction,
        commute,
        connectivity: connectivity_sentence(fraction),
        time_of_day: time_of_day_impact(ratio),
    }
}
