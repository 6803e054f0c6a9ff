//! Metrics derivation: scores, labels and narratives from raw run metrics.
//!
//! Every function here is pure and total. Missing inputs are an expected
//! condition and map to `None` or an `Unknown` variant instead of an error.
//! Disconnection is always passed as a fraction in `[0, 1]`.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    COMMUTE_BAND_HIGH, COMMUTE_BAND_LOW, CONNECTIVITY_HEAVY_PERCENT,
    CONNECTIVITY_NOTICEABLE_PERCENT, CONNECTIVITY_WEIGHT, IMPACT_MINOR_MAX_DELTA,
    IMPACT_NOTICEABLE_MAX_DELTA, LABEL_FRAGILE_MIN, LABEL_MANAGEABLE_MIN, LABEL_ROBUST_MIN,
    NARRATIVE_MANY_CUT_FRACTION, NARRATIVE_SOME_CUT_FRACTION, RATIO_CAP, SCORE_MAX,
    SHOCK_CATASTROPHIC, SHOCK_MODERATE, SHOCK_SEVERE, TRAVEL_WEIGHT, TRIP_MIDDAY_MINUTES,
    TRIP_OFF_PEAK_MINUTES, TRIP_RUSH_MINUTES,
};
use crate::numbers::{positive_finite, round_f64_to_i64, round_to_tenth};

/// Headline resilience score in `[0, 100]`, one decimal place.
///
/// The delay ratio is capped at 3x so a single extreme run cannot saturate
/// the scale.
#[must_use]
pub fn resilience_score(avg_ratio: Option<f64>, disconnected_fraction: Option<f64>) -> Option<f64> {
    let ratio = positive_finite(avg_ratio)?;
    let fraction = disconnected_fraction.filter(|f| f.is_finite())?;
    let capped_ratio = ratio.min(RATIO_CAP);
    let travel_score = 1.0 / capped_ratio;
    let connectivity_score = 1.0 - fraction;
    let raw = CONNECTIVITY_WEIGHT.mul_add(connectivity_score, TRAVEL_WEIGHT * travel_score);
    round_to_tenth(raw * 100.0).map(|score| score.clamp(0.0, SCORE_MAX))
}

/// Categorical resilience band for a headline score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResilienceLabel {
    Robust,
    Manageable,
    Fragile,
    Critical,
    Unknown,
}

impl ResilienceLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Robust => "Robust",
            Self::Manageable => "Manageable",
            Self::Fragile => "Fragile",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        }
    }

    /// One-line explanation shown under the label.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Robust => "Most trips still work and delays are minor.",
            Self::Manageable => "Network is stressed, but the city can still function.",
            Self::Fragile => "Many trips are disrupted; detours become the norm.",
            Self::Critical => "Large parts of the city stop talking to each other.",
            Self::Unknown => "Run a simulation to see how this city holds up.",
        }
    }

    /// Recommended focus for planners at this band.
    #[must_use]
    pub const fn planner_priority(self) -> &'static str {
        match self {
            Self::Robust => {
                "Keep critical corridors maintained and monitor for rare extreme events."
            }
            Self::Manageable => {
                "Strengthen backup routes and add redundancy where detours are currently long."
            }
            Self::Fragile => {
                "Focus on alternative crossings, extra connectors, and better emergency routing."
            }
            Self::Critical => {
                "Plan for major investment: new connections, upgraded bridges/tunnels, and clear evacuation routes."
            }
            Self::Unknown => "Collect more runs to understand this city's behavior.",
        }
    }
}

impl fmt::Display for ResilienceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band a headline score; lower bounds are inclusive.
#[must_use]
pub fn resilience_label(score: Option<f64>) -> ResilienceLabel {
    match score {
        Some(s) if s >= LABEL_ROBUST_MIN => ResilienceLabel::Robust,
        Some(s) if s >= LABEL_MANAGEABLE_MIN => ResilienceLabel::Manageable,
        Some(s) if s >= LABEL_FRAGILE_MIN => ResilienceLabel::Fragile,
        Some(s) if !s.is_nan() => ResilienceLabel::Critical,
        _ => ResilienceLabel::Unknown,
    }
}

/// How hard the disruption hit the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShockLevel {
    Mild,
    Moderate,
    Severe,
    Catastrophic,
    Unknown,
}

impl ShockLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::Catastrophic => "Catastrophic",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Mild => "Mostly minor slowdowns; network stays connected.",
            Self::Moderate => "Annoying but survivable delays and detours.",
            Self::Severe => "A big chunk of the city feels the disruption.",
            Self::Catastrophic => {
                "40% or more of origin-destination pairs are cut off or trips take 3x longer."
            }
            Self::Unknown => "Run a scenario to see how strong the shock is.",
        }
    }

    /// Sentence about the share of severely impacted trips, if any stand out.
    #[must_use]
    pub const fn severe_trips(self) -> Option<&'static str> {
        match self {
            Self::Catastrophic => Some(
                "A large share of sampled trips are either more than twice as long or completely disconnected.",
            ),
            Self::Severe => Some(
                "A noticeable fraction of sampled trips fall into the severely impacted range (2x longer or unreachable).",
            ),
            Self::Moderate => Some(
                "Only a small minority of sampled trips are severely impacted; most remain usable.",
            ),
            Self::Mild | Self::Unknown => None,
        }
    }
}

impl fmt::Display for ShockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a run; bands are checked from most to least severe.
#[must_use]
pub fn shock_level(avg_ratio: Option<f64>, disconnected_fraction: Option<f64>) -> ShockLevel {
    let (Some(ratio), Some(fraction)) = (
        avg_ratio.filter(|r| r.is_finite()),
        disconnected_fraction.filter(|f| f.is_finite()),
    ) else {
        return ShockLevel::Unknown;
    };
    let pct = fraction * 100.0;
    let hits = |(pct_min, ratio_min): (f64, f64)| pct >= pct_min || ratio >= ratio_min;
    if hits(SHOCK_CATASTROPHIC) {
        ShockLevel::Catastrophic
    } else if hits(SHOCK_SEVERE) {
        ShockLevel::Severe
    } else if hits(SHOCK_MODERATE) {
        ShockLevel::Moderate
    } else {
        ShockLevel::Mild
    }
}

/// Expected duration band of a typical trip after the shock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommuteBand {
    pub base_minutes: f64,
    pub central_minutes: f64,
    pub low_minutes: i64,
    pub high_minutes: i64,
}

/// Trip duration band scaled by the delay ratio (plus or minus 10%).
#[must_use]
pub fn commute_band(avg_ratio: Option<f64>, base_minutes: f64) -> Option<CommuteBand> {
    let ratio = avg_ratio.filter(|r| r.is_finite())?;
    let central = base_minutes * ratio;
    Some(CommuteBand {
        base_minutes,
        central_minutes: central,
        low_minutes: round_f64_to_i64(COMMUTE_BAND_LOW * central),
        high_minutes: round_f64_to_i64(COMMUTE_BAND_HIGH * central),
    })
}

fn narrative_from_band(band: &CommuteBand, disconnected_fraction: Option<f64>) -> String {
    let base = round_f64_to_i64(band.base_minutes);
    let opening = format!(
        "A typical {base}-minute cross-town trip would feel like about {}-{} minutes after this shock",
        band.low_minutes, band.high_minutes
    );
    let cut = disconnected_fraction.unwrap_or(0.0);
    if cut >= NARRATIVE_MANY_CUT_FRACTION {
        format!("{opening}, and many sampled pairs can't reach each other at all.")
    } else if cut >= NARRATIVE_SOME_CUT_FRACTION {
        format!("{opening}. Some sampled origin-destination pairs fail completely.")
    } else {
        format!("{opening}. Most sampled trips still complete, just slower.")
    }
}

/// Commuter-facing sentence; `None` when the delay ratio is absent.
///
/// An absent disconnection fraction counts as zero.
#[must_use]
pub fn commuter_narrative(
    avg_ratio: Option<f64>,
    disconnected_fraction: Option<f64>,
    base_minutes: f64,
) -> Option<String> {
    commute_band(avg_ratio, base_minutes)
        .map(|band| narrative_from_band(&band, disconnected_fraction))
}

/// Headline sentence about how many sampled pairs stay connected.
#[must_use]
pub fn connectivity_sentence(disconnected_fraction: Option<f64>) -> Option<&'static str> {
    let pct = disconnected_fraction.filter(|f| f.is_finite())? * 100.0;
    Some(if pct >= CONNECTIVITY_HEAVY_PERCENT {
        "40% or more of sampled origin-destination pairs are cut off or see at least 2x longer routes."
    } else if pct >= CONNECTIVITY_NOTICEABLE_PERCENT {
        "A noticeable share of sampled origin-destination pairs are either cut off or heavily delayed."
    } else {
        "Most sampled origin-destination pairs remain connected, but many trips still experience slowdown."
    })
}

/// Time-of-day slots used by the commute impact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    OffPeak,
    Midday,
    RushHour,
}

impl TimeOfDay {
    pub const ALL: [Self; 3] = [Self::OffPeak, Self::Midday, Self::RushHour];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OffPeak => "Off-peak (early morning)",
            Self::Midday => "Midday",
            Self::RushHour => "Evening rush hour",
        }
    }

    #[must_use]
    pub const fn typical_minutes(self) -> f64 {
        match self {
            Self::OffPeak => TRIP_OFF_PEAK_MINUTES,
            Self::Midday => TRIP_MIDDAY_MINUTES,
            Self::RushHour => TRIP_RUSH_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripImpact {
    Minor,
    Noticeable,
    Severe,
}

impl TripImpact {
    #[must_use]
    pub fn from_delta(delta_minutes: f64) -> Self {
        if delta_minutes <= IMPACT_MINOR_MAX_DELTA {
            Self::Minor
        } else if delta_minutes <= IMPACT_NOTICEABLE_MAX_DELTA {
            Self::Noticeable
        } else {
            Self::Severe
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minor => "Minor impact",
            Self::Noticeable => "Noticeable impact",
            Self::Severe => "Severe impact",
        }
    }
}

/// One row of the commute impact table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayRow {
    pub slot: TimeOfDay,
    pub before_minutes: f64,
    pub after_minutes: f64,
    pub delta_minutes: f64,
    pub impact: TripImpact,
}

/// Scale typical trip durations by the delay factor.
///
/// `None` without a usable ratio: no sampled trip had a path to time.
#[must_use]
pub fn time_of_day_impact(avg_ratio: Option<f64>) -> Option<Vec<TimeOfDayRow>> {
    let factor = positive_finite(avg_ratio)?;
    let rows = TimeOfDay::ALL
        .into_iter()
        .map(|slot| {
            let before = slot.typical_minutes();
            let after = before * factor;
            let delta = after - before;
            TimeOfDayRow {
                slot,
                before_minutes: before,
                after_minutes: after,
                delta_minutes: delta,
                impact: TripImpact::from_delta(delta),
            }
        })
        .collect();
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COMMUTE_BASE_MINUTES;

    #[test]
    fn score_is_perfect_without_disruption() {
        assert_eq!(resilience_score(Some(1.0), Some(0.0)), Some(100.0));
    }

    #[test]
    fn score_at_worst_case_matches_weighted_formula() {
        assert_eq!(resilience_score(Some(3.0), Some(1.0)), Some(13.3));
    }

    #[test]
    fn ratio_cap_collapses_extreme_runs() {
        for fraction in [0.0, 0.2, 0.75] {
            assert_eq!(
                resilience_score(Some(10.0), Some(fraction)),
                resilience_score(Some(3.0), Some(fraction))
            );
        }
    }

    #[test]
    fn score_needs_both_inputs() {
        assert_eq!(resilience_score(None, Some(0.1)), None);
        assert_eq!(resilience_score(Some(1.2), None), None);
    }

    #[test]
    fn score_is_clamped_for_sub_unit_ratios() {
        assert_eq!(resilience_score(Some(0.5), Some(0.0)), Some(100.0));
    }

    #[test]
    fn label_boundaries_are_inclusive_on_lower_bound() {
        assert_eq!(resilience_label(Some(80.0)), ResilienceLabel::Robust);
        assert_eq!(resilience_label(Some(79.9)), ResilienceLabel::Manageable);
        assert_eq!(resilience_label(Some(60.0)), ResilienceLabel::Manageable);
        assert_eq!(resilience_label(Some(40.0)), ResilienceLabel::Fragile);
        assert_eq!(resilience_label(Some(39.9)), ResilienceLabel::Critical);
        assert_eq!(resilience_label(None), ResilienceLabel::Unknown);
        assert_eq!(resilience_label(Some(f64::NAN)), ResilienceLabel::Unknown);
    }

    #[test]
    fn disconnection_dominates_low_ratio() {
        assert_eq!(shock_level(Some(1.0), Some(0.45)), ShockLevel::Catastrophic);
    }

    #[test]
    fn shock_bands_checked_in_descending_order() {
        assert_eq!(shock_level(Some(3.0), Some(0.0)), ShockLevel::Catastrophic);
        assert_eq!(shock_level(Some(2.0), Some(0.0)), ShockLevel::Severe);
        assert_eq!(shock_level(Some(1.0), Some(0.15)), ShockLevel::Severe);
        assert_eq!(shock_level(Some(1.4), Some(0.0)), ShockLevel::Moderate);
        assert_eq!(shock_level(Some(1.0), Some(0.05)), ShockLevel::Moderate);
        assert_eq!(shock_level(Some(1.39), Some(0.049)), ShockLevel::Mild);
        assert_eq!(shock_level(None, Some(0.5)), ShockLevel::Unknown);
    }

    #[test]
    fn narrative_band_uses_rounded_ten_percent_spread() {
        let text = commuter_narrative(Some(1.5), Some(0.0), COMMUTE_BASE_MINUTES).unwrap();
        assert!(text.contains("about 27-33 minutes"), "{text}");
        assert!(text.ends_with("Most sampled trips still complete, just slower."));
    }

    #[test]
    fn narrative_template_follows_disconnection_band() {
        let some = commuter_narrative(Some(1.2), Some(0.05), 20.0).unwrap();
        assert!(some.contains("Some sampled origin-destination pairs fail completely."));
        let many = commuter_narrative(Some(1.2), Some(0.4), 20.0).unwrap();
        assert!(many.contains("can't reach each other at all"));
        let none = commuter_narrative(Some(1.2), None, 20.0).unwrap();
        assert!(none.contains("Most sampled trips still complete"));
        assert_eq!(commuter_narrative(None, Some(0.4), 20.0), None);
    }

    #[test]
    fn connectivity_sentence_bands() {
        assert!(connectivity_sentence(Some(0.41)).unwrap().starts_with("40% or more"));
        assert!(connectivity_sentence(Some(0.10)).unwrap().starts_with("A noticeable share"));
        assert!(connectivity_sentence(Some(0.0)).unwrap().starts_with("Most sampled"));
        assert_eq!(connectivity_sentence(None), None);
    }

    #[test]
    fn time_of_day_scales_each_slot() {
        let rows = time_of_day_impact(Some(1.5)).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].after_minutes, 24.0);
        assert_eq!(rows[0].impact, TripImpact::Noticeable);
        assert_eq!(rows[2].delta_minutes, 13.0);
        assert_eq!(rows[2].impact, TripImpact::Severe);
    }

    #[test]
    fn time_of_day_unavailable_without_ratio() {
        assert_eq!(time_of_day_impact(None), None);
        assert_eq!(time_of_day_impact(Some(f64::NAN)), None);
        assert_eq!(time_of_day_impact(Some(0.0)), None);
    }

    #[test]
    fn faster_trips_report_negative_delta() {
        let rows = time_of_day_impact(Some(0.9)).unwrap();
        assert!((rows[0].delta_minutes + 1.6).abs() < 1e-9);
        assert_eq!(rows[0].impact, TripImpact::Minor);
    }
}
