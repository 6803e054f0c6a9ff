//! Simulation run results and the response normalization boundary.
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::numbers::positive_finite;

/// Unit the service uses for `pct_disconnected` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisconnectedUnits {
    /// Percentage in `[0, 100]`.
    #[default]
    Percent,
    /// Fraction in `[0, 1]`.
    Fraction,
}

/// Response body of the run endpoint, exactly as the service sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunResponse {
    #[serde(default)]
    pub avg_ratio: Option<f64>,
    #[serde(default)]
    pub median_ratio: Option<f64>,
    #[serde(default)]
    pub pct_disconnected: Option<f64>,
    #[serde(default)]
    pub n_removed_edges: u64,
    #[serde(default)]
    pub n_pairs: u32,
    #[serde(default)]
    pub edges_geojson: serde_json::Value,
    #[serde(default)]
    pub removed_edges_geojson: serde_json::Value,
}

/// Opaque geometry payload handed to the map layer untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry(Arc<serde_json::Value>);

impl Geometry {
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(Arc::new(value))
    }

    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    /// Number of features when the payload is a `FeatureCollection`.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.0
            .get("features")
            .and_then(serde_json::Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Normalized outcome of one simulation run.
///
/// `disconnected_fraction` is always in `[0, 1]`; nothing downstream
/// re-interprets units.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub avg_ratio: Option<f64>,
    pub median_ratio: Option<f64>,
    pub disconnected_fraction: Option<f64>,
    pub removed_edge_count: u64,
    pub sampled_pair_count: u32,
    pub all_edges: Geometry,
    pub removed_edges: Geometry,
}

impl RunResult {
    /// Convert a wire response into a normalized result.
    #[must_use]
    pub fn from_response(response: RunResponse, units: DisconnectedUnits) -> Self {
        Self {
            avg_ratio: positive_finite(response.avg_ratio),
            median_ratio: positive_finite(response.median_ratio),
            disconnected_fraction: disconnected_fraction(response.pct_disconnected, units),
            removed_edge_count: response.n_removed_edges,
            sampled_pair_count: response.n_pairs,
            all_edges: Geometry::new(response.edges_geojson),
            removed_edges: Geometry::new(response.removed_edges_geojson),
        }
    }

    /// Disconnected share as a percentage, for display.
    #[must_use]
    pub fn disconnected_percent(&self) -> Option<f64> {
        self.disconnected_fraction.map(|f| f * 100.0)
    }

    /// Roads still open after the disruption.
    #[must_use]
    pub fn remaining_edge_count(&self) -> u64 {
        let total = u64::try_from(self.all_edges.feature_count()).unwrap_or(u64::MAX);
        total.saturating_sub(self.removed_edge_count)
    }
}

/// The single place where the disconnection unit is interpreted.
#[must_use]
pub fn disconnected_fraction(raw: Option<f64>, units: DisconnectedUnits) -> Option<f64> {
    let value = raw.filter(|v| v.is_finite())?;
    let fraction = match units {
        DisconnectedUnits::Percent => value / 100.0,
        DisconnectedUnits::Fraction => value,
    };
    Some(fraction.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn percent_units_normalize_to_fraction() {
        assert_eq!(disconnected_fraction(Some(45.0), DisconnectedUnits::Percent), Some(0.45));
        assert_eq!(disconnected_fraction(Some(0.45), DisconnectedUnits::Fraction), Some(0.45));
        assert_eq!(disconnected_fraction(Some(250.0), DisconnectedUnits::Percent), Some(1.0));
        assert_eq!(disconnected_fraction(Some(-3.0), DisconnectedUnits::Fraction), Some(0.0));
        assert_eq!(disconnected_fraction(Some(f64::NAN), DisconnectedUnits::Percent), None);
        assert_eq!(disconnected_fraction(None, DisconnectedUnits::Percent), None);
    }

    #[test]
    fn response_with_missing_metrics_parses() {
        let response: RunResponse = serde_json::from_value(json!({
            "n_removed_edges": 12,
            "n_pairs": 40,
            "edges_geojson": {"type": "FeatureCollection", "features": [{}, {}, {}]}
        }))
        .unwrap();
        let result = RunResult::from_response(response, DisconnectedUnits::Percent);
        assert_eq!(result.avg_ratio, None);
        assert_eq!(result.disconnected_fraction, None);
        assert_eq!(result.removed_edge_count, 12);
        assert_eq!(result.all_edges.feature_count(), 3);
        assert!(result.removed_edges.is_empty());
    }

    #[test]
    fn degenerate_ratios_are_treated_as_absent() {
        let response = RunResponse {
            avg_ratio: Some(0.0),
            median_ratio: Some(f64::INFINITY),
            ..RunResponse::default()
        };
        let result = RunResult::from_response(response, DisconnectedUnits::Percent);
        assert_eq!(result.avg_ratio, None);
        assert_eq!(result.median_ratio, None);
    }

    #[test]
    fn remaining_edges_never_underflow() {
        let response = RunResponse {
            n_removed_edges: 10,
            edges_geojson: json!({"features": [{}, {}]}),
            ..RunResponse::default()
        };
        let result = RunResult::from_response(response, DisconnectedUnits::Percent);
        assert_eq!(result.remaining_edge_count(), 0);
    }
}
