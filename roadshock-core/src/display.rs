//! Text formatting shared by the dashboard panels and CLI reports.

/// Placeholder for metrics the service did not report.
pub const NOT_AVAILABLE: &str = "n/a";

/// Resilience score with one decimal, e.g. `72.4`.
#[must_use]
pub fn format_score(score: Option<f64>) -> String {
    score
        .filter(|s| s.is_finite())
        .map_or_else(|| NOT_AVAILABLE.to_string(), |s| format!("{s:.1}"))
}

/// Percentage with one decimal, e.g. `12.5%`.
#[must_use]
pub fn format_percent(percent: Option<f64>) -> String {
    percent
        .filter(|p| p.is_finite())
        .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{p:.1}%"))
}

/// Delay factor with two decimals, e.g. `1.53×`.
#[must_use]
pub fn format_ratio(ratio: Option<f64>) -> String {
    ratio
        .filter(|r| r.is_finite())
        .map_or_else(|| NOT_AVAILABLE.to_string(), |r| format!("{r:.2}×"))
}
