//! Append-only run history and the cross-city summaries built from it.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::numbers::{mean, positive_finite};
use crate::scenario::Scenario;

/// One completed run, frozen at the moment it was adopted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub city_label: String,
    pub city_query: String,
    pub scenario: Scenario,
    pub severity: f64,
    pub sample_pair_count: u32,
    pub avg_ratio: Option<f64>,
    /// Disconnected share in percent, `[0, 100]`.
    pub pct_disconnected: Option<f64>,
    pub removed_edge_count: u64,
    pub resilience_score: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Immutable snapshot of the session's run log.
///
/// Cloning is cheap. Appending produces a new snapshot and leaves every
/// existing clone as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History(Arc<Vec<HistoryEntry>>);

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.0.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    /// True when both snapshots share the same backing log.
    #[must_use]
    pub fn same_snapshot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for History {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for History {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<HistoryEntry>::deserialize(deserializer).map(|entries| Self(Arc::new(entries)))
    }
}

/// Return a new snapshot with `entry` appended.
#[must_use]
pub fn append_entry(history: &History, entry: HistoryEntry) -> History {
    let mut entries = Vec::with_capacity(history.len() + 1);
    entries.extend_from_slice(history.entries());
    entries.push(entry);
    History(Arc::new(entries))
}

/// Per-city aggregate for the multi-city comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub city_label: String,
    pub run_count: usize,
    /// `mean(1 / avg_ratio) * 100` over runs with a usable ratio.
    pub avg_resilience: Option<f64>,
    pub avg_disconnected_pct: Option<f64>,
}

/// Group the history by city label, best average resilience first.
///
/// Runs without a positive ratio still count toward `run_count` but are
/// left out of `avg_resilience`. Cities with no usable ratio sort last.
#[must_use]
pub fn summarize_by_city(history: &History) -> Vec<CitySummary> {
    let mut groups: Vec<(&str, Vec<&HistoryEntry>)> = Vec::new();
    for entry in history {
        match groups.iter_mut().find(|(label, _)| *label == entry.city_label) {
            Some((_, runs)) => runs.push(entry),
            None => groups.push((entry.city_label.as_str(), vec![entry])),
        }
    }

    let mut rows: Vec<CitySummary> = groups
        .into_iter()
        .map(|(label, runs)| CitySummary {
            city_label: label.to_string(),
            run_count: runs.len(),
            avg_resilience: mean(
                runs.iter()
                    .filter_map(|run| positive_finite(run.avg_ratio))
                    .map(|ratio| 100.0 / ratio),
            ),
            avg_disconnected_pct: mean(
                runs.iter()
                    .filter_map(|run| run.pct_disconnected)
                    .filter(|pct| pct.is_finite()),
            ),
        })
        .collect();

    rows.sort_by(|a, b| {
        compare_resilience(a.avg_resilience, b.avg_resilience)
            .then_with(|| a.city_label.cmp(&b.city_label))
    });
    rows
}

fn compare_resilience(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One point of the run-by-run resilience chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub run: usize,
    pub label: String,
    pub resilience_score: Option<f64>,
}

#[must_use]
pub fn resilience_trend(history: &History) -> Vec<TrendPoint> {
    history
        .iter()
        .enumerate()
        .map(|(idx, entry)| TrendPoint {
            run: idx + 1,
            label: format!("Run {}", idx + 1),
            resilience_score: entry.resilience_score,
        })
        .collect()
}

/// Headline counters for the summary dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardTotals {
    pub total_runs: usize,
    pub cities_tested: usize,
    pub most_resilient_city: Option<String>,
}

#[must_use]
pub fn dashboard_totals(history: &History) -> DashboardTotals {
    let summaries = summarize_by_city(history);
    let most_resilient_city = summaries
        .iter()
        .find(|row| row.avg_resilience.is_some())
        .map(|row| row.city_label.clone());
    DashboardTotals {
        total_runs: history.len(),
        cities_tested: summaries.len(),
        most_resilient_city,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(city: &str, avg_ratio: Option<f64>, pct: Option<f64>) -> HistoryEntry {
        HistoryEntry {
            city_label: city.to_string(),
            city_query: format!("{city}, USA"),
            scenario: Scenario::BridgeCollapse,
            severity: 0.25,
            sample_pair_count: 40,
            avg_ratio,
            pct_disconnected: pct,
            removed_edge_count: 3,
            resilience_score: None,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn append_leaves_old_snapshot_untouched() {
        let empty = History::new();
        let one = append_entry(&empty, entry("Chicago", Some(1.2), Some(4.0)));
        let two = append_entry(&one, entry("Dallas", Some(1.5), Some(8.0)));
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert_eq!(one.entries()[0], two.entries()[0]);
        assert!(!one.same_snapshot(&two));
    }

    #[test]
    fn zero_and_missing_ratios_are_excluded_not_zeroed() {
        let mut history = History::new();
        history = append_entry(&history, entry("Chicago", Some(2.0), Some(10.0)));
        history = append_entry(&history, entry("Chicago", Some(0.0), Some(30.0)));
        history = append_entry(&history, entry("Chicago", None, None));
        let rows = summarize_by_city(&history);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].run_count, 3);
        assert_eq!(rows[0].avg_resilience, Some(50.0));
        assert_eq!(rows[0].avg_disconnected_pct, Some(20.0));
    }

    #[test]
    fn rows_sort_by_descending_resilience() {
        let mut history = History::new();
        history = append_entry(&history, entry("Dallas", Some(2.0), None));
        history = append_entry(&history, entry("Pittsburgh", None, None));
        history = append_entry(&history, entry("Chicago", Some(1.25), None));
        let labels: Vec<_> = summarize_by_city(&history)
            .into_iter()
            .map(|row| row.city_label)
            .collect();
        assert_eq!(labels, ["Chicago", "Dallas", "Pittsburgh"]);
    }

    #[test]
    fn trend_and_totals_follow_history() {
        let mut first = entry("Chicago", Some(1.25), Some(5.0));
        first.resilience_score = Some(89.0);
        let mut history = append_entry(&History::new(), first);
        history = append_entry(&history, entry("Dallas", Some(2.0), Some(12.0)));

        let trend = resilience_trend(&history);
        assert_eq!(trend[0].label, "Run 1");
        assert_eq!(trend[0].resilience_score, Some(89.0));
        assert_eq!(trend[1].run, 2);

        let totals = dashboard_totals(&history);
        assert_eq!(totals.total_runs, 2);
        assert_eq!(totals.cities_tested, 2);
        assert_eq!(totals.most_resilient_city.as_deref(), Some("Chicago"));
        assert_eq!(dashboard_totals(&History::new()), DashboardTotals::default());
    }

    #[test]
    fn history_serializes_as_plain_list() {
        let history = append_entry(&History::new(), entry("Phoenix", Some(1.1), Some(0.0)));
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.starts_with('['));
        let back: History = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
    }
}
