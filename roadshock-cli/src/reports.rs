use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use roadshock_core::display::{format_percent, format_ratio, format_score};
use roadshock_core::{
    CitySummary, DashboardTotals, History, dashboard_totals, summarize_by_city,
};
use serde::Serialize;

use crate::sweep::{RunOutcome, RunRecord, SweepReport};

#[derive(Serialize)]
struct JsonReport<'a> {
    runs: &'a [RunRecord],
    cities: Vec<CitySummary>,
    totals: DashboardTotals,
    history: &'a History,
}

pub fn generate_json_report(out: &mut dyn Write, report: &SweepReport) -> Result<()> {
    let body = JsonReport {
        runs: &report.records,
        cities: summarize_by_city(&report.history),
        totals: dashboard_totals(&report.history),
        history: &report.history,
    };
    serde_json::to_writer_pretty(&mut *out, &body)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &SweepReport) -> Result<()> {
    writeln!(out, "# Roadshock Disruption Report\n")?;

    let totals = dashboard_totals(&report.history);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Runs**: {}", report.records.len())?;
    writeln!(out, "- **Failed**: {}", report.failures())?;
    writeln!(out, "- **Cities tested**: {}", totals.cities_tested)?;
    if let Some(city) = &totals.most_resilient_city {
        writeln!(out, "- **Most resilient**: {city}")?;
    }
    writeln!(out)?;

    writeln!(out, "## Runs\n")?;
    writeln!(
        out,
        "| City | Scenario | Severity | Score | Shock | Delay | Disconnected |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for record in &report.records {
        match &record.outcome {
            RunOutcome::Completed {
                resilience_score,
                resilience_label,
                shock_level,
                avg_ratio,
                disconnected_pct,
                ..
            } => writeln!(
                out,
                "| {} | {} | {:.2} | {} ({resilience_label}) | {shock_level} | {} | {} |",
                record.city,
                record.scenario,
                record.severity,
                format_score(*resilience_score),
                format_ratio(*avg_ratio),
                format_percent(*disconnected_pct),
            )?,
            RunOutcome::Failed { message } => writeln!(
                out,
                "| {} | {} | {:.2} | failed: {message} | | | |",
                record.city, record.scenario, record.severity
            )?,
        }
    }

    let cities = summarize_by_city(&report.history);
    if !cities.is_empty() {
        writeln!(out, "\n## City ranking\n")?;
        writeln!(out, "| City | Runs | Avg resilience | Avg disconnected |")?;
        writeln!(out, "|---|---|---|---|")?;
        for row in &cities {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                row.city_label,
                row.run_count,
                format_score(row.avg_resilience),
                format_percent(row.avg_disconnected_pct)
            )?;
        }
    }
    Ok(())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &SweepReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Disruption Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;

    let total = report.records.len();
    let failed = report.failures();
    writeln!(out, "Runs: {total}")?;
    writeln!(out, "Completed: {}", (total - failed).to_string().green())?;
    writeln!(out, "Failed: {}", failed.to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for record in &report.records {
        match &record.outcome {
            RunOutcome::Completed {
                resilience_score,
                resilience_label,
                shock_level,
                avg_ratio,
                median_ratio,
                disconnected_pct,
                removed_edges,
                remaining_edges,
                narrative,
            } => {
                writeln!(
                    out,
                    "{} {} · {}",
                    "✅".green(),
                    record.city.bold(),
                    record.scenario
                )?;
                writeln!(
                    out,
                    "   Resilience: {} ({resilience_label}), shock {shock_level}",
                    format_score(*resilience_score)
                )?;
                writeln!(
                    out,
                    "   Delay factor: {} (median {}), disconnected: {}",
                    format_ratio(*avg_ratio),
                    format_ratio(*median_ratio),
                    format_percent(*disconnected_pct)
                )?;
                writeln!(
                    out,
                    "   Roads removed: {removed_edges}, remaining: {remaining_edges}"
                )?;
                writeln!(out, "   {narrative}")?;
            }
            RunOutcome::Failed { message } => {
                writeln!(
                    out,
                    "{} {} · {}",
                    "❌".red(),
                    record.city.bold(),
                    record.scenario
                )?;
                writeln!(out, "   {}", message.red())?;
            }
        }
        writeln!(out)?;
    }

    let cities = summarize_by_city(&report.history);
    if cities.len() > 1 {
        writeln!(out, "{}", "🏙️  City ranking".bright_yellow().bold())?;
        writeln!(out, "{}", "===============".yellow())?;
        for (rank, row) in cities.iter().enumerate() {
            writeln!(
                out,
                "{}. {} - {} avg resilience over {} run(s), {} disconnected",
                rank + 1,
                row.city_label,
                format_score(row.avg_resilience),
                row.run_count,
                format_percent(row.avg_disconnected_pct)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadshock_core::Scenario;

    fn report() -> SweepReport {
        SweepReport {
            records: vec![
                RunRecord {
                    city: "Tulsa, OK".to_string(),
                    scenario: Scenario::TunnelClosure,
                    severity: 0.25,
                    outcome: RunOutcome::Completed {
                        resilience_score: Some(71.2),
                        resilience_label: "Manageable".to_string(),
                        shock_level: "Moderate".to_string(),
                        avg_ratio: Some(1.45),
                        median_ratio: Some(1.3),
                        disconnected_pct: Some(6.0),
                        removed_edges: 12,
                        remaining_edges: 880,
                        narrative: "Most sampled trips still complete, just slower.".to_string(),
                    },
                },
                RunRecord {
                    city: "Tulsa, OK".to_string(),
                    scenario: Scenario::HighwayFlood,
                    severity: 0.25,
                    outcome: RunOutcome::Failed {
                        message: "simulation service error: service responded with status 500"
                            .to_string(),
                    },
                },
            ],
            history: History::new(),
        }
    }

    #[test]
    fn markdown_lists_completed_and_failed_runs() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &report()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Roadshock Disruption Report"));
        assert!(text.contains("| Tulsa, OK | Tunnel Closure | 0.25 | 71.2 (Manageable) | Moderate | 1.45× | 6.0% |"));
        assert!(text.contains("failed: simulation service error"));
        assert!(text.contains("- **Failed**: 1"));
    }

    #[test]
    fn json_report_tags_outcomes() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["runs"][0]["status"], "completed");
        assert_eq!(value["runs"][0]["scenario"], "Tunnel Closure");
        assert_eq!(value["runs"][1]["status"], "failed");
        assert_eq!(value["totals"]["total_runs"], 0);
        assert!(value["history"].as_array().unwrap().is_empty());
    }

    #[test]
    fn console_report_counts_failures() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &report(), Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("Resilience: 71.2 (Manageable), shock Moderate"));
        assert!(text.contains("Delay factor: 1.45× (median 1.30×), disconnected: 6.0%"), "{text}");
    }
}
