use roadshock_core::display::{format_percent, format_score};
use roadshock_core::{History, dashboard_totals, resilience_trend, summarize_by_city};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone, Default)]
pub struct Props {
    #[prop_or_default]
    pub history: History,
}

/// Session-wide comparison of every run so far.
#[function_component(MultiCity)]
pub fn multi_city(p: &Props) -> Html {
    if p.history.is_empty() {
        return html! {
            <section class="panel multi-city empty" aria-label="Multi-city comparison">
                <p class="muted">{ "Completed runs will be compared here." }</p>
            </section>
        };
    }

    let totals = dashboard_totals(&p.history);
    let summaries = summarize_by_city(&p.history);
    let trend = resilience_trend(&p.history);

    html! {
        <section class="panel multi-city" aria-label="Multi-city comparison">
            <h3>{ "Multi-city comparison" }</h3>
            <div class="totals">
                <div class="stat">
                    <span class="stat-value">{ totals.total_runs.to_string() }</span>
                    <span class="stat-label">{ "Total runs" }</span>
                </div>
                <div class="stat">
                    <span class="stat-value">{ totals.cities_tested.to_string() }</span>
                    <span class="stat-label">{ "Cities tested" }</span>
                </div>
                <div class="stat">
                    <span class="stat-value">
                        { totals.most_resilient_city.clone().unwrap_or_else(|| "n/a".to_string()) }
                    </span>
                    <span class="stat-label">{ "Most resilient" }</span>
                </div>
            </div>

            <table class="city-ranking">
                <thead>
                    <tr>
                        <th scope="col">{ "City" }</th>
                        <th scope="col">{ "Runs" }</th>
                        <th scope="col">{ "Avg resilience" }</th>
                        <th scope="col">{ "Avg disconnected" }</th>
                    </tr>
                </thead>
                <tbody>
                    { for summaries.iter().map(|row| html! {
                        <tr>
                            <th scope="row">{ row.city_label.clone() }</th>
                            <td>{ row.run_count.to_string() }</td>
                            <td>{ format_score(row.avg_resilience) }</td>
                            <td>{ format_percent(row.avg_disconnected_pct) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>

            <ol class="resilience-trend" aria-label="Resilience by run">
                { for trend.iter().map(|point| {
                    let width = point.resilience_score.unwrap_or(0.0).clamp(0.0, 100.0);
                    html! {
                        <li>
                            <span class="trend-label">{ point.label.clone() }</span>
                            <span class="trend-bar" style={format!("width: {width:.0}%")}></span>
                            <span class="trend-value">{ format_score(point.resilience_score) }</span>
                        </li>
                    }
                }) }
            </ol>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::executor::block_on;
    use roadshock_core::{HistoryEntry, Scenario, append_entry};
    use yew::LocalServerRenderer;

    fn run(city: &str, avg_ratio: f64, pct: f64, score: f64) -> HistoryEntry {
        HistoryEntry {
            city_label: city.to_string(),
            city_query: format!("{city}, USA"),
            scenario: Scenario::RandomFailure,
            severity: 0.1,
            sample_pair_count: 30,
            avg_ratio: Some(avg_ratio),
            pct_disconnected: Some(pct),
            removed_edge_count: 2,
            resilience_score: Some(score),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn empty_history_shows_placeholder() {
        let html = block_on(LocalServerRenderer::<MultiCity>::new().render());
        assert!(html.contains("Completed runs will be compared here."));
    }

    #[test]
    fn ranks_cities_and_lists_trend() {
        let history = [
            run("Denver, CO", 2.0, 10.0, 70.0),
            run("Austin, TX", 1.25, 2.0, 85.0),
            run("Denver, CO", 2.0, 30.0, 60.0),
        ]
        .into_iter()
        .fold(History::new(), |acc, entry| append_entry(&acc, entry));
        let html = block_on(LocalServerRenderer::<MultiCity>::with_props(Props { history }).render());
        let austin = html.find("Austin, TX").expect("austin row");
        let denver = html.find("Denver, CO").expect("denver row");
        assert!(austin < denver, "best average resilience ranks first");
        assert!(html.contains("80.0"), "{html}");
        assert!(html.contains("20.0%"), "{html}");
        assert!(html.contains("Run 3"));
    }
}
