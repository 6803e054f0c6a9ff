use std::sync::Arc;

use roadshock_core::display::{format_percent, format_ratio, format_score};
use roadshock_core::{PublishedRun, ShockLevel};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone, Default)]
pub struct Props {
    #[prop_or_default]
    pub published: Option<Arc<PublishedRun>>,
    /// Segment count of the loaded baseline network, if any.
    #[prop_or_default]
    pub baseline_segments: Option<usize>,
}

fn shock_class(level: ShockLevel) -> &'static str {
    match level {
        ShockLevel::Catastrophic => "shock-catastrophic",
        ShockLevel::Severe => "shock-severe",
        ShockLevel::Moderate => "shock-moderate",
        ShockLevel::Mild => "shock-mild",
        ShockLevel::Unknown => "shock-unknown",
    }
}

#[function_component(InsightPanel)]
pub fn insight_panel(p: &Props) -> Html {
    let Some(run) = p.published.as_ref() else {
        return html! {
            <section class="panel insight-panel empty" aria-label="Resilience insight">
                <p class="muted">{ "Run a disruption to see how the network holds up." }</p>
            </section>
        };
    };

    let insight = run.insight();
    let result = run.result();
    let label = insight.resilience_label();
    let shock = insight.shock_level();
    let total_segments = p
        .baseline_segments
        .unwrap_or_else(|| result.all_edges.feature_count());

    html! {
        <section
            key={run.version().to_string()}
            class="panel insight-panel"
            aria-label="Resilience insight"
        >
            <div class="score-card">
                <span class="score-value">{ format_score(insight.resilience_score()) }</span>
                <span class="score-label">{ label.as_str() }</span>
                <p class="muted">{ label.hint() }</p>
            </div>

            <div class={classes!("shock-card", shock_class(shock))}>
                <h4>{ format!("Shock: {}", shock.as_str()) }</h4>
                <p>{ shock.description() }</p>
                if let Some(trips) = shock.severe_trips() {
                    <p class="muted">{ trips }</p>
                }
            </div>

            <p class="narrative">{ insight.narrative() }</p>
            if let Some(sentence) = insight.connectivity() {
                <p class="connectivity">{ sentence }</p>
            }

            <dl class="run-stats">
                <dt>{ "Delay factor" }</dt>
                <dd>{ format_ratio(insight.delay_factor()) }</dd>
                <dt>{ "Median delay" }</dt>
                <dd class="median-ratio">{ format_ratio(result.median_ratio) }</dd>
                <dt>{ "Disconnected trips" }</dt>
                <dd>{ format_percent(result.disconnected_percent()) }</dd>
                <dt>{ "Road segments" }</dt>
                <dd>{ total_segments.to_string() }</dd>
                <dt>{ "Removed" }</dt>
                <dd>{ result.removed_edge_count.to_string() }</dd>
                <dt>{ "Remaining" }</dt>
                <dd>{ result.remaining_edge_count().to_string() }</dd>
                <dt>{ "Sampled trips" }</dt>
                <dd>{ result.sampled_pair_count.to_string() }</dd>
            </dl>

            <p class="planner-priority">{ label.planner_priority() }</p>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use roadshock_core::{
        CityRef, RunConfig, RunResponse, Scenario, SessionController, SessionSettings,
    };
    use serde_json::json;
    use yew::LocalServerRenderer;

    fn published(avg_ratio: Option<f64>, pct_disconnected: Option<f64>) -> Arc<PublishedRun> {
        let mut session = SessionController::new(SessionSettings::default());
        let baseline = session.select_city(CityRef::new("Boston, MA", "Boston, Massachusetts, USA"));
        session
            .accept_baseline(baseline, Ok(RunResponse::default()))
            .expect("baseline");
        let ticket = session
            .run_disruption(RunConfig::new("", Scenario::BridgeCollapse))
            .expect("ticket");
        let response = RunResponse {
            avg_ratio,
            median_ratio: avg_ratio.map(|ratio| ratio - 0.25),
            pct_disconnected,
            n_removed_edges: 4,
            n_pairs: 50,
            edges_geojson: json!({"type": "FeatureCollection", "features": [{}, {}, {}]}),
            ..RunResponse::default()
        };
        session.accept_run(ticket, Ok(response)).expect("published")
    }

    #[test]
    fn empty_state_prompts_for_a_run() {
        let html = block_on(LocalServerRenderer::<InsightPanel>::new().render());
        assert!(html.contains("Run a disruption"));
    }

    #[test]
    fn renders_score_shock_and_stats() {
        let props = Props {
            published: Some(published(Some(1.5), Some(20.0))),
            baseline_segments: Some(120),
        };
        let html = block_on(LocalServerRenderer::<InsightPanel>::with_props(props).render());
        assert!(html.contains("1.50×"), "{html}");
        assert!(html.contains("Median delay"), "{html}");
        assert!(html.contains("1.25×"), "{html}");
        assert!(html.contains("20.0%"), "{html}");
        assert!(html.contains("120"), "{html}");
        assert!(html.contains("Shock: Severe"), "{html}");
    }

    #[test]
    fn missing_metrics_show_fallback_text() {
        let props = Props {
            published: Some(published(None, None)),
            baseline_segments: None,
        };
        let html = block_on(LocalServerRenderer::<InsightPanel>::with_props(props).render());
        assert!(html.contains("n/a"));
        assert!(html.contains("Travel-time impact is not available for this run."));
    }
}
