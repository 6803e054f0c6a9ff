use roadshock_core::display::NOT_AVAILABLE;
use roadshock_core::{TimeOfDayRow, TripImpact};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone, Default)]
pub struct Props {
    /// `None` when the run has no delay ratio.
    #[prop_or_default]
    pub rows: Option<Vec<TimeOfDayRow>>,
}

fn impact_class(impact: TripImpact) -> &'static str {
    match impact {
        TripImpact::Minor => "impact-minor",
        TripImpact::Noticeable => "impact-noticeable",
        TripImpact::Severe => "impact-severe",
    }
}

/// Typical trip durations before and after the disruption.
#[function_component(TimeOfDayTable)]
pub fn time_of_day_table(p: &Props) -> Html {
    let Some(rows) = p.rows.as_ref() else {
        return html! {
            <section class="panel time-of-day" aria-label="Commute impact by time of day">
                <h3>{ "Commute impact" }</h3>
                <p class="muted not-available">
                    { format!("{NOT_AVAILABLE}: no sampled trip could be timed for this run.") }
                </p>
            </section>
        };
    };
    html! {
        <section class="panel time-of-day" aria-label="Commute impact by time of day">
            <h3>{ "Commute impact" }</h3>
            <table>
                <thead>
                    <tr>
                        <th scope="col">{ "Time of day" }</th>
                        <th scope="col">{ "Before" }</th>
                        <th scope="col">{ "After" }</th>
                        <th scope="col">{ "Change" }</th>
                        <th scope="col">{ "Impact" }</th>
                    </tr>
                </thead>
                <tbody>
                    { for rows.iter().map(|row| html! {
                        <tr>
                            <th scope="row">{ row.slot.label() }</th>
                            <td>{ format!("{:.0} min", row.before_minutes) }</td>
                            <td>{ format!("{:.0} min", row.after_minutes) }</td>
                            <td>{ format!("{:+.1} min", row.delta_minutes) }</td>
                            <td class={impact_class(row.impact)}>{ row.impact.label() }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </section>
    }
}
