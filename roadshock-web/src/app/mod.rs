use roadshock_core::SessionPhase;
use yew::prelude::*;

use crate::components::button::Button;
use crate::components::city_selector::CitySelector;
use crate::components::header::Header;
use crate::components::insight_panel::InsightPanel;
use crate::components::multi_city::MultiCity;
use crate::components::notice::Notice;
use crate::components::run_controls::RunControls;
use crate::components::time_of_day::TimeOfDayTable;

pub mod actions;
pub mod bootstrap;
pub mod state;

pub use actions::Actions;
pub use state::{AppState, SessionView};

#[function_component(App)]
pub fn app() -> Html {
    let app_state = state::use_app_state();
    bootstrap::use_bootstrap(&app_state);
    let actions = Actions::new(&app_state);
    let view = (*app_state.view).clone();

    let retry = match (&view.phase, view.selected_city.clone()) {
        (SessionPhase::Error { retryable: true, .. }, Some(city)) => {
            let select = actions.select_city.clone();
            Some(Callback::from(move |()| select.emit(city.clone())))
        }
        _ => None,
    };
    let time_of_day = view
        .published
        .as_ref()
        .map(|run| run.insight().time_of_day().map(<[_]>::to_vec));

    html! {
        <div class="app-shell">
            <Header phase={view.phase.clone()} city={view.selected_city.clone()} />
            <main id="main" role="main">
                if let Some(message) = view.notice.clone() {
                    <Notice message={message} on_dismiss={actions.dismiss_notice.clone()} />
                }
                if let Some(message) = view.phase.error_message() {
                    <div class="session-error">
                        <Notice message={message.to_string()} />
                        if let Some(onclick) = retry {
                            <Button label="Try again" {onclick} />
                        }
                    </div>
                }
                <div class="layout">
                    <aside class="sidebar">
                        <CitySelector
                            catalog={app_state.catalog.clone()}
                            selected={view.selected_city.clone()}
                            on_select={actions.select_city.clone()}
                            loading={view.phase == SessionPhase::LoadingBaseline}
                        />
                        <RunControls
                            controls={(*app_state.controls).clone()}
                            scenarios={view.scenarios.clone()}
                            on_change={actions.edit_controls.clone()}
                            on_run={actions.run.clone()}
                            busy={view.phase.is_busy()}
                            validation={(*app_state.validation).clone()}
                        />
                    </aside>
                    <section class="results">
                        <InsightPanel
                            published={view.published.clone()}
                            baseline_segments={view.baseline_segments}
                        />
                        if let Some(rows) = time_of_day {
                            <TimeOfDayTable {rows} />
                        }
                        <MultiCity history={view.history.clone()} />
                    </section>
                </div>
            </main>
        </div>
    }
}
