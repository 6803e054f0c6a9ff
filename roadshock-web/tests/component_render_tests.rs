use std::rc::Rc;

use futures::executor::block_on;
use roadshock_core::{CityCatalog, CityRef, RunConfig, Scenario, SessionPhase, preset_cities};
use roadshock_web::app::App;
use roadshock_web::components::city_selector::{self, CitySelector};
use roadshock_web::components::header::{self, Header};
use roadshock_web::components::notice::{self, Notice};
use roadshock_web::components::run_controls::{self, RunControls};
use yew::{AttrValue, Callback, LocalServerRenderer};

#[test]
fn app_renders_idle_dashboard() {
    let html = block_on(LocalServerRenderer::<App>::new().render());
    assert!(html.contains("Roadshock"));
    assert!(html.contains("Select a city to begin"));
    assert!(html.contains("No city selected"));
    assert!(html.contains("Run a disruption to see how the network holds up."));
    assert!(html.contains("Completed runs will be compared here."));
    assert!(html.contains("Bridge Collapse"));
}

#[test]
fn header_flags_error_phase() {
    let props = header::Props {
        phase: SessionPhase::Error {
            retryable: true,
            message: "Simulation failed".into(),
        },
        city: None,
    };
    let html = block_on(LocalServerRenderer::<Header>::with_props(props).render());
    assert!(html.contains("status-error"));
    assert!(html.contains("Something went wrong"));
}

#[test]
fn notice_with_dismiss_renders_button() {
    let props = notice::Props {
        message: AttrValue::from("Run failed; showing the previous result."),
        on_dismiss: Some(Callback::noop()),
    };
    let html = block_on(LocalServerRenderer::<Notice>::with_props(props).render());
    assert!(html.contains("showing the previous result"));
    assert!(html.contains("Dismiss"));
}

#[test]
fn city_presets_stay_clickable_while_baseline_loads() {
    let phase = SessionPhase::LoadingBaseline;
    assert!(phase.is_busy());
    let props = city_selector::Props {
        catalog: Rc::new(CityCatalog::new(preset_cities())),
        selected: Some(CityRef::free_text("Leeds, UK")),
        on_select: Callback::noop(),
        loading: phase == SessionPhase::LoadingBaseline,
    };
    let html = block_on(LocalServerRenderer::<CitySelector>::with_props(props).render());
    assert!(html.contains("pick another city to switch"), "{html}");
    assert!(!html.contains("disabled"), "{html}");
    for city in preset_cities() {
        assert!(html.contains(city.label()), "missing preset {}", city.label());
    }
}

#[test]
fn run_button_stays_enabled_while_running() {
    let props = run_controls::Props {
        controls: RunConfig::new("", Scenario::TunnelClosure),
        scenarios: Scenario::ALL.to_vec(),
        on_change: Callback::noop(),
        on_run: Callback::noop(),
        busy: true,
        validation: None,
    };
    let html = block_on(LocalServerRenderer::<RunControls>::with_props(props).render());
    assert!(html.contains("Running…"), "{html}");
    assert!(!html.contains("disabled"), "{html}");
}
