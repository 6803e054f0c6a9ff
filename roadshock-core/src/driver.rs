//! Async glue between the session controller and a [`SimulationService`].
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::city::CityRef;
use crate::constants::LOG_TARGET_DRIVER;
use crate::error::{ServiceError, SessionError, SessionResult};
use crate::request::RunConfig;
use crate::result::Geometry;
use crate::scenario::Scenario;
use crate::service::SimulationService;
use crate::session::{PublishedRun, SessionController};

type Observer = Box<dyn Fn(&SessionController)>;

/// Drives one session against a simulation service.
///
/// The controller is borrowed only between awaits, so several operations may
/// be in flight at once; whichever was issued last wins. An optional observer
/// sees the controller after every state change.
pub struct SessionDriver<S> {
    service: S,
    controller: Rc<RefCell<SessionController>>,
    observer: Option<Observer>,
}

impl<S: SimulationService> SessionDriver<S> {
    #[must_use]
    pub fn new(service: S, controller: SessionController) -> Self {
        Self {
            service,
            controller: Rc::new(RefCell::new(controller)),
            observer: None,
        }
    }

    /// Call `observer` after each transition, e.g. to refresh a view snapshot.
    #[must_use]
    pub fn with_observer(mut self, observer: impl Fn(&SessionController) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Read access to the session state. Do not hold across an await.
    #[must_use]
    pub fn controller(&self) -> Ref<'_, SessionController> {
        self.controller.borrow()
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Fetch the service's scenario list and adopt the known ones.
    ///
    /// # Errors
    ///
    /// Returns the [`ServiceError`] when the listing cannot be fetched; the
    /// session keeps its current list.
    pub async fn load_scenarios(&self) -> Result<Vec<Scenario>, ServiceError> {
        let names = self.service.list_scenarios().await.inspect_err(|err| {
            log::warn!(target: LOG_TARGET_DRIVER, "scenario listing failed: {err}");
        })?;
        let adopted = self
            .controller
            .borrow_mut()
            .set_scenarios(names.as_slice())
            .to_vec();
        self.notify();
        Ok(adopted)
    }

    /// Select a city and load its baseline network.
    ///
    /// Resolves to `Ok(None)` when a newer request superseded this one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Service`] when the baseline load failed.
    pub async fn select_city(&self, city: CityRef) -> SessionResult<Option<Geometry>> {
        let ticket = self.controller.borrow_mut().select_city(city);
        self.notify();
        let outcome = self.service.run_simulation(ticket.request()).await;
        let accepted = self.controller.borrow_mut().accept_baseline(ticket, outcome);
        self.notify();
        swallow_stale(accepted)
    }

    /// Run a disruption with `config`.
    ///
    /// Resolves to `Ok(None)` when a newer request superseded this one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfiguration`] without contacting the
    /// service when the controls are incomplete, or [`SessionError::Service`]
    /// when the run failed.
    pub async fn run_disruption(
        &self,
        config: RunConfig,
    ) -> SessionResult<Option<Arc<PublishedRun>>> {
        let ticket = self.controller.borrow_mut().run_disruption(config)?;
        self.notify();
        let outcome = self.service.run_simulation(ticket.request()).await;
        let accepted = self.controller.borrow_mut().accept_run(ticket, outcome);
        self.notify();
        swallow_stale(accepted)
    }

    pub fn dismiss_notice(&self) {
        self.controller.borrow_mut().dismiss_notice();
        self.notify();
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer(&self.controller.borrow());
        }
    }
}

fn swallow_stale<T>(accepted: SessionResult<T>) -> SessionResult<Option<T>> {
    match accepted {
        Ok(value) => Ok(Some(value)),
        Err(SessionError::StaleResponse { issued, current }) => {
            log::debug!(
                target: LOG_TARGET_DRIVER,
                "dropped superseded response {issued}; session is at {current}"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
