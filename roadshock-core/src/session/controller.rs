use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::{Epoch, ReadyPhase, SessionPhase};
use crate::city::{CityRef, resolve_city_query};
use crate::constants::LOG_TARGET_SESSION;
use crate::error::{ConfigError, ServiceError, SessionError, SessionResult};
use crate::history::{History, HistoryEntry, append_entry};
use crate::insight::{DerivedInsight, derive_insight_with};
use crate::request::{RunConfig, RunRequest, baseline_request, build_run_request};
use crate::result::{Geometry, RunResponse, RunResult};
use crate::scenario::Scenario;
use crate::settings::SessionSettings;

/// Source of history timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// A run result published together with the insight derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedRun {
    version: u64,
    epoch: Epoch,
    request: RunRequest,
    result: RunResult,
    insight: DerivedInsight,
}

impl PublishedRun {
    /// Monotonic publication counter; views key off this.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub const fn request(&self) -> &RunRequest {
        &self.request
    }

    #[must_use]
    pub const fn result(&self) -> &RunResult {
        &self.result
    }

    #[must_use]
    pub const fn insight(&self) -> &DerivedInsight {
        &self.insight
    }
}

/// Outstanding baseline load. Consumed by [`SessionController::accept_baseline`].
#[derive(Debug, PartialEq)]
pub struct BaselineTicket {
    epoch: Epoch,
    city: CityRef,
    request: RunRequest,
}

impl BaselineTicket {
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub const fn city(&self) -> &CityRef {
        &self.city
    }

    #[must_use]
    pub const fn request(&self) -> &RunRequest {
        &self.request
    }
}

/// Outstanding disruption run. Consumed by [`SessionController::accept_run`].
#[derive(Debug, PartialEq)]
pub struct RunTicket {
    epoch: Epoch,
    request: RunRequest,
}

impl RunTicket {
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub const fn request(&self) -> &RunRequest {
        &self.request
    }
}

/// Single writer of session state.
///
/// The controller never performs I/O. Each operation that needs the
/// simulation service returns a ticket; the caller sends the ticket's request
/// and hands the outcome back. Outcomes whose ticket epoch is no longer
/// current are rejected with [`SessionError::StaleResponse`] and change
/// nothing.
#[derive(Debug, Clone)]
pub struct SessionController {
    settings: SessionSettings,
    selected_city: Option<CityRef>,
    active_config: Option<RunConfig>,
    baseline: Option<Geometry>,
    published: Option<Arc<PublishedRun>>,
    history: History,
    epoch: Epoch,
    result_version: u64,
    phase: SessionPhase,
    scenarios: Vec<Scenario>,
    notice: Option<String>,
    clock: Clock,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl SessionController {
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            selected_city: None,
            active_config: None,
            baseline: None,
            published: None,
            history: History::new(),
            epoch: Epoch::ZERO,
            result_version: 0,
            phase: SessionPhase::Idle,
            scenarios: Scenario::ALL.to_vec(),
            notice: None,
            clock: Utc::now,
        }
    }

    /// Replace the timestamp source used for history entries.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub const fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub const fn selected_city(&self) -> Option<&CityRef> {
        self.selected_city.as_ref()
    }

    #[must_use]
    pub const fn active_config(&self) -> Option<&RunConfig> {
        self.active_config.as_ref()
    }

    /// Intact network geometry for the selected city.
    #[must_use]
    pub const fn baseline(&self) -> Option<&Geometry> {
        self.baseline.as_ref()
    }

    #[must_use]
    pub const fn published(&self) -> Option<&Arc<PublishedRun>> {
        self.published.as_ref()
    }

    #[must_use]
    pub fn latest_result(&self) -> Option<&RunResult> {
        self.published.as_deref().map(PublishedRun::result)
    }

    #[must_use]
    pub fn latest_insight(&self) -> Option<&DerivedInsight> {
        self.published.as_deref().map(PublishedRun::insight)
    }

    /// Snapshot of the run log; later runs do not affect it.
    #[must_use]
    pub fn history(&self) -> History {
        self.history.clone()
    }

    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub const fn result_version(&self) -> u64 {
        self.result_version
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Dismissible message left by a failed run.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Start over with a new city.
    ///
    /// Clears the published result (history is kept) and returns the
    /// baseline request to send.
    pub fn select_city(&mut self, city: CityRef) -> BaselineTicket {
        self.epoch = self.epoch.next();
        self.published = None;
        self.baseline = None;
        self.notice = None;
        self.phase = SessionPhase::LoadingBaseline;
        self.selected_city = Some(city.clone());
        log::debug!(
            target: LOG_TARGET_SESSION,
            "epoch {}: loading baseline for {}",
            self.epoch,
            city.label()
        );
        BaselineTicket {
            epoch: self.epoch,
            request: baseline_request(city.query()),
            city,
        }
    }

    /// Validate `config` and start a disruption run.
    ///
    /// A non-blank `config.city_query` overrides the selected city.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfiguration`] when no city can be
    /// resolved or no scenario is chosen. State is left untouched and no
    /// ticket is issued in that case.
    pub fn run_disruption(&mut self, config: RunConfig) -> SessionResult<RunTicket> {
        let override_text = Some(config.city_query.as_str());
        let city = resolve_city_query(override_text, self.selected_city.as_ref())
            .ok_or(ConfigError::MissingCity)?;
        let request = build_run_request(&RunConfig {
            city_query: city,
            ..config.clone()
        })?;

        let resume = self.ready_fallback();
        self.epoch = self.epoch.next();
        self.notice = None;
        self.phase = SessionPhase::Running { resume };
        self.active_config = Some(config);
        log::debug!(
            target: LOG_TARGET_SESSION,
            "epoch {}: running {} on {} at severity {:.3}",
            self.epoch,
            request.scenario,
            request.city,
            request.severity
        );
        Ok(RunTicket {
            epoch: self.epoch,
            request,
        })
    }

    /// Hand back the outcome of a baseline load.
    ///
    /// # Errors
    ///
    /// [`SessionError::StaleResponse`] when a newer request superseded the
    /// ticket. [`SessionError::Service`] when the load failed; the session is
    /// then in a retryable [`SessionPhase::Error`].
    pub fn accept_baseline(
        &mut self,
        ticket: BaselineTicket,
        outcome: Result<RunResponse, ServiceError>,
    ) -> SessionResult<Geometry> {
        self.ensure_current(ticket.epoch)?;
        match outcome {
            Ok(response) => {
                let result = RunResult::from_response(response, self.settings.disconnected_units);
                log::info!(
                    target: LOG_TARGET_SESSION,
                    "baseline for {} ready ({} road segments)",
                    ticket.city.label(),
                    result.all_edges.feature_count()
                );
                self.baseline = Some(result.all_edges.clone());
                self.phase = SessionPhase::BaselineReady;
                Ok(result.all_edges)
            }
            Err(err) => {
                log::warn!(
                    target: LOG_TARGET_SESSION,
                    "baseline for {} failed: {err}",
                    ticket.city.label()
                );
                self.phase = SessionPhase::Error {
                    retryable: true,
                    message: err.user_message(),
                };
                Err(err.into())
            }
        }
    }

    /// Hand back the outcome of a disruption run.
    ///
    /// On success the result and its insight are published together, the
    /// result version is bumped and a history entry is appended.
    ///
    /// # Errors
    ///
    /// [`SessionError::StaleResponse`] when a newer request superseded the
    /// ticket. [`SessionError::Service`] when the run failed; the previous
    /// ready state and published result are kept and a notice is set.
    pub fn accept_run(
        &mut self,
        ticket: RunTicket,
        outcome: Result<RunResponse, ServiceError>,
    ) -> SessionResult<Arc<PublishedRun>> {
        self.ensure_current(ticket.epoch)?;
        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                self.recover_from_failed_run(&err);
                return Err(err.into());
            }
        };

        let result = RunResult::from_response(response, self.settings.disconnected_units);
        let insight = derive_insight_with(&result, self.settings.commute_base_minutes);
        let entry = self.history_entry(&ticket.request, &result, &insight);
        self.history = append_entry(&self.history, entry);
        if self.baseline.is_none() {
            self.baseline = Some(result.all_edges.clone());
        }
        self.result_version += 1;
        let published = Arc::new(PublishedRun {
            version: self.result_version,
            epoch: ticket.epoch,
            request: ticket.request,
            result,
            insight,
        });
        log::info!(
            target: LOG_TARGET_SESSION,
            "published result v{} (score {:?}, shock {})",
            published.version,
            published.insight.resilience_score(),
            published.insight.shock_level()
        );
        self.published = Some(Arc::clone(&published));
        self.phase = SessionPhase::ResultReady;
        Ok(published)
    }

    /// Adopt the scenario list offered by the service.
    ///
    /// Unknown names are skipped. If nothing recognizable remains the full
    /// built-in list is kept.
    pub fn set_scenarios<S: AsRef<str>>(&mut self, names: &[S]) -> &[Scenario] {
        let known = Scenario::parse_known(names);
        if known.is_empty() {
            log::warn!(
                target: LOG_TARGET_SESSION,
                "service offered no known scenarios; keeping built-in list"
            );
            self.scenarios = Scenario::ALL.to_vec();
        } else {
            self.scenarios = known;
        }
        &self.scenarios
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn ensure_current(&self, issued: Epoch) -> SessionResult<()> {
        if issued == self.epoch {
            return Ok(());
        }
        log::debug!(
            target: LOG_TARGET_SESSION,
            "discarding stale response for epoch {issued} (current {})",
            self.epoch
        );
        Err(SessionError::StaleResponse {
            issued,
            current: self.epoch,
        })
    }

    fn ready_fallback(&self) -> Option<ReadyPhase> {
        if self.published.is_some() {
            Some(ReadyPhase::ResultReady)
        } else if self.baseline.is_some() {
            Some(ReadyPhase::BaselineReady)
        } else {
            None
        }
    }

    fn recover_from_failed_run(&mut self, err: &ServiceError) {
        log::warn!(target: LOG_TARGET_SESSION, "run failed: {err}");
        let message = err.user_message();
        let resume = match &self.phase {
            SessionPhase::Running { resume } => *resume,
            _ => self.ready_fallback(),
        };
        match resume {
            Some(ready) => {
                self.phase = ready.into();
                self.notice = Some(message);
            }
            None => {
                self.phase = SessionPhase::Error {
                    retryable: true,
                    message,
                };
            }
        }
    }

    fn history_entry(
        &self,
        request: &RunRequest,
        result: &RunResult,
        insight: &DerivedInsight,
    ) -> HistoryEntry {
        let city_label = self
            .selected_city
            .as_ref()
            .filter(|city| city.query() == request.city)
            .map_or_else(|| request.city.clone(), |city| city.label().to_string());
        HistoryEntry {
            city_label,
            city_query: request.city.clone(),
            scenario: request.scenario,
            severity: request.severity,
            sample_pair_count: request.sample_pairs,
            avg_ratio: result.avg_ratio,
            pct_disconnected: result.disconnected_percent(),
            removed_edge_count: result.removed_edge_count,
            resilience_score: insight.resilience_score(),
            timestamp: (self.clock)(),
        }
    }
}
