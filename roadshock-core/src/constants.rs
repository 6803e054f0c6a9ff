//! Centralized tuning constants for Roadshock session and insight logic.
//!
//! Slider bounds, derivation thresholds and wire defaults live here so every
//! panel that classifies a run reads the same numbers.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_SESSION: &str = "roadshock::session";
pub(crate) const LOG_TARGET_DRIVER: &str = "roadshock::driver";

// Intensity slider ---------------------------------------------------------
pub const INTENSITY_MIN_PERCENT: i32 = 5;
pub const INTENSITY_MAX_PERCENT: i32 = 80;
pub const INTENSITY_STEP_PERCENT: i32 = 5;
pub const INTENSITY_DEFAULT_PERCENT: i32 = 40;

// Severity range sent to the simulation service -----------------------------
pub const SEVERITY_MIN: f64 = 0.01;
pub const SEVERITY_MAX: f64 = 0.5;

// Sampled origin-destination pairs -----------------------------------------
pub const SAMPLE_PAIRS_MIN: u32 = 10;
pub const SAMPLE_PAIRS_MAX: u32 = 200;
pub const SAMPLE_PAIRS_DEFAULT: u32 = 40;

// Baseline load ------------------------------------------------------------
pub const BASELINE_SEVERITY: f64 = SEVERITY_MIN;
pub const BASELINE_SAMPLE_PAIRS: u32 = 10;

// Resilience score ---------------------------------------------------------
pub(crate) const RATIO_CAP: f64 = 3.0;
pub(crate) const CONNECTIVITY_WEIGHT: f64 = 0.6;
pub(crate) const TRAVEL_WEIGHT: f64 = 0.4;
pub(crate) const SCORE_MAX: f64 = 100.0;

// Resilience label bands (inclusive lower bounds) ---------------------------
pub(crate) const LABEL_ROBUST_MIN: f64 = 80.0;
pub(crate) const LABEL_MANAGEABLE_MIN: f64 = 60.0;
pub(crate) const LABEL_FRAGILE_MIN: f64 = 40.0;

// Shock level bands: (disconnected percent, delay ratio) ---------------------
pub(crate) const SHOCK_CATASTROPHIC: (f64, f64) = (40.0, 3.0);
pub(crate) const SHOCK_SEVERE: (f64, f64) = (15.0, 2.0);
pub(crate) const SHOCK_MODERATE: (f64, f64) = (5.0, 1.4);

// Commuter narrative -------------------------------------------------------
pub const COMMUTE_BASE_MINUTES: f64 = 20.0;
pub(crate) const COMMUTE_BAND_LOW: f64 = 0.9;
pub(crate) const COMMUTE_BAND_HIGH: f64 = 1.1;
pub(crate) const NARRATIVE_MANY_CUT_FRACTION: f64 = 0.40;
pub(crate) const NARRATIVE_SOME_CUT_FRACTION: f64 = 0.05;

// Connectivity headline ----------------------------------------------------
pub(crate) const CONNECTIVITY_HEAVY_PERCENT: f64 = 40.0;
pub(crate) const CONNECTIVITY_NOTICEABLE_PERCENT: f64 = 10.0;

// Time-of-day table (minutes) ----------------------------------------------
pub(crate) const TRIP_OFF_PEAK_MINUTES: f64 = 16.0;
pub(crate) const TRIP_MIDDAY_MINUTES: f64 = 20.0;
pub(crate) const TRIP_RUSH_MINUTES: f64 = 26.0;
pub(crate) const IMPACT_MINOR_MAX_DELTA: f64 = 1.0;
pub(crate) const IMPACT_NOTICEABLE_MAX_DELTA: f64 = 8.0;

// City search --------------------------------------------------------------
pub(crate) const CITY_SEARCH_MIN_CHARS: usize = 2;
pub(crate) const CITY_SEARCH_MAX_RESULTS: usize = 8;

// Service ------------------------------------------------------------------
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const SCENARIOS_PATH: &str = "/scenarios";
pub const SIMULATE_PATH: &str = "/simulate";
pub(crate) const GENERIC_SERVICE_FAILURE: &str = "Simulation failed";
