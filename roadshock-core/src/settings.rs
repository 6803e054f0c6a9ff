//! Session settings shared by the browser and command-line front ends.
use serde::{Deserialize, Serialize};

use crate::constants::{COMMUTE_BASE_MINUTES, DEFAULT_API_BASE};
use crate::result::DisconnectedUnits;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub disconnected_units: DisconnectedUnits,
    #[serde(default = "default_commute_base_minutes")]
    pub commute_base_minutes: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            disconnected_units: DisconnectedUnits::default(),
            commute_base_minutes: default_commute_base_minutes(),
        }
    }
}

impl SessionSettings {
    /// Parse settings from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.sanitized()
    }

    /// Join an endpoint path onto the API base without doubling slashes.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Replace values that would break derivation with their defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !(self.commute_base_minutes.is_finite() && self.commute_base_minutes > 0.0) {
            log::warn!(
                "commute base of {} minutes is unusable; using {COMMUTE_BASE_MINUTES}",
                self.commute_base_minutes
            );
            self.commute_base_minutes = COMMUTE_BASE_MINUTES;
        }
        let trimmed = self.api_base.trim();
        self.api_base = if trimmed.is_empty() {
            default_api_base()
        } else {
            trimmed.to_string()
        };
        self
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

const fn default_commute_base_minutes() -> f64 {
    COMMUTE_BASE_MINUTES
}
