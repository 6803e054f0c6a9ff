//! Error types for the Roadshock session layer.

use crate::constants::GENERIC_SERVICE_FAILURE;
use crate::session::Epoch;

/// Run controls that cannot be turned into a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Select a city first.")]
    MissingCity,
    #[error("Choose a disruption type.")]
    MissingScenario,
}

/// Failure reported by, or while talking to, the simulation service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("service responded with status {status}")]
    Status { status: u16, body: Option<String> },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Build a status error, dropping blank bodies.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.trim().is_empty() { None } else { Some(body) };
        Self::Status { status, body }
    }

    /// Text shown to the user: the service's body verbatim when present.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                body: Some(body), ..
            } => body.clone(),
            Self::Status { body: None, .. } | Self::Transport(_) | Self::Decode(_) => {
                GENERIC_SERVICE_FAILURE.to_string()
            }
        }
    }
}

/// Errors surfaced by session controller operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("simulation service error: {0}")]
    Service(#[from] ServiceError),
    /// A response arrived for a request that a newer one superseded.
    #[error("stale response for epoch {issued} (current epoch {current})")]
    StaleResponse { issued: Epoch, current: Epoch },
}

impl SessionError {
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleResponse { .. })
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_body_text() {
        let err = ServiceError::status(400, "Unknown scenario: Meteor");
        assert_eq!(err.user_message(), "Unknown scenario: Meteor");
    }

    #[test]
    fn blank_body_falls_back_to_generic_message() {
        let err = ServiceError::status(502, "  \n");
        assert_eq!(err, ServiceError::Status { status: 502, body: None });
        assert_eq!(err.user_message(), GENERIC_SERVICE_FAILURE);
        assert_eq!(
            ServiceError::Transport("connection refused".into()).user_message(),
            GENERIC_SERVICE_FAILURE
        );
    }

    #[test]
    fn config_errors_read_as_validation_messages() {
        assert_eq!(ConfigError::MissingCity.to_string(), "Select a city first.");
        let wrapped: SessionError = ConfigError::MissingScenario.into();
        assert!(wrapped.to_string().contains("Choose a disruption type."));
        assert!(!wrapped.is_stale());
    }
}
