use serde::{Deserialize, Serialize};
use std::fmt;

/// Request generation counter. Only responses tagged with the current epoch
/// are adopted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ready state a failed run falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadyPhase {
    BaselineReady,
    ResultReady,
}

impl From<ReadyPhase> for SessionPhase {
    fn from(ready: ReadyPhase) -> Self {
        match ready {
            ReadyPhase::BaselineReady => Self::BaselineReady,
            ReadyPhase::ResultReady => Self::ResultReady,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    LoadingBaseline,
    BaselineReady,
    Running {
        resume: Option<ReadyPhase>,
    },
    ResultReady,
    Error {
        retryable: bool,
        message: String,
    },
}

impl SessionPhase {
    /// A request is outstanding and its outcome has not been adopted yet.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::LoadingBaseline | Self::Running { .. })
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::BaselineReady | Self::ResultReady)
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Short status line for headers and logs.
    #[must_use]
    pub const fn status_text(&self) -> &'static str {
        match self {
            Self::Idle => "Select a city to begin",
            Self::LoadingBaseline => "Loading road network…",
            Self::BaselineReady => "Network ready",
            Self::Running { .. } => "Running simulation…",
            Self::ResultReady => "Results ready",
            Self::Error { .. } => "Something went wrong",
        }
    }
}
