//! Onboarding engine error types.

use thiserror::Error;

/// Session stash errors.
#[derive(Debug, Error)]
pub enum StashError {
    #[error("empty stash path")]
    EmptyPath,
    #[error("stash path segment is not an object: {0}")]
    NotAnObject(String),
    #[error("stash persistence failed: {0}")]
    Persistence(String),
}

/// Policy configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read policy config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid policy config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by a delegated hook such as device onboarding.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors returned from a scheduling pass.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The idempotency flag could not be committed; nothing was scheduled.
    #[error("failed to set login_onboarding_scheduled in the stash: {0}")]
    StashWrite(#[source] StashError),

    /// The device onboarding hook failed; steps scheduled before it remain.
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Result type for onboarding operations
pub type Result<T> = std::result::Result<T, OnboardingError>;
