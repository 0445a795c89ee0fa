//! Error types module
//!
//! The upload lifecycle distinguishes four failure families: local validation
//! failures that never reach the backend, submit failures, progress query
//! failures and polling timeouts. `LifecycleError` unifies them for the
//! controller and adds the state-machine violations.

use std::time::Duration;

use crate::validation::RequiredField;

/// Fallback shown when the backend rejects an upload without a message.
pub const GENERIC_UPLOAD_MESSAGE: &str = "An error occurred while uploading trailer";

/// Fallback shown when a progress query fails without a backend message.
pub const GENERIC_POLL_MESSAGE: &str = "An error occurred while fetching upload progress";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a cancelled or timed out poll
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Pre-flight validation failure. Lists every unmet field in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", RequiredField::join(.fields))]
pub struct ValidationError {
    pub fields: Vec<RequiredField>,
}

impl ValidationError {
    pub fn new(fields: Vec<RequiredField>) -> Self {
        Self { fields }
    }
}

/// The backend rejected the upload or the network failed during submit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Upload failed: {message}")]
pub struct UploadError {
    pub message: String,
    /// HTTP status when the backend answered, `None` on transport failure.
    pub status: Option<u16>,
}

impl UploadError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Build from an optional backend message, falling back to the generic text.
    pub fn from_backend(message: Option<String>, status: Option<u16>) -> Self {
        Self::new(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_UPLOAD_MESSAGE.to_string()),
            status,
        )
    }
}

/// Network or backend failure while querying upload progress.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Progress query failed: {message}")]
pub struct PollError {
    pub message: String,
    pub status: Option<u16>,
}

impl PollError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn from_backend(message: Option<String>, status: Option<u16>) -> Self {
        Self::new(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_POLL_MESSAGE.to_string()),
            status,
        )
    }
}

/// Polling exceeded the configured total duration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Upload progress polling timed out after {}s (limit {}s)", .elapsed.as_secs(), .limit.as_secs())]
pub struct PollTimeoutError {
    pub elapsed: Duration,
    pub limit: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    PollTimeout(#[from] PollTimeoutError),

    #[error("Operation '{operation}' is not allowed while the session is {status}")]
    InvalidState {
        operation: &'static str,
        status: String,
    },

    #[error("Unknown upload session '{requested}' (active session: {active})")]
    SessionMismatch { requested: String, active: String },
}

impl LifecycleError {
    /// Message suitable for a notification or an inline form error.
    pub fn user_message(&self) -> String {
        match self {
            LifecycleError::Validation(err) => err.to_string(),
            LifecycleError::Upload(err) => err.message.clone(),
            LifecycleError::Poll(err) => err.message.clone(),
            LifecycleError::PollTimeout(_) => {
                "Upload is taking longer than expected, stopped waiting for progress".to_string()
            }
            LifecycleError::InvalidState { operation, status } => {
                match (*operation, status.as_str()) {
                    ("submit", "submitting" | "polling") => {
                        "Another upload is already in progress".to_string()
                    }
                    _ => format!("Cannot {} while the upload is {}", operation, status),
                }
            }
            LifecycleError::SessionMismatch { .. } => "Unknown upload session".to_string(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            LifecycleError::Validation(_) => LogLevel::Debug,
            LifecycleError::InvalidState { .. } | LifecycleError::SessionMismatch { .. } => {
                LogLevel::Debug
            }
            LifecycleError::PollTimeout(_) => LogLevel::Warn,
            LifecycleError::Upload(_) | LifecycleError::Poll(_) => LogLevel::Error,
        }
    }

    /// Whether this error moved the session into `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecycleError::Upload(_) | LifecycleError::Poll(_) | LifecycleError::PollTimeout(_)
        )
    }
}
