//! Reelgate Core Library
//!
//! This crate provides the domain models, validation, error types,
//! configuration and collaborator traits shared by the Reelgate upload
//! client, controller and CLI.

pub mod config;
pub mod error;
pub mod hooks;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{PollingConfig, UploaderConfig};
pub use error::{
    LifecycleError, LogLevel, PollError, PollTimeoutError, UploadError, ValidationError,
    GENERIC_POLL_MESSAGE, GENERIC_UPLOAD_MESSAGE,
};
pub use hooks::{Notifier, TracingNotifier, UploadBackend};
pub use models::{
    MediaFile, Notification, ProgressResponse, ProgressUpdate, Severity, TransferProgress,
    UploadReceipt, UploadRequest, UploadSession, UploadStatus,
};
pub use validation::{validate_upload_request, RequiredField};
