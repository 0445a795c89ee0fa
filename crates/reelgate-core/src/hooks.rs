//! Collaborator traits
//!
//! The upload controller depends on two external collaborators: the backend
//! that accepts uploads and answers progress queries, and whatever surface
//! shows the user the outcome. Both are expressed as traits so the HTTP client,
//! a console, or a test double can stand in.

use async_trait::async_trait;

use crate::error::{PollError, UploadError};
use crate::models::{Notification, ProgressResponse, Severity, UploadReceipt, UploadRequest};

/// Backend contract for uploads: one submit call, then progress queries.
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Submit the metadata and files. Ok only for an accepted upload.
    async fn submit_upload(&self, request: &UploadRequest) -> Result<UploadReceipt, UploadError>;

    /// Query progress for a previously accepted upload.
    async fn fetch_progress(&self, session_id: &str) -> Result<ProgressResponse, PollError>;
}

/// Receives terminal outcomes of an upload session.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => tracing::info!(message = %notification.message, "Upload notification"),
            Severity::Error => tracing::error!(message = %notification.message, "Upload notification"),
        }
    }
}
