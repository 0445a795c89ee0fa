//! Upload lifecycle controller
//!
//! Owns one `UploadSession` at a time and moves it through
//! `Idle -> Submitting -> Polling -> Succeeded | Failed | Cancelled`.
//! Every transition goes through this type; terminal outcomes are reported
//! to the `Notifier` exactly once.

use std::sync::Arc;

use chrono::Utc;
use reelgate_core::{
    validate_upload_request, LifecycleError, LogLevel, Notification, Notifier, PollingConfig,
    ProgressUpdate, UploadBackend, UploadRequest, UploadSession, UploadStatus, UploaderConfig,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub(crate) const SUCCESS_MESSAGE: &str = "Trailer uploaded successfully";

/// Stops the polling of a controller from outside of it (e.g. a Ctrl-C handler).
///
/// Cancelling while the upload is still being submitted cancels the session as
/// soon as it starts polling. Handles are detached by `reset()`.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub struct UploadLifecycleController {
    backend: Arc<dyn UploadBackend>,
    notifier: Arc<dyn Notifier>,
    pub(crate) polling: PollingConfig,
    require_pictures: bool,
    pub(crate) session: UploadSession,
    pub(crate) cancel: CancellationToken,
    pub(crate) polls_issued: u32,
    pub(crate) polling_started: Option<Instant>,
}

impl std::fmt::Debug for UploadLifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadLifecycleController")
            .field("session", &self.session)
            .field("polling", &self.polling)
            .field("require_pictures", &self.require_pictures)
            .field("polls_issued", &self.polls_issued)
            .finish()
    }
}

impl UploadLifecycleController {
    pub fn new(
        backend: Arc<dyn UploadBackend>,
        notifier: Arc<dyn Notifier>,
        config: &UploaderConfig,
    ) -> Self {
        Self::with_settings(
            backend,
            notifier,
            config.polling.clone(),
            config.require_pictures,
        )
    }

    pub fn with_settings(
        backend: Arc<dyn UploadBackend>,
        notifier: Arc<dyn Notifier>,
        polling: PollingConfig,
        require_pictures: bool,
    ) -> Self {
        Self {
            backend,
            notifier,
            polling,
            require_pictures,
            session: UploadSession::idle(),
            cancel: CancellationToken::new(),
            polls_issued: 0,
            polling_started: None,
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn status(&self) -> UploadStatus {
        self.session.status
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            token: self.cancel.clone(),
        }
    }

    /// Validate and submit an upload. Only allowed from `Idle`.
    ///
    /// Validation failures leave the session `Idle` and never reach the backend.
    /// On acceptance the session is `Polling` with the backend's upload id.
    pub async fn submit(
        &mut self,
        request: &UploadRequest,
    ) -> Result<&UploadSession, LifecycleError> {
        if self.session.status != UploadStatus::Idle {
            return Err(self.invalid_state("submit"));
        }

        validate_upload_request(request, self.require_pictures)?;

        self.session.status = UploadStatus::Submitting;
        self.session.submitted_at = Some(Utc::now());
        tracing::info!(
            pictures = request.auxiliary_files.len(),
            bytes = request.payload_len(),
            "Submitting trailer upload"
        );

        match self.backend.submit_upload(request).await {
            Ok(receipt) => {
                self.session.session_id = Some(receipt.upload_id);
                self.session.progress_percent = 0;
                self.session.status = UploadStatus::Polling;
                self.polls_issued = 0;
                self.polling_started = Some(Instant::now());
                tracing::info!(
                    session_id = ?self.session.session_id,
                    "Upload accepted, polling for progress"
                );
                Ok(&self.session)
            }
            Err(err) => Err(self.fail(err.into()).await),
        }
    }

    /// Attach to an upload the backend already accepted, e.g. one submitted
    /// by an earlier process. Only allowed from `Idle`.
    pub fn resume(&mut self, session_id: impl Into<String>) -> Result<&UploadSession, LifecycleError> {
        if self.session.status != UploadStatus::Idle {
            return Err(self.invalid_state("resume"));
        }

        self.session.session_id = Some(session_id.into());
        self.session.progress_percent = 0;
        self.session.status = UploadStatus::Polling;
        self.polls_issued = 0;
        self.polling_started = Some(Instant::now());
        tracing::info!(session_id = ?self.session.session_id, "Resumed polling for upload");
        Ok(&self.session)
    }

    /// Query progress once for the active session.
    ///
    /// Reaching 100% completes the session. A failed query ends it; there is no retry.
    pub async fn poll_once(&mut self, session_id: &str) -> Result<ProgressUpdate, LifecycleError> {
        self.sync_cancellation();
        if self.session.status != UploadStatus::Polling {
            return Err(self.invalid_state("poll"));
        }

        let active = self.session.session_id.clone().unwrap_or_default();
        if active != session_id {
            return Err(LifecycleError::SessionMismatch {
                requested: session_id.to_string(),
                active,
            });
        }

        self.polls_issued += 1;
        let report = match self.backend.fetch_progress(session_id).await {
            Ok(report) => report,
            Err(err) => return Err(self.fail(err.into()).await),
        };

        let update = ProgressUpdate::merge(self.session.progress_percent, report.percent());
        if report.percent() < self.session.progress_percent {
            tracing::debug!(
                session_id = %session_id,
                reported = report.percent(),
                kept = self.session.progress_percent,
                "Ignoring regressed progress report"
            );
        }
        self.session.progress_percent = update.progress_percent;
        tracing::debug!(
            session_id = %session_id,
            progress = update.progress_percent,
            "Upload progress"
        );

        if update.done {
            self.session.status = UploadStatus::Succeeded;
            self.session.finished_at = Some(Utc::now());
            tracing::info!(session_id = %session_id, "Upload completed");
            self.notifier
                .notify(Notification::success(SUCCESS_MESSAGE))
                .await;
        }

        Ok(update)
    }

    /// Stop polling. No-op unless the session is `Polling`; the backend is not told.
    pub fn cancel(&mut self) {
        if self.session.status != UploadStatus::Polling {
            return;
        }
        self.cancel.cancel();
        self.mark_cancelled();
    }

    /// Discard the session and return to `Idle`.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.session = UploadSession::idle();
        self.polls_issued = 0;
        self.polling_started = None;
    }

    /// Apply a cancellation requested through a `CancelHandle`.
    pub(crate) fn sync_cancellation(&mut self) {
        if self.cancel.is_cancelled() && self.session.status == UploadStatus::Polling {
            self.mark_cancelled();
        }
    }

    fn mark_cancelled(&mut self) {
        self.session.status = UploadStatus::Cancelled;
        self.session.finished_at = Some(Utc::now());
        tracing::info!(
            session_id = ?self.session.session_id,
            progress = self.session.progress_percent,
            "Upload polling cancelled"
        );
    }

    fn invalid_state(&self, operation: &'static str) -> LifecycleError {
        LifecycleError::InvalidState {
            operation,
            status: self.session.status.to_string(),
        }
    }

    /// Move to `Failed`, notify once and hand the error back.
    pub(crate) async fn fail(&mut self, err: LifecycleError) -> LifecycleError {
        let message = err.user_message();
        self.session.status = UploadStatus::Failed;
        self.session.last_error = Some(message.clone());
        self.session.finished_at = Some(Utc::now());

        match err.log_level() {
            LogLevel::Debug => tracing::debug!(error = %err, "Upload session failed"),
            LogLevel::Warn => tracing::warn!(error = %err, "Upload session failed"),
            LogLevel::Error => tracing::error!(error = %err, "Upload session failed"),
        }

        self.notifier.notify(Notification::error(message)).await;
        err
    }
}
