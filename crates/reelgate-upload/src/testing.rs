//! In-memory collaborators for controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reelgate_core::{
    MediaFile, Notification, Notifier, PollError, ProgressResponse, UploadBackend, UploadError,
    UploadReceipt, UploadRequest,
};

use crate::controller::CancelHandle;

pub(crate) fn poll_ok(progress: f64) -> Result<ProgressResponse, PollError> {
    Ok(ProgressResponse { progress })
}

pub(crate) fn spy_film_request() -> UploadRequest {
    UploadRequest {
        title: "Night Train".to_string(),
        log_line: "A spy film".to_string(),
        production_year: "2023".to_string(),
        star1: "Jane Doe".to_string(),
        primary_file: Some(MediaFile::new("video.mp4", vec![0u8; 32])),
        auxiliary_files: vec![MediaFile::new("poster.jpg", vec![0u8; 8])],
        ..Default::default()
    }
}

/// Backend that replays scripted answers and counts calls.
///
/// Once the progress script is exhausted it keeps answering `idle_progress`,
/// or fails if none is set.
pub(crate) struct ScriptedBackend {
    submit: Mutex<Result<UploadReceipt, UploadError>>,
    progress: Mutex<VecDeque<Result<ProgressResponse, PollError>>>,
    idle_progress: Option<f64>,
    cancel_on_poll: Mutex<Option<(usize, CancelHandle)>>,
    submit_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub(crate) fn accepting(upload_id: &str) -> Self {
        Self::with_submit(Ok(UploadReceipt {
            upload_id: upload_id.to_string(),
            message: None,
        }))
    }

    pub(crate) fn rejecting(err: UploadError) -> Self {
        Self::with_submit(Err(err))
    }

    fn with_submit(submit: Result<UploadReceipt, UploadError>) -> Self {
        Self {
            submit: Mutex::new(submit),
            progress: Mutex::new(VecDeque::new()),
            idle_progress: None,
            cancel_on_poll: Mutex::new(None),
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_progress(self, script: Vec<Result<ProgressResponse, PollError>>) -> Self {
        *self.progress.lock().unwrap() = script.into();
        self
    }

    pub(crate) fn with_idle_progress(mut self, progress: f64) -> Self {
        self.idle_progress = Some(progress);
        self
    }

    /// Cancel `handle` while the `nth` poll (1-based) is in flight.
    pub(crate) fn cancel_during_poll(&self, nth: usize, handle: CancelHandle) {
        *self.cancel_on_poll.lock().unwrap() = Some((nth, handle));
    }

    pub(crate) fn set_submit(&self, submit: Result<UploadReceipt, UploadError>) {
        *self.submit.lock().unwrap() = submit;
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadBackend for ScriptedBackend {
    async fn submit_upload(&self, _request: &UploadRequest) -> Result<UploadReceipt, UploadError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit.lock().unwrap().clone()
    }

    async fn fetch_progress(&self, _session_id: &str) -> Result<ProgressResponse, PollError> {
        let call = self.poll_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((nth, handle)) = self.cancel_on_poll.lock().unwrap().as_ref() {
            if *nth == call {
                handle.cancel();
            }
        }

        let next = self.progress.lock().unwrap().pop_front();
        match (next, self.idle_progress) {
            (Some(answer), _) => answer,
            (None, Some(progress)) => Ok(ProgressResponse { progress }),
            (None, None) => Err(PollError::new("progress script exhausted", None)),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}
