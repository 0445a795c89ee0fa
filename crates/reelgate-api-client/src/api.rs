//! Domain methods of the upload API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reelgate_core::{
    MediaFile, PollError, ProgressResponse, TransferProgress, UploadBackend, UploadError,
    UploadReceipt, UploadRequest,
};
use reqwest::multipart::{Form, Part};

use crate::{ApiClient, ApiError, TransferObserver};

pub const UPLOAD_TRAILER_PATH: &str = "/upload-trailer";
pub const UPLOAD_PROGRESS_PATH: &str = "/upload/progress";

/// Multipart field carrying the trailer video.
pub const VIDEOS_FIELD: &str = "videos[]";
/// Multipart field carrying each picture.
pub const PICTURES_FIELD: &str = "pictures[]";

const CHUNK_SIZE: usize = 64 * 1024;

/// Shared byte counter for every file part of one request.
#[derive(Clone)]
pub(crate) struct TransferTracker {
    sent: Arc<AtomicU64>,
    total: u64,
    observer: TransferObserver,
}

impl TransferTracker {
    fn new(total: u64, observer: TransferObserver) -> Self {
        Self {
            sent: Arc::new(AtomicU64::new(0)),
            total,
            observer,
        }
    }

    fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        (self.observer)(TransferProgress {
            bytes_sent: sent,
            bytes_total: self.total,
        });
    }
}

fn file_part(file: &MediaFile, tracker: Option<&TransferTracker>) -> Result<Part, ApiError> {
    let part = match tracker {
        None => Part::bytes(file.data.to_vec()),
        Some(tracker) => {
            let tracker = tracker.clone();
            let data = file.data.clone();
            let len = data.len();
            let chunks = (0..len).step_by(CHUNK_SIZE).map(move |start| {
                let chunk: Bytes = data.slice(start..(start + CHUNK_SIZE).min(len));
                tracker.advance(chunk.len() as u64);
                Ok::<Bytes, std::io::Error>(chunk)
            });
            Part::stream_with_length(
                reqwest::Body::wrap_stream(futures::stream::iter(chunks)),
                file.len(),
            )
        }
    };

    part.file_name(file.file_name.clone())
        .mime_str(&file.content_type)
        .map_err(ApiError::InvalidPart)
}

/// Build the multipart body of `POST /upload-trailer`.
///
/// Optional stars are only sent when set. Pictures keep their order.
pub(crate) fn trailer_form(
    request: &UploadRequest,
    tracker: Option<&TransferTracker>,
) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", request.title.clone())
        .text("description", request.description.clone())
        .text("duration", request.duration_ms.to_string())
        .text("log_line", request.log_line.clone())
        .text("product_year", request.production_year.clone())
        .text("star1", request.star1.clone());

    if let Some(star2) = &request.star2 {
        form = form.text("star2", star2.clone());
    }
    if let Some(star3) = &request.star3 {
        form = form.text("star3", star3.clone());
    }

    if let Some(video) = &request.primary_file {
        form = form.part(VIDEOS_FIELD, file_part(video, tracker)?);
    }
    for picture in &request.auxiliary_files {
        form = form.part(PICTURES_FIELD, file_part(picture, tracker)?);
    }

    Ok(form)
}

impl ApiClient {
    /// Upload a trailer with its metadata and pictures.
    pub async fn upload_trailer(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        let tracker = self
            .transfer_observer()
            .map(|observer| TransferTracker::new(request.payload_len(), observer.clone()));
        let form = trailer_form(request, tracker.as_ref())?;

        let receipt: UploadReceipt = self.post_multipart(UPLOAD_TRAILER_PATH, form).await?;

        tracing::info!(
            upload_id = %receipt.upload_id,
            pictures = request.auxiliary_files.len(),
            bytes = request.payload_len(),
            "Trailer upload accepted"
        );
        Ok(receipt)
    }

    /// Query ingest progress of an accepted upload.
    pub async fn get_upload_progress(&self, session_id: &str) -> Result<ProgressResponse, ApiError> {
        self.get(
            UPLOAD_PROGRESS_PATH,
            &[("sessionID", session_id.to_string())],
        )
        .await
    }
}

#[async_trait]
impl UploadBackend for ApiClient {
    async fn submit_upload(&self, request: &UploadRequest) -> Result<UploadReceipt, UploadError> {
        self.upload_trailer(request).await.map_err(|err| {
            tracing::warn!(error = %err, "Trailer upload failed");
            UploadError::from_backend(err.backend_message(), err.status())
        })
    }

    async fn fetch_progress(&self, session_id: &str) -> Result<ProgressResponse, PollError> {
        self.get_upload_progress(session_id).await.map_err(|err| {
            tracing::warn!(session_id = %session_id, error = %err, "Progress query failed");
            PollError::from_backend(err.backend_message(), err.status())
        })
    }
}
