use serde::{Deserialize, Serialize};

/// Body of `GET /upload/progress`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Reported percentage, 0-100, possibly fractional.
    pub progress: f64,
}

impl ProgressResponse {
    /// Rounded and clamped to 0..=100. Non-finite values count as 0.
    pub fn percent(&self) -> u8 {
        if !self.progress.is_finite() {
            return 0;
        }
        self.progress.round().clamp(0.0, 100.0) as u8
    }
}

/// One observation of an active session's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub progress_percent: u8,
    pub done: bool,
}

impl ProgressUpdate {
    /// Fold a new report into the previous percentage; progress never regresses.
    pub fn merge(previous: u8, reported: u8) -> Self {
        let progress_percent = previous.max(reported).min(100);
        Self {
            progress_percent,
            done: progress_percent >= 100,
        }
    }
}

/// Bytes streamed so far while a submit body is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_sent: u64,
    pub bytes_total: u64,
}

impl TransferProgress {
    pub fn percent(&self) -> u8 {
        if self.bytes_total == 0 {
            return 100;
        }
        let ratio = (self.bytes_sent.min(self.bytes_total) as f64 * 100.0)
            / self.bytes_total as f64;
        ratio.round() as u8
    }
}
