//! Reelgate upload lifecycle
//!
//! `UploadLifecycleController` submits one trailer upload at a time and tracks
//! its ingest on the backend by polling, reporting the outcome to a `Notifier`.
//!
//! ```ignore
//! let client = Arc::new(ApiClient::from_config(&config)?);
//! let mut controller =
//!     UploadLifecycleController::new(client, Arc::new(TracingNotifier), &config);
//! controller.submit(&request).await?;
//! let session = controller.run().await?;
//! ```

pub mod controller;
pub mod polling;

#[cfg(test)]
mod testing;

pub use controller::{CancelHandle, UploadLifecycleController};
