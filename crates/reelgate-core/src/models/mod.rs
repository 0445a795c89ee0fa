pub mod notification;
pub mod progress;
pub mod session;
pub mod upload;

pub use notification::{Notification, Severity};
pub use progress::{ProgressResponse, ProgressUpdate, TransferProgress};
pub use session::{UploadSession, UploadStatus};
pub use upload::{MediaFile, UploadReceipt, UploadRequest};
