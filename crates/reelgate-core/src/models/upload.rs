use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::validation::{content_type_for, MediaKind};

/// A single binary part of an upload (the trailer video or a picture).
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl MediaFile {
    /// Wrap in-memory bytes, inferring the content type from the file name.
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Read a file from disk. Paths containing `..` are rejected.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("File has no usable name: {}", path.display()))?;

        Ok(Self::new(file_name, data))
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }
}

/// Metadata and files for one trailer upload.
///
/// Built freely by the caller; `validate_upload_request` decides whether
/// it may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
    pub log_line: String,
    pub production_year: String,
    pub star1: String,
    pub star2: Option<String>,
    pub star3: Option<String>,
    pub primary_file: Option<MediaFile>,
    pub auxiliary_files: Vec<MediaFile>,
}

impl UploadRequest {
    /// Total number of file bytes carried by the request.
    pub fn payload_len(&self) -> u64 {
        self.primary_file.as_ref().map_or(0, MediaFile::len)
            + self
                .auxiliary_files
                .iter()
                .map(MediaFile::len)
                .sum::<u64>()
    }
}

/// Backend answer to a successful `POST /upload-trailer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(rename = "uploadId")]
    pub upload_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_file_infers_content_type() {
        let file = MediaFile::new("video.mp4", vec![0u8; 16]);
        assert_eq!(file.content_type, "video/mp4");
        assert_eq!(file.kind(), MediaKind::Video);
        assert_eq!(file.len(), 16);
    }

    #[test]
    fn test_media_file_debug_hides_bytes() {
        let file = MediaFile::new("poster.jpg", vec![1u8, 2, 3]);
        let rendered = format!("{:?}", file);
        assert!(rendered.contains("poster.jpg"));
        assert!(rendered.contains("len: 3"));
    }

    #[test]
    fn test_payload_len_sums_all_files() {
        let request = UploadRequest {
            primary_file: Some(MediaFile::new("video.mp4", vec![0u8; 100])),
            auxiliary_files: vec![
                MediaFile::new("a.jpg", vec![0u8; 10]),
                MediaFile::new("b.png", vec![0u8; 5]),
            ],
            ..Default::default()
        };
        assert_eq!(request.payload_len(), 115);
        assert_eq!(UploadRequest::default().payload_len(), 0);
    }

    #[test]
    fn test_receipt_deserializes_upload_id() {
        let receipt: UploadReceipt =
            serde_json::from_str(r#"{"uploadId":"abc123","extra":true}"#).unwrap();
        assert_eq!(receipt.upload_id, "abc123");
        assert_eq!(receipt.message, None);
    }

    #[tokio::test]
    async fn test_load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let file = MediaFile::load(&path).await.unwrap();
        assert_eq!(file.file_name, "poster.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.data.as_ref(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_load_rejects_parent_dir() {
        let err = MediaFile::load("../secret.mp4").await.unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
    }
}
