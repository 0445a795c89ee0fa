use std::path::Path;

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Broad family of an upload part, used for logging and form hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
    Other,
}

impl MediaKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let normalized = content_type.to_lowercase();
        if normalized.starts_with("video/") {
            MediaKind::Video
        } else if normalized.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Other
        }
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Infer the Content-Type of an upload part from its file name.
pub fn content_type_for(filename: &str) -> &'static str {
    let Some(extension) = extension_of(filename) else {
        return DEFAULT_CONTENT_TYPE;
    };

    match extension.as_str() {
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => {
            tracing::debug!(
                extension = %extension,
                "Unknown extension, sending part as octet-stream"
            );
            DEFAULT_CONTENT_TYPE
        }
    }
}
