//! Uploaded images and ingestion candidates.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub String);

impl ImageId {
    /// Generate a new random image ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Not an image type: {0}")]
    NotAnImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns true if the MIME type declares an image.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// An image accepted into the image set.
///
/// Immutable once created. The payload is shared so that snapshots of the
/// set handed to a running pipeline do not copy image bytes.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    id: ImageId,
    payload: Arc<[u8]>,
    mime_type: String,
    display_name: String,
}

impl UploadedImage {
    /// Create a new image with a fresh id.
    ///
    /// Fails if `mime_type` does not start with `image/`.
    pub fn new(
        payload: impl Into<Arc<[u8]>>,
        mime_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let mime_type = mime_type.into();
        if !is_image_mime(&mime_type) {
            return Err(ImageError::NotAnImage(mime_type));
        }

        Ok(Self {
            id: ImageId::new(),
            payload: payload.into(),
            mime_type,
            display_name: display_name.into(),
        })
    }

    pub fn id(&self) -> &ImageId {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Base64 (standard alphabet) encoding of the payload, as sent inline to
    /// the inference services.
    pub fn payload_base64(&self) -> String {
        BASE64.encode(&self.payload)
    }
}

/// A file offered for ingestion, before type filtering.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            payload,
        }
    }

    /// Returns true if the declared type is an image type.
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }

    /// Read a candidate from disk.
    ///
    /// The MIME type is inferred from the file extension. Files that are not
    /// recognised as images are returned with an empty payload and
    /// `application/octet-stream`, without being read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_type_for_path(path);

        let payload = if is_image_mime(mime_type) {
            tokio::fs::read(path).await?
        } else {
            Vec::new()
        };

        Ok(Self::new(name, mime_type, payload))
    }
}

/// Infer a MIME type from a file extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
