//! Local resource references for generated media.
//!
//! A resource reference is how binary media is handed to the presentation
//! layer. Blobs are released when the last clone is dropped; data URLs are
//! self-contained strings.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a local resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory binary payload addressable by id.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaBlob {
    id: ResourceId,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl MediaBlob {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: ResourceId::new(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Local address of the blob, e.g. `blob:<uuid>`.
    pub fn url(&self) -> String {
        format!("blob:{}", self.id)
    }
}

impl fmt::Debug for MediaBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaBlob")
            .field("id", &self.id)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("Invalid data URL: {0}")]
    Malformed(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A directly displayable `data:<mime>;base64,<payload>` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl(String);

impl DataUrl {
    /// Wrap an already base64-encoded payload.
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, data))
    }

    /// Encode raw bytes.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::from_base64(mime_type, &BASE64.encode(bytes))
    }

    /// Parse an existing data URL string.
    pub fn parse(s: &str) -> Result<Self, DataUrlError> {
        let url = Self(s.to_string());
        url.split()?;
        Ok(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The declared MIME type.
    pub fn mime_type(&self) -> Result<&str, DataUrlError> {
        self.split().map(|(mime, _)| mime)
    }

    /// Decode the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        let (_, data) = self.split()?;
        Ok(BASE64.decode(data)?)
    }

    fn split(&self) -> Result<(&str, &str), DataUrlError> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| DataUrlError::Malformed("missing 'data:' prefix".into()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| DataUrlError::Malformed("missing ',' separator".into()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| DataUrlError::Malformed("not base64 encoded".into()))?;
        Ok((mime, data))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle through which generated media reaches the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Blob(MediaBlob),
    DataUrl(DataUrl),
}

impl ResourceRef {
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            ResourceRef::Blob(blob) => Some(blob.mime_type()),
            ResourceRef::DataUrl(url) => url.mime_type().ok(),
        }
    }

    /// Address usable by a display surface.
    pub fn url(&self) -> String {
        match self {
            ResourceRef::Blob(blob) => blob.url(),
            ResourceRef::DataUrl(url) => url.as_str().to_string(),
        }
    }
}

impl From<MediaBlob> for ResourceRef {
    fn from(blob: MediaBlob) -> Self {
        ResourceRef::Blob(blob)
    }
}

impl From<DataUrl> for ResourceRef {
    fn from(url: DataUrl) -> Self {
        ResourceRef::DataUrl(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_round_trip() {
        let url = DataUrl::from_bytes("image/png", b"\x89PNG\r\n");
        assert!(url.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(url.mime_type().unwrap(), "image/png");
        assert_eq!(url.decode().unwrap(), b"\x89PNG\r\n");
    }

    #[test]
    fn test_data_url_parse_rejects_malformed() {
        assert!(DataUrl::parse("image/png;base64,AAAA").is_err());
        assert!(DataUrl::parse("data:image/png,AAAA").is_err());
        assert!(DataUrl::parse("data:image/png;base64").is_err());
        assert!(DataUrl::parse("data:image/png;base64,AAAA").is_ok());
    }

    #[test]
    fn test_data_url_bad_base64() {
        let url = DataUrl::from_base64("image/png", "not base64!!");
        assert!(matches!(url.decode(), Err(DataUrlError::Base64(_))));
    }

    #[test]
    fn test_blob_ids_are_fresh() {
        let a = MediaBlob::new("video/mp4", vec![1u8, 2, 3]);
        let b = MediaBlob::new("video/mp4", vec![1u8, 2, 3]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.len(), 3);
        assert!(a.url().starts_with("blob:"));
    }

    #[test]
    fn test_resource_ref_mime_type() {
        let blob: ResourceRef = MediaBlob::new("video/mp4", vec![0u8]).into();
        assert_eq!(blob.mime_type(), Some("video/mp4"));

        let url: ResourceRef = DataUrl::from_bytes("image/jpeg", b"x").into();
        assert_eq!(url.mime_type(), Some("image/jpeg"));
    }
}
