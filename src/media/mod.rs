use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

mod http;

pub use http::HttpMediaUploader;

/// A locally-chosen media file, held in memory until submit-time upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self { filename: filename.into(), content_type: content_type.into(), bytes }
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }

    /// Data URL for an immediate local preview, before anything is uploaded.
    pub fn preview_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// Attachment state of one question. Exactly one of: no media, a local file
/// still waiting for upload, or a URL issued by the media backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MediaState {
    #[default]
    Absent,
    PendingLocal(MediaFile),
    Remote(String),
}

impl MediaState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingLocal(_))
    }

    /// Preview source for the UI: local data URL while pending, the stored
    /// URL once resolved.
    pub fn preview(&self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::PendingLocal(file) => Some(file.preview_data_url()),
            Self::Remote(url) => Some(url.clone()),
        }
    }
}

// Persisted form matches the source documents: null for no media, the issued
// URL otherwise. A pending local file must never reach the store.
impl Serialize for MediaState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Remote(url) => serializer.serialize_str(url),
            Self::PendingLocal(_) => Err(serde::ser::Error::custom(
                "pending local media cannot be persisted; resolve the upload first",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for MediaState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        match value {
            None | Some(serde_json::Value::Null) => Ok(Self::Absent),
            Some(serde_json::Value::String(url)) => Ok(Self::Remote(url)),
            Some(other) => Err(D::Error::custom(format!("invalid media value: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("media upload request failed: {0}")]
    Transport(String),
    #[error("media upload rejected (status {status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("media upload response did not include a URL")]
    MalformedResponse,
    #[error("media file exceeds the {limit_mb} MB upload limit")]
    TooLarge { limit_mb: u64 },
    #[error("media file '{filename}' is not an accepted image or video type")]
    UnsupportedType { filename: String },
}

/// The media collaborator: takes a file, returns a stable URL. Called only at
/// submit time, once per question holding a pending local file.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: &MediaFile) -> Result<String, UploadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_state_serializes_like_source_documents() {
        assert_eq!(serde_json::to_value(MediaState::Absent).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(MediaState::Remote("https://cdn/x.png".into())).unwrap(),
            serde_json::json!("https://cdn/x.png")
        );

        let pending = MediaState::PendingLocal(MediaFile::new("a.png", "image/png", vec![1]));
        assert!(serde_json::to_value(pending).is_err());
    }

    #[test]
    fn media_state_deserializes_null_and_url() {
        let absent: MediaState = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(absent, MediaState::Absent);

        let remote: MediaState = serde_json::from_value(serde_json::json!("https://cdn/x")).unwrap();
        assert_eq!(remote, MediaState::Remote("https://cdn/x".into()));

        let invalid = serde_json::from_value::<MediaState>(serde_json::json!(5));
        assert!(invalid.is_err());
    }

    #[test]
    fn preview_uses_data_url_while_pending() {
        let file = MediaFile::new("pic.png", "image/png", vec![0, 1, 2]);
        let pending = MediaState::PendingLocal(file.clone());
        let preview = pending.preview().unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
        assert_eq!(MediaState::Absent.preview(), None);
    }
}
