use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::core::config::Settings;

use super::{MediaFile, MediaUploader, UploadError};

/// Client for the external upload endpoint: one multipart POST carrying the
/// file and an unsigned preset name, answered with the issued URL.
#[derive(Debug, Clone)]
pub struct HttpMediaUploader {
    client: Client,
    upload_url: String,
    upload_preset: String,
    max_upload_size_mb: u64,
    allowed_extensions: Vec<String>,
}

impl HttpMediaUploader {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.media().timeout_seconds);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("Failed to build media upload HTTP client")?;

        Ok(Self {
            client,
            upload_url: settings.media().upload_url.trim_end_matches('/').to_string(),
            upload_preset: settings.media().upload_preset.clone(),
            max_upload_size_mb: settings.media().max_upload_size_mb,
            allowed_extensions: settings.media().allowed_extensions.clone(),
        })
    }

    fn check_file(&self, file: &MediaFile) -> Result<(), UploadError> {
        validate_media_file(&file.filename, &file.content_type, &self.allowed_extensions)?;

        let limit_bytes = self.max_upload_size_mb * 1024 * 1024;
        if file.bytes.len() as u64 > limit_bytes {
            return Err(UploadError::TooLarge { limit_mb: self.max_upload_size_mb });
        }

        Ok(())
    }
}

/// Reject files whose extension is not allowed or whose MIME type does not
/// match the extension.
pub(crate) fn validate_media_file(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), UploadError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| UploadError::UnsupportedType { filename: filename.to_string() })?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(UploadError::UnsupportedType { filename: filename.to_string() });
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType { filename: filename.to_string() })
    }
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "jpg" | "jpeg" => matches!(mime, "image/jpeg" | "image/jpg"),
        "png" => mime == "image/png",
        "webp" => mime == "image/webp",
        "gif" => mime == "image/gif",
        "mp4" => mime == "video/mp4",
        "webm" => mime == "video/webm",
        _ => false,
    }
}

#[async_trait]
impl MediaUploader for HttpMediaUploader {
    async fn upload(&self, file: &MediaFile) -> Result<String, UploadError> {
        self.check_file(file)?;

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|err| UploadError::Transport(err.to_string()))?;
        let form =
            Form::new().part("file", part).text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| UploadError::Transport(err.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|err| UploadError::Transport(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            let detail = body
                .get("error")
                .and_then(|error| error.get("message"))
                .or_else(|| body.get("detail"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(UploadError::Rejected { status: status.as_u16(), detail });
        }

        body.get("secure_url")
            .or_else(|| body.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(UploadError::MalformedResponse)
    }
}
