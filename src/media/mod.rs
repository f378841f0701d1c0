//! Image hosting passthrough. Uploaded files are forwarded to Cloudinary and
//! only the resulting public URL is kept.

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::MediaConfig;

const CLOUDINARY_API: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("image host is not configured")]
    NotConfigured,

    #[error("image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("image host rejected the upload: {0}")]
    Rejected(String),
}

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[async_trait]
pub trait MediaHost: Send + Sync + 'static {
    /// Stores the file and returns its public URL
    async fn upload(&self, file: UploadedFile) -> Result<String, MediaError>;
}

pub struct CloudinaryHost {
    config: MediaConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    error: Option<CloudinaryErrorBody>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: MediaConfig) -> Self {
        if !config.is_configured() {
            tracing::warn!("Cloudinary credentials missing; image uploads will fail");
        }
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Signature over the alphabetically sorted upload parameters followed by the secret.
    /// The account must be set to SHA-256 signatures.
    pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, String)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

const SIGNATURE_HINT: &str = "uploads are signed with SHA-256; set the Cloudinary account's signature algorithm to SHA-256";

/// Cloudinary reports an algorithm mismatch as a bad signature
fn rejection_message(message: String) -> String {
    if message.to_ascii_lowercase().contains("invalid signature") {
        format!("{} ({})", message, SIGNATURE_HINT)
    } else {
        message
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: UploadedFile) -> Result<String, MediaError> {
        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            self.config.cloud_name.as_deref(),
            self.config.api_key.as_deref(),
            self.config.api_secret.as_deref(),
        ) else {
            return Err(MediaError::NotConfigured);
        };

        let params = vec![
            ("folder", self.config.folder.clone()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];
        let signature = Self::sign(&params, api_secret);

        let mut part = reqwest::multipart::Part::bytes(file.bytes.to_vec()).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let mut form = reqwest::multipart::Form::new()
            .text("api_key", api_key.to_string())
            .text("signature", signature)
            .part("file", part);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = format!("{}/{}/image/upload", CLOUDINARY_API, cloud_name);
        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body: CloudinaryResponse = response.json().await?;

        match (body.secure_url, body.error) {
            (Some(secure_url), _) if status.is_success() => {
                tracing::debug!("Uploaded image to {}", secure_url);
                Ok(secure_url)
            }
            (_, Some(error)) => Err(MediaError::Rejected(rejection_message(error.message))),
            _ => Err(MediaError::Rejected(format!("unexpected response status {}", status))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sorts_params_and_appends_secret() {
        let params = vec![
            ("timestamp", "1315060510".to_string()),
            ("folder", "project2".to_string()),
        ];
        let expected = {
            let mut hasher = Sha256::new();
            hasher.update(b"folder=project2&timestamp=1315060510abcd");
            format!("{:x}", hasher.finalize())
        };
        assert_eq!(CloudinaryHost::sign(&params, "abcd"), expected);
        assert_eq!(expected.len(), 64);
    }

    #[test]
    fn signature_rejection_points_at_algorithm_setting() {
        let message = rejection_message("Invalid Signature 1a2b. String to sign - 'folder=project2'.".to_string());
        assert!(message.contains("SHA-256"));

        assert_eq!(rejection_message("File size too large".to_string()), "File size too large");
    }

    #[tokio::test]
    async fn unconfigured_host_refuses_upload() {
        let host = CloudinaryHost::new(MediaConfig::default());
        let file = UploadedFile {
            file_name: "a.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"\x89PNG"),
        };
        assert!(matches!(host.upload(file).await, Err(MediaError::NotConfigured)));
    }
}
