//! Signed uploads to the Cloudinary image API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::error::StoreError;
use crate::store::ImageStore;
use crate::validate::ImageData;

/// Upload client for one Cloudinary account.
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

/// The part of the upload response we keep.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryStore {
    /// Build a store whose requests time out after `config.timeout_secs`.
    pub fn new(config: CloudinaryConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn upload_url(&self, cloud_name: &str) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            cloud_name
        )
    }

    /// Ensure the response has a success status code, capturing the body
    /// of a failed one.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Request signature: SHA-256 over the `&`-joined, key-sorted parameters
/// followed by the API secret, hex encoded.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    fn name(&self) -> &'static str {
        "cloudinary"
    }

    async fn store(&self, image: &ImageData) -> Result<String, StoreError> {
        let (cloud_name, api_key, api_secret) = self
            .config
            .credentials()
            .ok_or(StoreError::NotConfigured("Cloudinary"))?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let folder = self.config.folder.as_str();
        let signature = sign(&[("folder", folder), ("timestamp", &timestamp)], api_secret);

        let file = Part::bytes(image.bytes.clone())
            .file_name(format!("upload.{}", image.kind.extension()))
            .mime_str(image.kind.mime())?;

        let form = Form::new()
            .text("api_key", api_key.to_string())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part("file", file);

        let response = self
            .client
            .post(self.upload_url(cloud_name))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = Self::ensure_success(response).await?.json().await?;
        tracing::debug!(url = %body.secure_url, "Cloudinary upload complete");
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sorts_parameters_and_appends_secret() {
        assert_eq!(
            sign(
                &[("timestamp", "1700000000"), ("folder", "fitnessApp")],
                "test-secret"
            ),
            "e445e223ac792d457de558025199e6ea487c3fdb268729b212de3168743670b7"
        );
        assert_eq!(
            sign(&[("b", "2"), ("a", "1")], "s"),
            "b9d014737a6137029b0d941e6dc2e469a3263824026f053fb62ebafeb021c6c7"
        );
    }

    #[test]
    fn upload_url_ignores_trailing_slash() {
        let store = CloudinaryStore::new(CloudinaryConfig {
            cloud_name: Some("demo".into()),
            api_key: None,
            api_secret: None,
            folder: "fitnessApp".into(),
            api_base: "http://127.0.0.1:9/".into(),
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(
            store.upload_url("demo"),
            "http://127.0.0.1:9/v1_1/demo/image/upload"
        );
    }
}
