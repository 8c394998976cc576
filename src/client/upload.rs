use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::{
    client::{
        Bazaar,
        error::{ClientError, ClientResult, ValidationErrors},
    },
    config::ClientConfig,
    dto::payments::UploadResponse,
    response::{ApiResponse, ErrorData},
};

/// Image hosting used for profile photos and meal images. Returns the public
/// URL of the stored file.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<String>;
}

/// imgbb-compatible host: multipart `image` field, API key in the query.
pub struct ImgBbHost {
    http: reqwest::Client,
    endpoint: String,
    key: Option<String>,
}

impl ImgBbHost {
    pub fn new(endpoint: impl Into<String>, key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            key,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.image_upload_url.clone(),
            config.image_upload_key.clone(),
        )
    }
}

#[async_trait]
impl ImageHost for ImgBbHost {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<String> {
        if bytes.is_empty() {
            let mut errors = ValidationErrors::default();
            errors.add("image", "Please choose an image");
            return Err(ClientError::Validation(errors));
        }

        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let mut request = self
            .http
            .post(&self.endpoint)
            .multipart(Form::new().part("image", part));
        if let Some(key) = &self.key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<ErrorData>>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse =
            serde_json::from_slice(&body).map_err(|err| ClientError::Decode {
                context: self.endpoint.clone(),
                message: err.to_string(),
            })?;
        tracing::debug!(size, url = %uploaded.data.display_url, "image uploaded");
        Ok(uploaded.data.display_url)
    }
}

impl Bazaar {
    pub fn image_host(&self) -> ImgBbHost {
        ImgBbHost::from_config(self.config())
    }
}
