use std::time::Duration;

use dashboard_logging::{dash_debug, dash_info, dash_warn};
use reqwest::multipart::{Form, Part};
use reqwest::Body;

use crate::decode::{decode_error_body, decode_reply};
use crate::{FailureKind, UploadFailure, UploadPayload, UploadReply};

/// Name of the multipart part that carries the file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl UploadSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Sends one file and waits for the service's verdict. Never retries.
    async fn upload(&self, payload: UploadPayload) -> Result<UploadReply, UploadFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadFailure> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadFailure::new(FailureKind::Network, err.to_string()))
    }

    fn build_form(payload: UploadPayload) -> Result<Form, UploadFailure> {
        let length = payload.content.len() as u64;
        let part = Part::stream_with_length(Body::from(payload.content), length)
            .file_name(payload.file_name)
            .mime_str(&payload.media_type)
            .map_err(|err| UploadFailure::new(FailureKind::InvalidRequest, err.to_string()))?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(&self, payload: UploadPayload) -> Result<UploadReply, UploadFailure> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| UploadFailure::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;

        dash_info!(
            "Uploading file={} bytes={} to {}",
            payload.file_name,
            payload.content.len(),
            endpoint
        );
        let form = Self::build_form(payload)?;

        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        dash_debug!("Upload response status={} body_len={}", status, body.len());

        if !status.is_success() {
            let server_error = decode_error_body(&body);
            dash_warn!("Upload rejected status={} error={:?}", status, server_error);
            return Err(UploadFailure::new(
                FailureKind::HttpStatus {
                    status: status.as_u16(),
                    server_error,
                },
                status.to_string(),
            ));
        }

        decode_reply(&body)
            .map_err(|err| UploadFailure::new(FailureKind::MalformedBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> UploadFailure {
    if err.is_timeout() {
        return UploadFailure::new(FailureKind::Timeout, err.to_string());
    }
    UploadFailure::new(FailureKind::Network, err.to_string())
}
