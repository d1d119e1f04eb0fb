//! HTTP seam between `GhostClient` and the network.
//!
//! Requests and responses are plain data so the client can be driven by a
//! recording mock in tests. `HttpTransport` is the reqwest-backed
//! implementation used by the binary.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::api::ClientConfig;
use crate::error::{GhostError, Result};

/// A file attached as the single `file` field of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// A POST to an absolute Admin API URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one round trip. Non-2xx statuses are returned as data, only
    /// failures to get a response at all are errors.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .default_headers(config.default_headers()?)
            .build()
            .map_err(|e| GhostError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let builder = self.http.post(&request.url);
        let builder = match request.body {
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(file.content_type)
                    .map_err(|e| GhostError::Transport(format!("Invalid MIME type: {e}")))?;
                // The form supplies its own multipart content type, which
                // takes precedence over the JSON default header.
                builder.multipart(Form::new().part("file", part))
            }
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| GhostError::Transport(format!("HTTP request failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| GhostError::Transport(format!("Failed to read response body: {e}")))?;
        Ok(ApiResponse { status, body })
    }
}
