use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{GhostError, Result};
use crate::report::Reporter;
use crate::transport::{ApiRequest, ApiResponse, FilePart, HttpTransport, RequestBody, Transport};

pub const API_VERSION: &str = "v5.0";
pub const DEFAULT_STATUS: &str = "draft";

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Clone)]
pub struct ClientConfig {
    base_endpoint: String,
    token: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_endpoint", &self.base_endpoint)
            .field("token", &"***REDACTED***")
            .finish()
    }
}

impl ClientConfig {
    /// Strips exactly one trailing `/` from `site_url` before appending the
    /// Admin API path.
    pub fn new(site_url: &str, token: &str) -> Self {
        let site = site_url.strip_suffix('/').unwrap_or(site_url);
        Self {
            base_endpoint: format!("{site}/ghost/api/{API_VERSION}/admin"),
            token: token.to_string(),
        }
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_endpoint)
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut auth = HeaderValue::from_str(&format!("Ghost {}", self.token)).map_err(|_| {
            GhostError::Validation("ghost_admin_api_key contains invalid header characters".into())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            HeaderName::from_static("accept-version"),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

/// What the caller wants published.
#[derive(Debug, Clone, PartialEq)]
pub struct PostInput {
    pub title: String,
    pub body_html: String,
    pub status: String,
    /// Comma-separated tag names.
    pub tags: Option<String>,
    pub excerpt: Option<String>,
    /// Either a local file path or an already-hosted URL.
    pub feature_image: Option<String>,
}

impl PostInput {
    pub fn new(title: impl Into<String>, body_html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_html: body_html.into(),
            status: DEFAULT_STATUS.to_string(),
            tags: None,
            excerpt: None,
            feature_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRef {
    pub name: String,
}

/// Post object as sent to `POST /posts/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostData {
    pub title: String,
    pub html: String,
    pub status: String,
    pub tags: Vec<TagRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostResult {
    pub id: String,
    pub url: String,
    pub title: String,
}

#[derive(Serialize)]
struct PostsRequest<'a> {
    posts: [&'a PostData; 1],
}

#[derive(Deserialize)]
struct PostsResponse {
    posts: Vec<PostResult>,
}

#[derive(Deserialize)]
struct ImagesResponse {
    images: Vec<UploadedImage>,
}

#[derive(Deserialize)]
struct UploadedImage {
    url: String,
}

#[derive(Deserialize)]
struct GhostErrors {
    errors: Vec<GhostErrorItem>,
}

#[derive(Deserialize)]
struct GhostErrorItem {
    message: String,
}

/// Splits comma-separated tags into trimmed names. Empty pieces such as the
/// one in `"a,,b"` are skipped rather than sent as nameless tags.
pub fn split_tags(tags: &str) -> Vec<TagRef> {
    tags.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| TagRef {
            name: name.to_string(),
        })
        .collect()
}

/// MIME type for an upload, chosen by lower-cased file extension.
pub fn content_type_for(path: impl AsRef<Path>) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => OCTET_STREAM,
    }
}

/// Ghost Admin API client.
///
/// Calls are strictly sequential: `publish` finishes the image upload before
/// it creates the post. The client holds no locks, so sharing one instance
/// between concurrent operations is not supported.
pub struct GhostClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
    reporter: Arc<dyn Reporter>,
}

impl GhostClient<HttpTransport> {
    pub fn new(site_url: &str, admin_api_key: &str, reporter: Arc<dyn Reporter>) -> Result<Self> {
        let config = ClientConfig::new(site_url, admin_api_key);
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport, reporter))
    }
}

impl<T: Transport> GhostClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            config,
            transport,
            reporter,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn create_post(&self, post: &PostData) -> Result<PostResult> {
        match self.try_create_post(post).await {
            Ok(result) => {
                self.reporter
                    .info(&format!("Post created successfully: {}", result.title));
                Ok(result)
            }
            Err(e) => {
                self.report_failure("Failed to create post", &e);
                Err(e)
            }
        }
    }

    /// Uploads a local image and returns its hosted URL.
    pub async fn upload_image(&self, path: impl AsRef<Path>) -> Result<String> {
        match self.try_upload_image(path.as_ref()).await {
            Ok(url) => {
                self.reporter
                    .info(&format!("Image uploaded successfully: {url}"));
                Ok(url)
            }
            Err(e) => {
                self.report_failure("Failed to upload image", &e);
                Err(e)
            }
        }
    }

    /// Builds the post payload, uploading a local feature image first, then
    /// creates the post.
    ///
    /// A `feature_image` that names an existing regular file is uploaded;
    /// anything else, a directory included, is passed through as a URL. The
    /// file may disappear between that check and the read, in which case the
    /// upload fails.
    pub async fn publish(&self, input: &PostInput) -> Result<PostResult> {
        let feature_image = match input.feature_image.as_deref() {
            Some(image) if Path::new(image).is_file() => Some(self.upload_image(image).await?),
            Some(image) => Some(image.to_string()),
            None => None,
        };

        let post = PostData {
            title: input.title.clone(),
            html: input.body_html.clone(),
            status: input.status.clone(),
            tags: input.tags.as_deref().map(split_tags).unwrap_or_default(),
            excerpt: input.excerpt.clone(),
            feature_image,
        };

        self.create_post(&post).await
    }

    async fn try_create_post(&self, post: &PostData) -> Result<PostResult> {
        let body = serde_json::to_value(PostsRequest { posts: [post] })
            .map_err(|e| GhostError::Protocol(format!("Failed to encode post: {e}")))?;

        let resp = self
            .transport
            .send(ApiRequest {
                url: self.config.endpoint("/posts/"),
                body: RequestBody::Json(body),
            })
            .await?;
        check_status(&resp)?;

        let parsed: PostsResponse = serde_json::from_str(&resp.body)
            .map_err(|e| GhostError::Protocol(format!("malformed posts response: {e}")))?;
        parsed
            .posts
            .into_iter()
            .next()
            .ok_or_else(|| GhostError::Protocol("posts response contained no posts".into()))
    }

    async fn try_upload_image(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(GhostError::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|cause| GhostError::Io {
            path: path.to_path_buf(),
            cause,
        })?;
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let resp = self
            .transport
            .send(ApiRequest {
                url: self.config.endpoint("/images/upload/"),
                body: RequestBody::Multipart(FilePart {
                    file_name,
                    content_type: content_type_for(path),
                    bytes,
                }),
            })
            .await?;
        check_status(&resp)?;

        let parsed: ImagesResponse = serde_json::from_str(&resp.body)
            .map_err(|e| GhostError::Protocol(format!("malformed images response: {e}")))?;
        parsed
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| GhostError::Protocol("images response contained no images".into()))
    }

    fn report_failure(&self, context: &str, err: &GhostError) {
        self.reporter.error(&format!("{context}: {err}"));
        if let Some(body) = err.diagnostic_body() {
            self.reporter.error(&format!("Response data: {body}"));
        }
    }
}

fn check_status(resp: &ApiResponse) -> Result<()> {
    if resp.is_success() {
        return Ok(());
    }

    let message = serde_json::from_str::<GhostErrors>(&resp.body)
        .ok()
        .and_then(|e| e.errors.into_iter().next())
        .map(|e| e.message)
        .unwrap_or_else(|| format!("Request failed with status code {}", resp.status));
    let body = (!resp.body.trim().is_empty()).then(|| resp.body.clone());

    Err(GhostError::Api {
        status: resp.status,
        message,
        body,
    })
}
