//! Render service transport.
//!
//! The service is a black box: it takes the multipart payload and answers
//! with JSON carrying either `video_url` or `error`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use shorts_common::config::ServiceConfig;
use shorts_common::error::{ShortsError, ShortsResult};

use crate::lifecycle::DownloadAction;
use crate::payload::{FieldValue, SubmissionPayload};

/// JSON body returned by the render service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResponse {
    /// Locator of the rendered video on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Service-provided message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A decoded reply: HTTP status plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReply {
    pub status: u16,
    pub body: RenderResponse,
}

impl RenderReply {
    pub fn new(status: u16, body: RenderResponse) -> Self {
        Self { status, body }
    }

    /// Shorthand for a 200 reply carrying `video_url`.
    pub fn video(url: impl Into<String>) -> Self {
        Self::new(
            200,
            RenderResponse {
                video_url: Some(url.into()),
                error: None,
            },
        )
    }

    /// Shorthand for an error reply.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::new(
            status,
            RenderResponse {
                video_url: None,
                error: Some(message.into()),
            },
        )
    }

    /// Whether the outcome indicator reports success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be sent or the reply could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to build request: {message}")]
    Request { message: String },

    #[error("Failed to reach render service: {message}")]
    Connection { message: String },

    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse { status: u16, message: String },
}

impl From<TransportError> for ShortsError {
    fn from(err: TransportError) -> Self {
        ShortsError::transport(err.to_string())
    }
}

/// Trait for render service transports (HTTP, in-process fakes, etc.).
#[async_trait::async_trait]
pub trait RenderService: Send + Sync {
    /// Send one payload and wait for the decoded reply.
    async fn submit(&self, payload: SubmissionPayload) -> Result<RenderReply, TransportError>;

    /// Transport name for logging.
    fn name(&self) -> &str;
}

/// Render service reached over HTTP with a multipart POST.
#[derive(Debug, Clone)]
pub struct HttpRenderService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderService {
    /// Build a client for the configured endpoint.
    ///
    /// The core imposes no deadline; `timeout_secs` is the only timeout.
    pub fn new(config: &ServiceConfig) -> ShortsResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ShortsError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Download the artifact named by `action` into `dir`.
    pub async fn fetch_artifact(&self, action: &DownloadAction, dir: &Path) -> ShortsResult<PathBuf> {
        tracing::info!(url = %action.url, "Downloading generated video");

        let response = self
            .client
            .get(&action.url)
            .send()
            .await
            .map_err(|e| ShortsError::download(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ShortsError::download(format!(
                "Server answered HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ShortsError::download(format!("Failed to read body: {e}")))?;

        tokio::fs::create_dir_all(dir).await?;
        let output_path = action.target_in(dir);
        tokio::fs::write(&output_path, &bytes).await?;

        tracing::info!(path = %output_path.display(), bytes = bytes.len(), "Saved generated video");
        Ok(output_path)
    }
}

#[async_trait::async_trait]
impl RenderService for HttpRenderService {
    async fn submit(&self, payload: SubmissionPayload) -> Result<RenderReply, TransportError> {
        let form = into_form(payload)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::MalformedResponse {
                status,
                message: e.to_string(),
            })?;

        let body: RenderResponse =
            serde_json::from_str(&text).map_err(|e| TransportError::MalformedResponse {
                status,
                message: e.to_string(),
            })?;

        tracing::debug!(status, ?body, "Render service replied");
        Ok(RenderReply { status, body })
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Convert a payload into a multipart form, keeping field order.
///
/// Names and file names go out as raw UTF-8, the way browsers send them.
pub fn into_form(payload: SubmissionPayload) -> Result<Form, TransportError> {
    let mut form = Form::new().percent_encode_noop();
    for field in payload.into_fields() {
        form = match field.value {
            FieldValue::Text(text) => form.text(field.name, text),
            FieldValue::File(file) => {
                let part = Part::bytes(file.data().to_vec())
                    .file_name(file.file_name().to_string())
                    .mime_str(file.mime_type())
                    .map_err(|e| TransportError::Request {
                        message: format!("{}: {e}", file.file_name()),
                    })?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::build_request;
    use shorts_composition::{Composition, GlobalSettings, MediaBlob};

    #[test]
    fn test_response_parses_success_and_error_shapes() {
        let ok: RenderResponse =
            serde_json::from_str(r#"{"video_url":"http://localhost:5000/get-video?filename=output.mp4"}"#)
                .unwrap();
        assert_eq!(
            ok.video_url.as_deref(),
            Some("http://localhost:5000/get-video?filename=output.mp4")
        );
        assert!(ok.error.is_none());

        let err: RenderResponse = serde_json::from_str(r#"{"error":"No images provided"}"#).unwrap();
        assert_eq!(err.error.as_deref(), Some("No images provided"));

        let other: RenderResponse = serde_json::from_str(r#"{"status":"done"}"#).unwrap();
        assert_eq!(other, RenderResponse::default());
    }

    #[test]
    fn test_reply_success_range() {
        assert!(RenderReply::video("http://x/y.mp4").is_success());
        assert!(!RenderReply::error(400, "bad").is_success());
        assert!(!RenderReply::error(500, "boom").is_success());
    }

    #[test]
    fn test_into_form_rejects_invalid_mime() {
        let mut composition = Composition::new();
        composition.append([MediaBlob::new("x.png", "not a mime", vec![0])]);
        let payload = build_request(&composition, &GlobalSettings::default());
        let err = into_form(payload).unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }

    #[test]
    fn test_http_service_keeps_endpoint() {
        let config = ServiceConfig {
            endpoint: "http://render.local/generate-video".to_string(),
            timeout_secs: Some(30),
        };
        let service = HttpRenderService::new(&config).unwrap();
        assert_eq!(service.endpoint(), "http://render.local/generate-video");
        assert_eq!(service.name(), "http");
    }

    #[test]
    fn test_transport_error_converts_to_shorts_error() {
        let err: ShortsError = TransportError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert!(err.to_string().contains("refused"));
    }
}
