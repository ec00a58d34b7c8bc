//! Relay request handlers.
//!
//! Handlers return a `RelayResponse` instead of writing directly to the
//! session. This avoids borrow checker issues and keeps response
//! generation testable; `respond::write_response` puts the result on the
//! wire.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;

use crate::config::Config;
use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::error::RelayError;
use crate::fetch::SourceFetcher;
use crate::watermark::{build_watermark, composite, inspect_dimensions};

/// Response from a relay handler, ready to be written to the session.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: String,
    /// Response body
    pub body: Bytes,
    /// Whether to emit the full set of cache-defeating headers
    pub cache_defeat: bool,
    /// Optional Retry-After header value in seconds
    pub retry_after: Option<u64>,
}

impl RelayResponse {
    /// A successful composited-image response with cache-defeating headers.
    pub fn image(content_type: String, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body: Bytes::from(body),
            cache_defeat: true,
            retry_after: None,
        }
    }

    /// A plain text response.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            body: Bytes::copy_from_slice(body.as_bytes()),
            cache_defeat: false,
            retry_after: None,
        }
    }

    /// A JSON response.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: Bytes::from(body),
            cache_defeat: false,
            retry_after: None,
        }
    }

    /// The boundary mapping of a pipeline error: its status code and
    /// short plain-text body.
    pub fn from_error(err: &RelayError) -> Self {
        Self::text(err.http_status(), err.user_message())
    }

    /// Set a Retry-After header value.
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }
}

/// The image relay pipeline: fetch, inspect, build, composite.
///
/// Owns the HTTP client handle for the life of the process; one instance
/// serves all requests, which share nothing but the read-only logo asset.
#[derive(Clone)]
pub struct ImageRelay {
    fetcher: SourceFetcher,
    config: Arc<Config>,
}

impl ImageRelay {
    /// Create the relay from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: Arc<Config>) -> Result<Self, RelayError> {
        let fetcher = SourceFetcher::new(&config.fetch)?;
        Ok(Self { fetcher, config })
    }

    /// Handle `GET /image-proxy`.
    ///
    /// Runs the linear pipeline and maps any error to its boundary
    /// response. Never panics, never leaks internals to the caller.
    pub async fn handle_image_proxy(
        &self,
        params: &HashMap<String, String>,
        request_id: &str,
    ) -> RelayResponse {
        match self.run_pipeline(params, request_id).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    RelayError::MissingUrl | RelayError::InvalidUrl(_) => {
                        tracing::debug!(request_id = %request_id, error = %err, "Rejected request input");
                    }
                    RelayError::UpstreamFetch { .. } => {
                        tracing::warn!(request_id = %request_id, error = %err, "Upstream fetch failed");
                    }
                    RelayError::Asset(_) | RelayError::Composite(_) => {
                        tracing::error!(request_id = %request_id, error = %err, "Relay pipeline failed");
                    }
                }
                RelayResponse::from_error(&err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        params: &HashMap<String, String>,
        request_id: &str,
    ) -> Result<RelayResponse, RelayError> {
        let url = params
            .get("url")
            .filter(|v| !v.is_empty())
            .ok_or(RelayError::MissingUrl)?;

        let source = self.fetcher.fetch(url).await?;

        let (width, height) = inspect_dimensions(&source.bytes);

        let asset = build_watermark(&self.config.watermark, width);

        let body = composite(&source, &asset, self.config.watermark.opacity)?;

        let content_type = source
            .content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        tracing::info!(
            request_id = %request_id,
            source_width = width,
            source_height = height,
            fallback_watermark = asset.is_fallback(),
            output_bytes = body.len(),
            "Relayed watermarked image"
        );

        Ok(RelayResponse::image(content_type, body))
    }
}

/// Generate response for the /health endpoint.
///
/// Returns health status with uptime and version information.
pub fn handle_health(start_time: Instant) -> RelayResponse {
    let uptime_seconds = start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "version": version
    })
    .to_string();

    RelayResponse::json(200, body)
}
