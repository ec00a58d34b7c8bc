// Proxy module - Pingora ProxyHttp implementation
// Serves the image-proxy relay endpoint directly from request_filter;
// nothing is ever proxied to an upstream peer.

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::RequestHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::Config;
use crate::error::RelayError;
use crate::pipeline::RequestContext;

pub mod handler;
pub mod respond;

pub use handler::{handle_health, ImageRelay, RelayResponse};

/// MarkgateProxy implements the Pingora ProxyHttp trait.
/// All endpoints are answered directly in request_filter.
pub struct MarkgateProxy {
    relay: ImageRelay,
    request_semaphore: Arc<Semaphore>,
    /// Proxy start time (for uptime calculation in /health endpoint)
    start_time: Instant,
}

impl MarkgateProxy {
    /// Create a new MarkgateProxy instance from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the relay's HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, RelayError> {
        let request_semaphore = Arc::new(Semaphore::new(config.server.max_concurrent_requests));
        let relay = ImageRelay::new(Arc::new(config))?;

        Ok(Self {
            relay,
            request_semaphore,
            start_time: Instant::now(),
        })
    }

    /// Extract query parameters from URI
    fn extract_query_params(req: &RequestHeader) -> HashMap<String, String> {
        let mut params = HashMap::new();
        if let Some(query) = req.uri.query() {
            for pair in query.split('&') {
                if let Some((key, value)) = pair.split_once('=') {
                    params.insert(
                        key.to_string(),
                        urlencoding::decode(value).unwrap_or_default().to_string(),
                    );
                }
            }
        }
        params
    }

    /// Try to admit a request under the concurrency limit.
    ///
    /// Returns the permit to hold for the rest of the request, or the
    /// 503 response to send when the limit is saturated.
    fn admit(&self) -> std::result::Result<SemaphorePermit<'_>, RelayResponse> {
        self.request_semaphore.try_acquire().map_err(|_| {
            RelayResponse::text(503, "Service Temporarily Unavailable").with_retry_after(5)
        })
    }

    /// Route a request to its handler response.
    async fn dispatch(&self, ctx: &RequestContext) -> RelayResponse {
        match (ctx.method(), ctx.path()) {
            ("GET", "/image-proxy") => {
                self.relay
                    .handle_image_proxy(ctx.query_params(), ctx.request_id())
                    .await
            }
            ("GET", "/health") => handle_health(self.start_time),
            (_, "/image-proxy") | (_, "/health") => {
                RelayResponse::text(405, "Method Not Allowed")
            }
            _ => RelayResponse::text(404, "Not Found"),
        }
    }
}

#[async_trait]
impl ProxyHttp for MarkgateProxy {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::new("GET".to_string(), "/".to_string())
    }

    /// Never called: every request is answered in request_filter.
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "All requests are handled in request_filter",
        ))
    }

    /// Handle every incoming request and write the response directly.
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        *ctx = RequestContext::with_query_params(
            req.method.to_string(),
            req.uri.path().to_string(),
            Self::extract_query_params(req),
        );

        let started = Instant::now();

        // Reject if at max concurrent requests; permit is held for the
        // rest of the request.
        let _permit = match self.admit() {
            Ok(permit) => permit,
            Err(response) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    "Rejecting request due to max concurrent requests reached"
                );

                respond::write_response(session, &response).await?;
                return Ok(true);
            }
        };

        let response = self.dispatch(ctx).await;

        respond::write_response(session, &response).await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status = response.status,
            duration_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        Ok(true)
    }
}
