//! Source image fetcher.
//!
//! Retrieves the bytes of the image being relayed from an upstream URL.
//! The fetch is bounded two ways: a client-level timeout and a cap on the
//! number of body bytes read into memory. Transport caching is disabled
//! with a `Cache-Control: no-cache` request header so the relay always
//! sees the current upstream bytes.

use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::config::FetchConfig;
use crate::error::RelayError;

/// A fetched source image: raw bytes plus the content type the upstream
/// declared, if any. Consumed by the metadata inspector and compositor,
/// discarded once the response is emitted.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Fetcher for source images.
///
/// Holds the HTTP client for the lifetime of the process; constructed
/// once at proxy startup and passed by reference into each request.
#[derive(Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
    max_source_bytes: usize,
}

impl SourceFetcher {
    /// Create a new fetcher with the given bounds.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::UpstreamFetch` if the HTTP client cannot be
    /// created (TLS configuration issues, resource exhaustion).
    pub fn new(config: &FetchConfig) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::UpstreamFetch {
                status: None,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            max_source_bytes: config.max_source_bytes,
        })
    }

    /// Validate and parse a source URL.
    ///
    /// Only absolute http/https URLs are accepted.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidUrl` for unparseable URLs or unsupported schemes.
    pub fn validate_url(url: &str) -> Result<reqwest::Url, RelayError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| RelayError::InvalidUrl(format!("unparseable url: {}", e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(RelayError::InvalidUrl(format!(
                "unsupported scheme: {}",
                other
            ))),
        }
    }

    /// Fetch the source image at the given URL.
    ///
    /// # Errors
    ///
    /// - `RelayError::InvalidUrl` if the URL is invalid
    /// - `RelayError::UpstreamFetch` with the upstream status for non-2xx
    ///   responses, or without one for transport failures and oversized bodies
    pub async fn fetch(&self, url: &str) -> Result<SourceImage, RelayError> {
        let parsed = Self::validate_url(url)?;

        let response = self
            .client
            .get(parsed)
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| RelayError::UpstreamFetch {
                status: None,
                message: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::UpstreamFetch {
                status: Some(status.as_u16()),
                message: format!("upstream returned {}", status),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        // Reject early when the upstream declares an oversized body.
        if let Some(len) = response.content_length() {
            if len as usize > self.max_source_bytes {
                return Err(RelayError::UpstreamFetch {
                    status: None,
                    message: format!(
                        "declared body size {} exceeds limit {}",
                        len, self.max_source_bytes
                    ),
                });
            }
        }

        let body = self.read_capped(response).await?;

        Ok(SourceImage {
            bytes: body,
            content_type,
        })
    }

    /// Read the response body chunk by chunk, enforcing the byte cap even
    /// when the upstream omits Content-Length.
    async fn read_capped(&self, mut response: reqwest::Response) -> Result<Bytes, RelayError> {
        let mut body = BytesMut::new();

        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|e| RelayError::UpstreamFetch {
                    status: None,
                    message: format!("failed to read body: {}", e),
                })?;

            let chunk = match chunk {
                Some(c) => c,
                None => break,
            };

            if body.len() + chunk.len() > self.max_source_bytes {
                return Err(RelayError::UpstreamFetch {
                    status: None,
                    message: format!("body exceeds limit of {} bytes", self.max_source_bytes),
                });
            }

            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_http_and_https() {
        assert!(SourceFetcher::validate_url("http://example.com/a.jpg").is_ok());
        assert!(SourceFetcher::validate_url("https://cdn.example.com/img/a.png?v=2").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        let result = SourceFetcher::validate_url("ftp://example.com/a.jpg");
        assert!(matches!(result, Err(RelayError::InvalidUrl(_))));

        let result = SourceFetcher::validate_url("file:///etc/passwd");
        assert!(matches!(result, Err(RelayError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        let result = SourceFetcher::validate_url("not a url at all");
        assert!(matches!(result, Err(RelayError::InvalidUrl(_))));

        // relative URLs are not absolute and must be rejected
        let result = SourceFetcher::validate_url("/images/a.jpg");
        assert!(matches!(result, Err(RelayError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetcher_creation() {
        let config = FetchConfig {
            timeout_secs: 5,
            max_source_bytes: 1024,
        };
        let fetcher = SourceFetcher::new(&config).expect("should create fetcher");
        assert_eq!(fetcher.max_source_bytes, 1024);
    }
}
