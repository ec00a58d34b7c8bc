// Error types module

use std::fmt;

/// Centralized error type for the relay pipeline
///
/// Categorizes errors by where in the pipeline they occur, which
/// determines the HTTP status and the short plain-text body the
/// caller sees. Internal detail is logged, never surfaced.
#[derive(Debug, Clone)]
pub enum RelayError {
    /// The url query parameter was absent or empty.
    MissingUrl,

    /// The url parameter was present but unusable (unparseable,
    /// unsupported scheme).
    InvalidUrl(String),

    /// Upstream fetch failures. Carries the upstream status code when
    /// the upstream responded at all; None for transport-level failures.
    UpstreamFetch {
        status: Option<u16>,
        message: String,
    },

    /// Watermark asset failures (logo unreadable/corrupt). Always
    /// recovered internally via the text fallback; never reaches the caller.
    Asset(String),

    /// Source bytes could not be decoded or re-encoded as an image.
    /// Terminal for the request.
    Composite(String),
}

impl RelayError {
    /// HTTP status this error maps to at the response boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            RelayError::MissingUrl | RelayError::InvalidUrl(_) => 400,
            RelayError::UpstreamFetch { status, .. } => status.unwrap_or(502),
            // Asset errors are recovered before reaching the boundary;
            // if one ever does, collapse to a generic server error.
            RelayError::Asset(_) => 500,
            RelayError::Composite(_) => 500,
        }
    }

    /// Short plain-text body for the caller. Never includes internals.
    pub fn user_message(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "Missing url parameter",
            RelayError::InvalidUrl(_) => "Invalid url parameter",
            RelayError::UpstreamFetch { .. } => "Failed to fetch image",
            RelayError::Asset(_) | RelayError::Composite(_) => "Internal Server Error",
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::MissingUrl => write!(f, "Input error: missing url parameter"),
            RelayError::InvalidUrl(msg) => write!(f, "Input error: invalid url: {}", msg),
            RelayError::UpstreamFetch {
                status: Some(code),
                message,
            } => {
                write!(f, "Upstream fetch error (status {}): {}", code, message)
            }
            RelayError::UpstreamFetch {
                status: None,
                message,
            } => {
                write!(f, "Upstream fetch error: {}", message)
            }
            RelayError::Asset(msg) => write!(f, "Watermark asset error: {}", msg),
            RelayError::Composite(msg) => write!(f, "Composite error: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {}
