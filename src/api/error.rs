use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies in error values.
/// 500 bytes keeps diagnostics useful without logging excessive data.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Errors returned by the swarm memory client.
///
/// Transport failures carry the requested URL and, where a response was
/// received, the status code and (truncated) body, so callers can branch
/// on status without reaching into `reqwest` internals.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("request to {url} failed with status {status}")]
    Status {
        status: StatusCode,
        url: String,
        body: Option<String>,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    /// The server answered 2xx but the body did not match the expected schema.
    #[error("invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// Malformed caller input, caught before any network I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// The challenge/sign/verify cycle failed. Causes are logged, not
    /// carried here, so transport internals never leak to unrelated callers.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// A retry attempt exceeded its per-attempt timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data around.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    pub(crate) fn from_status(status: StatusCode, url: &str, body: Option<&str>) -> Self {
        ApiError::Status {
            status,
            url: url.to_string(),
            body: body.map(Self::truncate_body),
        }
    }

    /// The HTTP status code, when the failure came with a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
