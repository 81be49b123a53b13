//! Transport error types.

use thiserror::Error;

/// Error type for a single dispatch attempt.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body text, may be empty
        body: String,
    },

    /// Transport-level failure (connect, DNS, timeout, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL or request path is invalid
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body could not be decoded
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// True iff this is the credential-expiry signal (HTTP 401).
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, TransportError::Http { status: 401, .. })
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_is_auth_expired() {
        let err = TransportError::Http {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_auth_expired());
    }

    #[test]
    fn test_other_statuses_are_not_auth_expired() {
        for status in [400, 403, 404, 500, 503] {
            let err = TransportError::Http {
                status,
                body: String::new(),
            };
            assert!(!err.is_auth_expired(), "status {}", status);
        }
    }
}
