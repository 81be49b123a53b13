//! Authentication error types.

use thiserror::Error;

/// Error type for the authenticated request layer.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Transport outcome passed through untouched (network failures and
    /// non-401 HTTP statuses)
    #[error(transparent)]
    Transport(#[from] bfarm_transport::TransportError),

    /// The retried request was rejected with 401 again; never retried further
    #[error("Credential expired and retry was rejected")]
    AuthExpired,

    /// Credential renewal failed; the session is over and the store cleared
    #[error("Session expired")]
    SessionExpired,

    /// Login rejected by the server
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// No credential stored
    #[error("Not logged in")]
    NotLoggedIn,

    /// The renewal call exceeded its deadline
    #[error("Credential renewal timed out")]
    Timeout,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] bfarm_storage::StorageError),

    /// Access token could not be decoded as a JWT
    #[error("Malformed access token: {0}")]
    MalformedToken(String),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
