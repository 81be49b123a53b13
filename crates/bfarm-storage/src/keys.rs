//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Credential document (access token, refresh token and role as one JSON value)
    pub const CREDENTIAL: &'static str = "credential";
}
