//! Access-token claims decoding.

use crate::{AuthError, AuthResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// Claims carried in the access token payload.
///
/// Decoded for display purposes only; the signature is not verified here,
/// the server remains the authority on every call.
#[derive(Debug, Clone, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Role claim
    #[serde(default)]
    pub role: Option<String>,
}

/// Decode the payload segment of a JWT access token.
pub fn decode_claims(token: &str) -> AuthResult<UserClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::MalformedToken("missing payload segment".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(e.to_string()))
}
