//! Login, logout and session status.

use crate::{claims, AuthError, AuthResult, UserClaims};
use bfarm_storage::{Credential, CredentialStore};
use bfarm_transport::{ApiRequest, Dispatcher, TransportError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Current session status.
#[derive(Debug, Clone)]
pub enum AuthStatus {
    /// A credential is stored
    LoggedIn {
        /// Role claim captured at login, if the server sent one
        role: Option<String>,
    },
    /// No credential stored
    NotLoggedIn,
}

/// Login endpoint response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    role: Option<String>,
}

/// Manages the session lifecycle: login mints the credential, logout clears
/// it. Mid-session renewal belongs to the refresh coordinator, not here.
pub struct SessionManager {
    dispatcher: Arc<Dispatcher>,
    store: Arc<CredentialStore>,
}

impl SessionManager {
    /// Create a session manager over the given transport and store.
    pub fn new(dispatcher: Arc<Dispatcher>, store: Arc<CredentialStore>) -> Self {
        Self { dispatcher, store }
    }

    /// Login with email and password, storing the returned credential.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthStatus> {
        debug!(email = %email, "Attempting login");

        let request = ApiRequest::post(
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        );

        let response = match self.dispatcher.send(&request, None).await {
            Ok(response) => response,
            Err(TransportError::Http { status, body }) if status == 400 || status == 401 => {
                return Err(AuthError::InvalidCredentials(body));
            }
            Err(error) => return Err(error.into()),
        };

        let data: LoginResponse = response.json()?;

        self.store.set(&Credential {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
            role: data.role.clone(),
        })?;

        info!(role = ?data.role, "Login successful");

        Ok(AuthStatus::LoggedIn { role: data.role })
    }

    /// Clear the stored credential.
    ///
    /// An explicit logout; does not fire the session-terminated callback.
    pub fn logout(&self) -> AuthResult<()> {
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Session status from the store.
    pub fn status(&self) -> AuthResult<AuthStatus> {
        match self.store.get()? {
            Some(credential) => Ok(AuthStatus::LoggedIn {
                role: credential.role,
            }),
            None => Ok(AuthStatus::NotLoggedIn),
        }
    }

    /// Claims decoded from the stored access token, if logged in.
    pub fn identity(&self) -> AuthResult<Option<UserClaims>> {
        match self.store.get()? {
            Some(credential) => Ok(Some(claims::decode_claims(&credential.access_token)?)),
            None => Ok(None),
        }
    }
}
