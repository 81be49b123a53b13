//! Fault-detecting API client.

use crate::{AuthError, AuthResult, RefreshCoordinator};
use bfarm_storage::CredentialStore;
use bfarm_transport::{ApiRequest, ApiResponse, Dispatcher};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// API client that recognizes credential expiry and retries once.
///
/// Every non-401 outcome — success, other HTTP errors, network errors — is
/// surfaced to the caller untouched. A 401 suspends the request on the
/// refresh coordinator and replays it exactly once with the fresh credential;
/// a second 401 surfaces `AuthError::AuthExpired` with no further attempts.
#[derive(Clone)]
pub struct AuthedClient {
    dispatcher: Arc<Dispatcher>,
    store: Arc<CredentialStore>,
    coordinator: RefreshCoordinator,
}

impl AuthedClient {
    /// Create a client, wiring a refresh coordinator over the same transport
    /// and store.
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        store: Arc<CredentialStore>,
        renewal_timeout: Duration,
    ) -> Self {
        let coordinator =
            RefreshCoordinator::new(Arc::clone(&dispatcher), Arc::clone(&store), renewal_timeout);
        Self {
            dispatcher,
            store,
            coordinator,
        }
    }

    /// The refresh coordinator, for callback registration and inspection.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Execute a request with expiry handling.
    pub async fn execute(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        let credential = self.store.get()?;

        match self.dispatcher.send(&request, credential.as_ref()).await {
            Ok(response) => return Ok(response),
            Err(error) if error.is_auth_expired() => {
                debug!(path = %request.path, "Request rejected with 401, renewing credential");
            }
            Err(error) => return Err(error.into()),
        }

        // Suspends until the renewal cycle serving this expiry completes;
        // renewal failure surfaces SessionExpired.
        let fresh = self.coordinator.fresh_credential().await?;

        match self.dispatcher.send(&request, Some(&fresh)).await {
            Ok(response) => Ok(response),
            Err(error) if error.is_auth_expired() => Err(AuthError::AuthExpired),
            Err(error) => Err(error.into()),
        }
    }

    /// GET `path` and deserialize the JSON response body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AuthResult<T> {
        let response = self.execute(ApiRequest::get(path)).await?;
        Ok(response.json()?)
    }

    /// POST `body` to `path` and deserialize the JSON response body.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> AuthResult<T> {
        let response = self.execute(ApiRequest::post(path, body)).await?;
        Ok(response.json()?)
    }
}
