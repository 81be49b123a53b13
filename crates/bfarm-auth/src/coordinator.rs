//! Single-flight credential renewal.
//!
//! The coordinator owns the only shared mutable state of the auth layer: a
//! two-state cycle (`Idle` / `Refreshing`) plus the queue of callers blocked
//! on the in-flight renewal. Every transition happens inside one mutex so two
//! callers can never both decide to lead a cycle.

use crate::{AuthError, AuthResult};
use bfarm_storage::{Credential, CredentialStore};
use bfarm_transport::{ApiRequest, Dispatcher};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Observable coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// No renewal in flight
    Idle,
    /// A renewal call is in flight; new expiry events queue behind it
    Refreshing,
}

/// Callback invoked when renewal fails and the session is terminated.
pub type SessionCallback = Box<dyn Fn() + Send + Sync>;

/// Renewal endpoint response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenewalResponse {
    token: String,
    refresh_token: String,
}

/// Outcome delivered to each queued waiter: the fresh credential, or `None`
/// when the cycle failed and the session ended.
type WaiterOutcome = Option<Credential>;

enum CycleState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<WaiterOutcome>>,
    },
}

/// Mutex-guarded single-flight renewal coordinator.
///
/// The lock covers leader election, waiter enqueue and the final drain; the
/// renewal network call itself runs outside it, in a spawned task so that the
/// cycle completes even if the caller that started it is cancelled. Clones
/// share the same cycle.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    dispatcher: Arc<Dispatcher>,
    store: Arc<CredentialStore>,
    renewal_timeout: Duration,
    state: Mutex<CycleState>,
    on_session_terminated: Mutex<Option<SessionCallback>>,
}

impl RefreshCoordinator {
    /// Create a coordinator over the given transport and store.
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        store: Arc<CredentialStore>,
        renewal_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                dispatcher,
                store,
                renewal_timeout,
                state: Mutex::new(CycleState::Idle),
                on_session_terminated: Mutex::new(None),
            }),
        }
    }

    /// Register a callback fired once per failed renewal cycle, used by the
    /// surrounding application to force re-authentication.
    pub fn set_session_terminated_callback(&self, callback: SessionCallback) {
        let mut cb = self.inner.on_session_terminated.lock().unwrap();
        *cb = Some(callback);
    }

    /// Current cycle state.
    pub fn state(&self) -> RefreshState {
        match *self.inner.state.lock().unwrap() {
            CycleState::Idle => RefreshState::Idle,
            CycleState::Refreshing { .. } => RefreshState::Refreshing,
        }
    }

    /// Obtain a fresh credential, suspending until the renewal cycle serving
    /// this call completes.
    ///
    /// The first caller in an idle window starts the cycle; every caller —
    /// the leader included — waits on its own queued slot and is released in
    /// arrival order. Dropping the returned future simply drops the slot; the
    /// cycle and the other waiters are unaffected.
    pub async fn fresh_credential(&self) -> AuthResult<Credential> {
        let receiver = {
            let mut state = self.inner.state.lock().unwrap();
            let (sender, receiver) = oneshot::channel();

            match &mut *state {
                CycleState::Refreshing { waiters } => {
                    debug!(queued = waiters.len() + 1, "Renewal in flight, queueing");
                    waiters.push(sender);
                }
                CycleState::Idle => {
                    debug!("Starting renewal cycle");
                    *state = CycleState::Refreshing {
                        waiters: vec![sender],
                    };
                    let inner = Arc::clone(&self.inner);
                    tokio::spawn(async move { inner.run_cycle().await });
                }
            }

            receiver
        };

        match receiver.await {
            Ok(Some(credential)) => Ok(credential),
            // Cycle failed, or its task ended without resolving us.
            Ok(None) | Err(_) => Err(AuthError::SessionExpired),
        }
    }
}

impl Inner {
    /// One complete renewal cycle: a single renewal attempt, then an atomic
    /// store-update-and-drain under the state lock.
    async fn run_cycle(&self) {
        match self.renew().await {
            Ok(credential) => {
                let (waiters, persisted) = {
                    let mut state = self.state.lock().unwrap();
                    let persisted = self.store.set(&credential);
                    if persisted.is_err() {
                        // A pair we could not persist ends the session like
                        // any other renewal failure; the stored tokens may
                        // already have been rotated away server-side.
                        if let Err(error) = self.store.clear() {
                            warn!(error = %error, "Failed to clear credential store");
                        }
                    }
                    (Self::finish_cycle(&mut state), persisted)
                };

                if let Err(error) = persisted {
                    warn!(error = %error, "Failed to persist renewed credential, ending session");
                    self.reject(waiters);
                    return;
                }

                info!(waiters = waiters.len(), "Credential renewed, releasing waiters");
                for waiter in waiters {
                    let _ = waiter.send(Some(credential.clone()));
                }
            }
            Err(error) => {
                warn!(error = %error, "Credential renewal failed, ending session");
                let waiters = {
                    let mut state = self.state.lock().unwrap();
                    if let Err(error) = self.store.clear() {
                        warn!(error = %error, "Failed to clear credential store");
                    }
                    Self::finish_cycle(&mut state)
                };
                self.reject(waiters);
            }
        }
    }

    /// Take the waiter queue and return to `Idle`. Must run under the lock.
    fn finish_cycle(state: &mut CycleState) -> Vec<oneshot::Sender<WaiterOutcome>> {
        match std::mem::replace(state, CycleState::Idle) {
            CycleState::Refreshing { waiters } => waiters,
            CycleState::Idle => Vec::new(),
        }
    }

    /// Reject every waiter and signal session termination, once.
    fn reject(&self, waiters: Vec<oneshot::Sender<WaiterOutcome>>) {
        for waiter in waiters {
            let _ = waiter.send(None);
        }

        let cb = self.on_session_terminated.lock().unwrap();
        if let Some(callback) = cb.as_ref() {
            callback();
        }
    }

    /// Exactly one renewal attempt, bounded by the configured deadline.
    async fn renew(&self) -> AuthResult<Credential> {
        let current = self.store.get()?.ok_or(AuthError::NotLoggedIn)?;

        let request = ApiRequest::post(
            "/auth/refresh-token",
            serde_json::json!({ "refreshToken": current.refresh_token }),
        );

        // The renewal call itself carries no bearer header: the access token
        // is the thing being replaced.
        let response =
            tokio::time::timeout(self.renewal_timeout, self.dispatcher.send(&request, None))
                .await
                .map_err(|_| AuthError::Timeout)??;

        let data: RenewalResponse = response.json().map_err(AuthError::Transport)?;

        Ok(Credential {
            access_token: data.token,
            refresh_token: data.refresh_token,
            role: current.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renewal_response_shape() {
        let data: RenewalResponse =
            serde_json::from_str(r#"{"token": "T2", "refreshToken": "R2"}"#).unwrap();
        assert_eq!(data.token, "T2");
        assert_eq!(data.refresh_token, "R2");
    }

    #[test]
    fn test_renewal_response_rejects_missing_fields() {
        let result: Result<RenewalResponse, _> = serde_json::from_str(r#"{"token": "T2"}"#);
        assert!(result.is_err());
    }
}
