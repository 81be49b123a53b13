//! Authenticated request layer for the BFarm client.
//!
//! This crate provides:
//! - `RefreshCoordinator`: a single-flight state machine that performs at most
//!   one credential renewal call per expiry window and queues concurrent
//!   callers until it completes
//! - `AuthedClient`: the fault detector wrapping the transport; recognizes
//!   HTTP 401, obtains a fresh credential from the coordinator and retries a
//!   request exactly once
//! - `SessionManager`: login/logout/status/identity flows

mod claims;
mod client;
mod coordinator;
mod error;
mod session;

pub use claims::{decode_claims, UserClaims};
pub use client::AuthedClient;
pub use coordinator::{RefreshCoordinator, RefreshState, SessionCallback};
pub use error::{AuthError, AuthResult};
pub use session::{AuthStatus, SessionManager};
