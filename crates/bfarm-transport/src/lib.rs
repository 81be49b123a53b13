//! HTTP transport for the BFarm API.
//!
//! The `Dispatcher` is a pure transport primitive: it attaches the bearer
//! token when a credential is present, performs one network call, and maps the
//! outcome to a typed result. It never retries and never touches credential
//! state; expiry handling lives in `bfarm-auth`.

mod dispatcher;
mod error;
mod request;

pub use dispatcher::Dispatcher;
pub use error::{TransportError, TransportResult};
pub use request::{ApiRequest, ApiResponse};
