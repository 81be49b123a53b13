//! Durable credential storage for the BFarm client.
//!
//! This crate provides:
//! - A `StorageBackend` trait for simple key/value persistence
//! - A file-based backend with atomic writes
//! - A high-level `CredentialStore` that keeps the access/refresh token pair
//!   in a single document so no reader ever observes a half-updated pair

mod credential;
mod file;
mod keys;
mod traits;

pub use credential::{Credential, CredentialStore};
pub use file::FileBackend;
pub use keys::StorageKeys;
pub use traits::StorageBackend;

use std::path::Path;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Serde(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create a credential store backed by JSON files in the given directory.
pub fn create_credential_store(dir: &Path) -> StorageResult<CredentialStore> {
    let backend = FileBackend::new(dir)?;
    Ok(CredentialStore::new(Box::new(backend)))
}
