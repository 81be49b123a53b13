//! High-level API for the stored credential.

use crate::{StorageBackend, StorageKeys, StorageResult};
use serde::{Deserialize, Serialize};

/// The credential pair authorizing API calls.
///
/// The access token and refresh token are only ever written together: the
/// whole struct is serialized as one document under one storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Short-lived token attached to outbound API calls
    pub access_token: String,
    /// Longer-lived token used solely to mint a new access token
    pub refresh_token: String,
    /// Role claim from the login response, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// High-level store for the credential document
pub struct CredentialStore {
    backend: Box<dyn StorageBackend>,
}

impl CredentialStore {
    /// Create a new store with the given backend
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Retrieve the stored credential, if any
    pub fn get(&self) -> StorageResult<Option<Credential>> {
        match self.backend.get(StorageKeys::CREDENTIAL)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Store a credential, replacing any previous one
    pub fn set(&self, credential: &Credential) -> StorageResult<()> {
        let raw = serde_json::to_string(credential)?;
        self.backend.set(StorageKeys::CREDENTIAL, &raw)
    }

    /// Remove the stored credential
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.delete(StorageKeys::CREDENTIAL)?;
        tracing::debug!("Credential cleared");
        Ok(())
    }

    /// Check whether a credential is stored
    pub fn has_credential(&self) -> StorageResult<bool> {
        self.backend.has(StorageKeys::CREDENTIAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory backend for testing
    struct MemoryBackend {
        data: Mutex<HashMap<String, String>>,
    }

    impl MemoryBackend {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    impl StorageBackend for MemoryBackend {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn delete(&self, key: &str) -> StorageResult<bool> {
            Ok(self.data.lock().unwrap().remove(key).is_some())
        }
    }

    fn sample_credential() -> Credential {
        Credential {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            role: Some("admin".to_string()),
        }
    }

    #[test]
    fn test_empty_store() {
        let store = CredentialStore::new(Box::new(MemoryBackend::new()));
        assert!(store.get().unwrap().is_none());
        assert!(!store.has_credential().unwrap());
    }

    #[test]
    fn test_set_returns_both_tokens() {
        let store = CredentialStore::new(Box::new(MemoryBackend::new()));
        store.set(&sample_credential()).unwrap();

        let loaded = store.get().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access-1");
        assert_eq!(loaded.refresh_token, "refresh-1");
        assert_eq!(loaded.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_replace_updates_pair_together() {
        let store = CredentialStore::new(Box::new(MemoryBackend::new()));
        store.set(&sample_credential()).unwrap();

        store
            .set(&Credential {
                access_token: "access-2".to_string(),
                refresh_token: "refresh-2".to_string(),
                role: None,
            })
            .unwrap();

        let loaded = store.get().unwrap().unwrap();
        assert_eq!(loaded.access_token, "access-2");
        assert_eq!(loaded.refresh_token, "refresh-2");
        assert!(loaded.role.is_none());
    }

    #[test]
    fn test_clear() {
        let store = CredentialStore::new(Box::new(MemoryBackend::new()));
        store.set(&sample_credential()).unwrap();
        assert!(store.has_credential().unwrap());

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());

        // Clearing an empty store is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_camel_case_document() {
        let raw = serde_json::to_string(&sample_credential()).unwrap();
        assert!(raw.contains("accessToken"));
        assert!(raw.contains("refreshToken"));
    }

    #[test]
    fn test_file_backed_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = crate::create_credential_store(dir.path()).unwrap();
            store.set(&sample_credential()).unwrap();
        }

        let store = crate::create_credential_store(dir.path()).unwrap();
        assert_eq!(store.get().unwrap(), Some(sample_credential()));
    }
}
