//! File-based storage backend.

use crate::{StorageBackend, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage backend that keeps each key as a JSON string file in a directory.
///
/// Writes go to a temporary file in the same directory followed by a rename,
/// so a concurrent reader sees either the old or the new value, never a
/// partial one.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`, creating the directory if needed.
    pub fn new(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StorageError::Backend(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StorageBackend for FileBackend {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key = %key, "Stored value");
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        backend.set("some-key", "some-value").unwrap();
        assert_eq!(
            backend.get("some-key").unwrap(),
            Some("some-value".to_string())
        );
        assert!(backend.has("some-key").unwrap());

        assert!(backend.delete("some-key").unwrap());
        assert!(!backend.delete("some-key").unwrap());
        assert_eq!(backend.get("some-key").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        backend.set("key", "v1").unwrap();
        backend.set("key", "v2").unwrap();
        assert_eq!(backend.get("key").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_invalid_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        assert!(backend.set("../escape", "value").is_err());
        assert!(backend.set("", "value").is_err());
    }

    #[test]
    fn test_values_survive_backend_recreation() {
        let dir = tempfile::tempdir().unwrap();

        {
            let backend = FileBackend::new(dir.path()).unwrap();
            backend.set("persisted", "value").unwrap();
        }

        let backend = FileBackend::new(dir.path()).unwrap();
        assert_eq!(
            backend.get("persisted").unwrap(),
            Some("value".to_string())
        );
    }
}
