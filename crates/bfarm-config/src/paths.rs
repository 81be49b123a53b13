//! Filesystem locations used by the client.

use std::path::PathBuf;

/// Well-known paths under the data directory (`~/.bfarm` by default,
/// overridable via `BFARM_DATA_DIR`).
#[derive(Debug, Clone)]
pub struct Paths {
    data_dir: PathBuf,
}

impl Paths {
    /// Resolve paths from the environment.
    pub fn new() -> Self {
        let data_dir = std::env::var("BFARM_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".bfarm")
            });
        Self { data_dir }
    }

    /// Paths rooted at an explicit directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// The data directory itself.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Config file location.
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// Directory holding the credential document.
    pub fn credentials_dir(&self) -> PathBuf {
        self.data_dir.join("credentials")
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
