//! Bearer token access backed by persisted key-value storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{AppError, Result};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Source of the bearer token attached to API requests.
///
/// Implementations must return the current value on every call; callers
/// never cache the result.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Fixed token, mainly for tests and one-off CLI use.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// `Authorization` header value. A missing token is rendered as `null`.
pub fn bearer_value(token: Option<&str>) -> String {
    format!("Bearer {}", token.unwrap_or("null"))
}

/// Process-wide key-value storage persisted as a flat JSON object.
///
/// Every read goes to disk so values written by another process (or a
/// later login) are picked up immediately.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    path: PathBuf,
}

impl KeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `storage.json` in the platform data directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("id", "gianged", "absensi-editor")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| AppError::storage(format!("{}: {e}", self.path.display())))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }
}

impl TokenProvider for KeyValueStore {
    fn token(&self) -> Option<String> {
        match self.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read token from {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
