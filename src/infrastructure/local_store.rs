// src/infrastructure/local_store.rs
use crate::application::CredentialStore;
use crate::constants::{API_KEY_STORAGE_KEY, THEME_STORAGE_KEY};
use crate::domain::{DomainError, Theme};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persistent string key-value store backed by a JSON file.
///
/// Every write is flushed to disk immediately.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                DomainError::StorageError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                DomainError::StorageError(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            debug!(?path, "Storage file does not exist yet");
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<(), DomainError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::StorageError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DomainError::StorageError(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| {
            DomainError::StorageError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    /// Stored theme preference; unknown values read as the default
    pub fn theme(&self) -> Theme {
        match self.get(THEME_STORAGE_KEY).map(str::parse::<Theme>) {
            Some(Ok(theme)) => theme,
            Some(Err(e)) => {
                warn!(error = %e, "Ignoring invalid stored theme");
                Theme::default()
            }
            None => Theme::default(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), DomainError> {
        self.set(THEME_STORAGE_KEY, theme.as_str())
    }
}

impl CredentialStore for LocalStore {
    fn api_key(&self) -> Result<Option<String>, DomainError> {
        Ok(self
            .get(API_KEY_STORAGE_KEY)
            .filter(|key| !key.trim().is_empty())
            .map(str::to_string))
    }

    fn save_api_key(&mut self, key: &str) -> Result<(), DomainError> {
        self.set(API_KEY_STORAGE_KEY, key.trim())?;
        info!("API key saved");
        Ok(())
    }

    fn remove_api_key(&mut self) -> Result<(), DomainError> {
        self.remove(API_KEY_STORAGE_KEY)?;
        info!("API key removed");
        Ok(())
    }
}
