// src/infrastructure/reference_store.rs
use crate::domain::ReferenceLibrary;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Reference library persisted as `[[reference]]` tables in a TOML file
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    path: PathBuf,
}

impl ReferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing file loads as an empty library
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<ReferenceLibrary> {
        if !self.path.exists() {
            debug!("Reference file does not exist yet");
            return Ok(ReferenceLibrary::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let library: ReferenceLibrary =
            toml::from_str(&content).context("Failed to parse reference library")?;
        debug!(count = library.len(), "Loaded references");
        Ok(library)
    }

    pub fn save(&self, library: &ReferenceLibrary) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            toml::to_string_pretty(library).context("Failed to serialize reference library")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReferenceDraft, ReferenceType};
    use tempfile::TempDir;

    #[test]
    fn given_missing_file_when_loading_then_returns_empty_library() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReferenceStore::new(temp_dir.path().join("references.toml"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn given_saved_library_when_loading_then_references_survive() {
        let temp_dir = TempDir::new().unwrap();
        let store = ReferenceStore::new(temp_dir.path().join("data/references.toml"));
        let mut library = ReferenceLibrary::new();
        library
            .add(ReferenceDraft {
                kind: ReferenceType::Link,
                name: "Rust Book".to_string(),
                url: Some("https://doc.rust-lang.org/book/".to_string()),
                priority: 4,
                ..Default::default()
            })
            .unwrap();
        library
            .add(ReferenceDraft {
                kind: ReferenceType::Pdf,
                name: "lecture.pdf".to_string(),
                file: Some(PathBuf::from("/tmp/lecture.pdf")),
                file_size: Some(2048),
                priority: 2,
                ..Default::default()
            })
            .unwrap();

        store.save(&library).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, library);
    }
}
