// src/infrastructure/config.rs
use crate::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML configuration for studyaid
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub flashcards: FlashcardDefaults,
    #[serde(default)]
    pub questions: QuestionDefaults,
    #[serde(default)]
    pub notes: NoteDefaults,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

/// Empty paths resolve to the platform data directory
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub references: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FlashcardDefaults {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuestionDefaults {
    #[serde(default = "default_question_type")]
    pub question_type: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_question_count")]
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NoteDefaults {
    #[serde(default = "default_note_format")]
    pub format: String,
    #[serde(default = "default_focus_level")]
    pub focus_level: u8,
    #[serde(default = "default_true")]
    pub include_summary: bool,
    #[serde(default = "default_true")]
    pub include_main_points: bool,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_style() -> String { "basic".to_string() }
fn default_difficulty() -> String { "medium".to_string() }
fn default_count() -> usize { 10 }
fn default_question_type() -> String { "multiplechoice".to_string() }
fn default_question_count() -> usize { 5 }
fn default_note_format() -> String { "summary".to_string() }
fn default_focus_level() -> u8 { 2 }
fn default_true() -> bool { true }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

impl Default for FlashcardDefaults {
    fn default() -> Self {
        Self {
            style: default_style(),
            difficulty: default_difficulty(),
            count: default_count(),
        }
    }
}

impl Default for QuestionDefaults {
    fn default() -> Self {
        Self {
            question_type: default_question_type(),
            difficulty: default_difficulty(),
            count: default_question_count(),
        }
    }
}

impl Default for NoteDefaults {
    fn default() -> Self {
        Self {
            format: default_note_format(),
            focus_level: default_focus_level(),
            include_summary: default_true(),
            include_main_points: default_true(),
        }
    }
}

impl Config {
    /// `<config_dir>/studyaid/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("studyaid").join("config.toml"))
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load from `path` when it exists, otherwise defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(?path, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Key-value store location: configured path or `<data_dir>/studyaid/storage.json`
    pub fn storage_path(&self) -> Result<PathBuf> {
        resolve(&self.storage.path, "storage.json")
    }

    /// Reference library location: configured path or `<data_dir>/studyaid/references.toml`
    pub fn references_path(&self) -> Result<PathBuf> {
        resolve(&self.storage.references, "references.toml")
    }
}

fn resolve(configured: &str, file_name: &str) -> Result<PathBuf> {
    if !configured.trim().is_empty() {
        return Ok(PathBuf::from(configured));
    }
    dirs::data_dir()
        .map(|dir| dir.join("studyaid").join(file_name))
        .context("Could not determine the platform data directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_no_file_when_creating_default_then_creates_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("studyaid/config.toml");

        let config = Config::create_default(&config_path).unwrap();

        assert_eq!(config.generation.model, "gemini-2.0-flash");
        assert_eq!(config.flashcards.style, "basic");
        assert_eq!(config.questions.question_type, "multiplechoice");
        assert!(config_path.exists());
    }

    #[test]
    fn given_config_when_saving_then_writes_all_sections() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        Config::default().save(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        for section in ["[generation]", "[storage]", "[flashcards]", "[questions]", "[notes]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn given_toml_file_when_loading_then_reads_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("load_test.toml");

        let toml_content = r#"
[generation]
base_url = "http://localhost:8080"
model = "gemini-1.5-pro"

[storage]
path = "/tmp/kv.json"

[flashcards]
style = "concept"
difficulty = "hard"
count = 3

[notes]
format = "studyguide"
focus_level = 3
include_summary = false
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.generation.base_url, "http://localhost:8080");
        assert_eq!(config.generation.model, "gemini-1.5-pro");
        assert_eq!(config.storage_path().unwrap(), PathBuf::from("/tmp/kv.json"));
        assert_eq!(config.flashcards.count, 3);
        assert_eq!(config.notes.focus_level, 3);
        assert!(!config.notes.include_summary);
        assert!(config.notes.include_main_points);
    }

    #[test]
    fn given_partial_toml_when_loading_then_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[questions]\ncount = 8\n").unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.questions.count, 8);
        assert_eq!(config.questions.difficulty, "medium");
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.notes, NoteDefaults::default());
    }

    #[test]
    fn given_missing_file_when_loading_or_default_then_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = Config::load_or_default(temp_dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn given_invalid_toml_when_loading_then_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[generation\nmodel = ").unwrap();

        assert!(Config::load(&config_path).is_err());
    }
}
