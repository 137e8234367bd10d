//! Configuration structures for the ingestion pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::QuizloadError;
use crate::store::DuplicatePolicy;

/// Main configuration for quizload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizloadConfig {
    /// Persistence configuration.
    pub store: StoreConfig,

    /// Grammar extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Persistence configuration, handed to the loader at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file. `:memory:` opens a private in-memory database.
    pub path: PathBuf,

    /// What to do when a `(code, category)` pair is already stored.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("quizload.db"),
            duplicate_policy: DuplicatePolicy::Upsert,
        }
    }
}

/// Grammar extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Only bundle members ending with this suffix are read.
    pub member_suffix: String,

    /// Upper-case variable-choice labels and answers.
    pub normalize_label_case: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            member_suffix: ".txt".to_string(),
            normalize_label_case: false,
        }
    }
}

impl QuizloadConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, QuizloadError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| QuizloadError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), QuizloadError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| QuizloadError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: QuizloadConfig =
            serde_json::from_str(r#"{"store": {"duplicate_policy": "append"}}"#).unwrap();

        assert_eq!(config.store.duplicate_policy, DuplicatePolicy::Append);
        assert_eq!(config.store.path, PathBuf::from("quizload.db"));
        assert_eq!(config.extraction.member_suffix, ".txt");
        assert!(!config.extraction.normalize_label_case);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = QuizloadConfig::default();
        config.extraction.normalize_label_case = true;
        config.save(&path).unwrap();

        let loaded = QuizloadConfig::from_file(&path).unwrap();
        assert!(loaded.extraction.normalize_label_case);
        assert_eq!(loaded.store.duplicate_policy, DuplicatePolicy::Upsert);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            QuizloadConfig::from_file(&path),
            Err(QuizloadError::Config(_))
        ));
    }
}
