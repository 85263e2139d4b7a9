use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_KEY;

/// Runtime options. Every field has a default, so a settings file may name
/// only the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between two moves of the snake.
    pub tick_ms: u64,
    /// Where the best score is kept. `None` keeps it in memory only.
    pub high_score_file: Option<PathBuf>,
    pub high_score_key: String,
    /// Fixed seed for food placement.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 150,
            high_score_file: Some(PathBuf::from("snake-high-score.json")),
            high_score_key: DEFAULT_KEY.to_string(),
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            bail!("tick_ms must be > 0");
        }
        if self.high_score_key.trim().is_empty() {
            bail!("high_score_key must not be empty");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval(), Duration::from_millis(150));
        assert_eq!(settings.high_score_key, "snake-high-score");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tick_ms": 90, "seed": 4}}"#).unwrap();

        let settings = Settings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.tick_ms, 90);
        assert_eq!(settings.seed, Some(4));
        assert_eq!(settings.high_score_file, Settings::default().high_score_file);
    }

    #[test]
    fn null_file_disables_persistence() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"high_score_file": null}}"#).unwrap();

        let settings = Settings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.high_score_file, None);
    }

    #[test]
    fn rejects_zero_tick() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tick_ms": 0}}"#).unwrap();

        assert!(Settings::from_json_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Settings::from_json_file(Path::new("/nonexistent/snake.json")).is_err());
    }
}
