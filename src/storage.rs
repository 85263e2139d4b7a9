//! Persistence for the best score.
//!
//! The score lives under a single named key in a JSON object, stored as a
//! string. Other keys in the same file are left alone, whatever their type.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use tracing::debug;

pub const DEFAULT_KEY: &str = "snake-high-score";

pub trait HighScoreStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<u32>>;

    fn save(&mut self, score: u32) -> Result<()>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<Option<u32>> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<()> {
        (**self).save(score)
    }
}

/// Keeps the score for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_value(value: u32) -> Self {
        MemoryStore { value: Some(value) }
    }

    #[cfg(test)]
    pub fn value(&self) -> Option<u32> {
        self.value
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.value = Some(score);
        Ok(())
    }
}

pub struct FileStore {
    path: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        FileStore { path: path.into(), key: key.into() }
    }

    fn read_entries(&self) -> Result<Option<Map<String, Value>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        };

        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Malformed score file {}", self.path.display()))?;
        Ok(Some(entries))
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<Option<u32>> {
        let entries = match self.read_entries()? {
            Some(entries) => entries,
            None => return Ok(None),
        };

        match entries.get(&self.key) {
            Some(Value::String(raw)) => raw
                .trim()
                .parse::<u32>()
                .map(Some)
                .with_context(|| format!("Stored value {:?} under {:?} is not a score", raw, self.key)),
            Some(other) => bail!("Stored value {} under {:?} is not a score", other, self.key),
            None => Ok(None),
        }
    }

    fn save(&mut self, score: u32) -> Result<()> {
        // Only a file that isn't a JSON object at all is replaced; any other key survives.
        let mut entries = self.read_entries().ok().flatten().unwrap_or_default();
        entries.insert(self.key.clone(), Value::String(score.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), score, "high score written");
        Ok(())
    }
}
