//! Sent-story persistence using a flat JSON file
//!
//! The whole store is a JSON array of story id strings. It is read once at
//! startup and overwritten on every flush.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::story::StoryItem;
use crate::{Error, Result};

/// File-backed record of story ids that were already relayed
#[derive(Debug, Clone)]
pub struct SentStoryStore {
    path: PathBuf,
    ids: Vec<String>,
}

impl SentStoryStore {
    /// Load the store from `path`.
    ///
    /// A missing or unparseable file yields an empty store and a warning,
    /// never an error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match read_ids(&path) {
            Ok(ids) => {
                info!(path = %path.display(), "Loaded {} sent story ids", ids.len());
                ids
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to load sent stories: {}", e);
                Vec::new()
            }
        };

        Self { path, ids }
    }

    /// Create an empty store bound to `path` without touching the disk
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ids: Vec::new(),
        }
    }

    /// Whether `id` has not been relayed yet
    pub fn is_new(&self, id: &str) -> bool {
        !self.ids.iter().any(|sent| sent == id)
    }

    /// Stories from `items` that have not been relayed yet, in input order
    pub fn filter_new(&self, items: Vec<StoryItem>) -> Vec<StoryItem> {
        items.into_iter().filter(|item| self.is_new(&item.id)).collect()
    }

    /// Mark `id` as relayed
    pub fn record(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.is_new(&id) {
            self.ids.push(id);
        }
    }

    /// Overwrite the backing file with the current ids
    pub fn flush(&self) -> Result<()> {
        let json = serde_json::to_string(&self.ids)?;
        std::fs::write(&self.path, json).map_err(|e| {
            Error::Persistence(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), "Flushed {} sent story ids", self.ids.len());
        Ok(())
    }

    /// Forget every id and remove the backing file
    pub fn reset(&mut self) -> Result<()> {
        self.ids.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Sent stories reset and file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Persistence(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_ids(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let ids: Vec<String> = serde_json::from_str(&content)?;
    Ok(ids)
}
