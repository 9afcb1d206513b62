//! History of tool runs in ~/.local/share/avidia/history/.
//!
//! `index.json` holds metadata for every entry; each entry's full input and
//! output live in `entry_<id>.json`.

mod index;
mod storage;

pub use index::filter_entries;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::paths;
use crate::core::tools::ToolId;
use crate::core::util::preview;

/// Max characters of the input shown as an entry title.
const TITLE_LEN: usize = 60;

/// Index metadata for a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMeta {
    pub id: String,
    pub tool: ToolId,
    pub title: String,
    pub created_at: u64,
}

/// A full history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub tool: ToolId,
    pub title: String,
    /// Tool options in effect (e.g. target language, template name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input: String,
    pub output: String,
    pub created_at: u64,
}

impl HistoryEntry {
    pub fn meta(&self) -> HistoryMeta {
        HistoryMeta {
            id: self.id.clone(),
            tool: self.tool,
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("No data directory available")]
    NoDataDir,
    #[error("History storage error: {0}")]
    Io(#[from] io::Error),
    #[error("History file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No history entry matching '{0}'")]
    NotFound(String),
    #[error("'{0}' matches more than one history entry; use a longer id")]
    Ambiguous(String),
}

/// Entry to record.
pub struct NewEntry<'a> {
    pub tool: ToolId,
    pub label: Option<String>,
    pub input: &'a str,
    pub output: &'a str,
}

/// History rooted at a directory.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at the platform default location.
    pub fn open_default() -> Result<Self, HistoryError> {
        paths::history_dir()
            .map(Self::new)
            .ok_or(HistoryError::NoDataDir)
    }

    #[cfg(test)]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Record a run and prune to `max_entries` (0 = unlimited).
    pub fn record(&self, new: NewEntry<'_>, max_entries: u32) -> Result<HistoryEntry, HistoryError> {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_else(|e| {
                log::warn!("System time before UNIX epoch: {}", e);
                0
            });
        let title = match preview(new.input, TITLE_LEN) {
            t if t.is_empty() => "(No title)".to_string(),
            t => t,
        };
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            tool: new.tool,
            title,
            label: new.label,
            input: new.input.to_string(),
            output: new.output.to_string(),
            created_at,
        };

        storage::write_entry(&self.dir, &entry)?;
        index::add(&self.dir, entry.meta())?;
        index::prune(&self.dir, max_entries)?;
        log::debug!("Recorded history entry {} ({})", entry.id, entry.tool);
        Ok(entry)
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<HistoryMeta>, HistoryError> {
        index::list(&self.dir)
    }

    /// Load an entry by full id or unique id prefix.
    pub fn get(&self, id: &str) -> Result<HistoryEntry, HistoryError> {
        let id = self.resolve_id(id)?;
        storage::read_entry(&self.dir, &id)?.ok_or(HistoryError::NotFound(id))
    }

    /// Delete an entry by full id or unique id prefix. Returns the deleted id.
    pub fn delete(&self, id: &str) -> Result<String, HistoryError> {
        let id = self.resolve_id(id)?;
        storage::remove_entry_file(&self.dir, &id)?;
        index::remove(&self.dir, &id)?;
        Ok(id)
    }

    /// Delete every entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, HistoryError> {
        let entries = self.list()?;
        for meta in &entries {
            if let Err(e) = storage::remove_entry_file(&self.dir, &meta.id) {
                log::warn!("Failed to remove history file {}: {}", meta.id, e);
            }
        }
        storage::save_index(&self.dir, &storage::IndexFile::default())?;
        Ok(entries.len())
    }

    fn resolve_id(&self, id: &str) -> Result<String, HistoryError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        let entries = self.list()?;
        if entries.iter().any(|m| m.id == id) {
            return Ok(id.to_string());
        }
        let mut matches = entries.iter().filter(|m| m.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(m), None) => Ok(m.id.clone()),
            (Some(_), Some(_)) => Err(HistoryError::Ambiguous(id.to_string())),
            (None, _) => Err(HistoryError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
