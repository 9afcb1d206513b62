//! History index: listing, filtering, and index mutations.

use std::path::Path;

use super::storage;
use super::{HistoryError, HistoryMeta};
use crate::core::tools::ToolId;

/// Sort newest first. Entries from the same second keep reverse insertion order.
fn newest_first(entries: &mut Vec<HistoryMeta>) {
    entries.reverse();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Filter entries by tool and by a case-insensitive query on title or id.
pub fn filter_entries<'a>(
    entries: &'a [HistoryMeta],
    tool: Option<ToolId>,
    query: &str,
) -> Vec<&'a HistoryMeta> {
    let q = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|m| tool.is_none_or(|t| m.tool == t))
        .filter(|m| {
            q.is_empty() || m.title.to_lowercase().contains(&q) || m.id.to_lowercase().contains(&q)
        })
        .collect()
}

pub(super) fn list(dir: &Path) -> Result<Vec<HistoryMeta>, HistoryError> {
    let mut entries = storage::load_index(dir)?.entries;
    newest_first(&mut entries);
    Ok(entries)
}

/// Add an entry to the index, replacing any entry with the same id.
pub(super) fn add(dir: &Path, meta: HistoryMeta) -> Result<(), HistoryError> {
    let mut index = storage::load_index(dir)?;
    index.entries.retain(|m| m.id != meta.id);
    index.entries.push(meta);
    storage::save_index(dir, &index)
}

pub(super) fn remove(dir: &Path, id: &str) -> Result<(), HistoryError> {
    let mut index = storage::load_index(dir)?;
    index.entries.retain(|m| m.id != id);
    storage::save_index(dir, &index)
}

/// Remove the oldest entries beyond `max`. Deletes entry files and updates the index.
pub(super) fn prune(dir: &Path, max: u32) -> Result<(), HistoryError> {
    let max = max as usize;
    if max == 0 {
        return Ok(());
    }

    let mut index = storage::load_index(dir)?;
    if index.entries.len() <= max {
        return Ok(());
    }
    newest_first(&mut index.entries);

    let to_remove: Vec<_> = index.entries.drain(max..).collect();
    for meta in &to_remove {
        if let Err(e) = storage::remove_entry_file(dir, &meta.id) {
            log::warn!("Failed to remove history file {}: {}", meta.id, e);
        }
    }
    // Keep the on-disk order oldest first so appends stay chronological.
    index.entries.reverse();
    storage::save_index(dir, &index)
}
