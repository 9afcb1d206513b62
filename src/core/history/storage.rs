//! Index and entry file persistence (index.json, entry_*.json).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{HistoryEntry, HistoryError, HistoryMeta};

fn index_path(dir: &Path) -> PathBuf {
    dir.join("index.json")
}

fn entry_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("entry_{}.json", id))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct IndexFile {
    pub(super) entries: Vec<HistoryMeta>,
}

/// Write `contents` to `path` through a temp file and rename.
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(tmp, path)
}

/// Load the index. Returns an empty index when the file does not exist yet (first run).
/// Propagates IO errors (permission, disk) and JSON parse errors.
pub(super) fn load_index(dir: &Path) -> Result<IndexFile, HistoryError> {
    let data = match fs::read_to_string(index_path(dir)) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexFile::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&data)?)
}

pub(super) fn save_index(dir: &Path, index: &IndexFile) -> Result<(), HistoryError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(index)?;
    write_atomic(&index_path(dir), &json)?;
    Ok(())
}

/// Read an entry file. `Ok(None)` when the file is missing.
pub(super) fn read_entry(dir: &Path, id: &str) -> Result<Option<HistoryEntry>, HistoryError> {
    let data = match fs::read_to_string(entry_path(dir, id)) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&data)?))
}

pub(super) fn write_entry(dir: &Path, entry: &HistoryEntry) -> Result<(), HistoryError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(entry)?;
    write_atomic(&entry_path(dir, &entry.id), &json)?;
    Ok(())
}

/// Remove an entry file. A missing file is not an error.
pub(super) fn remove_entry_file(dir: &Path, id: &str) -> io::Result<()> {
    match fs::remove_file(entry_path(dir, id)) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
