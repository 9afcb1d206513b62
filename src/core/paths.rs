//! Centralized path helpers for config and data directories.

use std::path::PathBuf;

use crate::core::app;

/// Project directories (config, data) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/avidia/): state.json, templates.json.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Data directory (~/.local/share/avidia/).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

/// History directory (~/.local/share/avidia/history/).
pub fn history_dir() -> Option<PathBuf> {
    data_dir().map(|d| d.join("history"))
}

/// Persisted UI state file.
pub fn state_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("state.json"))
}

/// Custom templates file.
pub fn templates_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("templates.json"))
}

/// Display helper for optional paths ("—" when the platform has no such directory).
pub fn display(path: Option<PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string())
}
