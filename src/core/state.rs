//! Persisted UI state (consent choices, active tool) behind a storage port.
//!
//! `AppState` is loaded once at start-up and handed to the command that needs
//! it; nothing reads the state file behind the caller's back.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::paths;
use crate::core::tools::{ParseOptionError, ToolId};

/// Data-use consent. `essential` is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    pub essential: bool,
    pub analytics: bool,
    pub personalization: bool,
    pub training: bool,
}

impl Consent {
    pub fn accept_all() -> Self {
        Self {
            essential: true,
            analytics: true,
            personalization: true,
            training: true,
        }
    }

    pub fn reject_all() -> Self {
        Self {
            essential: true,
            analytics: false,
            personalization: false,
            training: false,
        }
    }
}

impl Default for Consent {
    fn default() -> Self {
        Self::reject_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// `None` until the user records a choice.
    #[serde(default)]
    pub consent: Option<Consent>,
    #[serde(default)]
    pub active_tool: ToolId,
}

impl AppState {
    pub fn consent_recorded(&self) -> bool {
        self.consent.is_some()
    }

    /// Effective consent: the recorded choice, or everything optional off.
    pub fn consent(&self) -> Consent {
        self.consent.unwrap_or_default()
    }

    pub fn set_consent(&mut self, consent: Consent) {
        self.consent = Some(Consent {
            essential: true,
            ..consent
        });
    }

    pub fn accept_all(&mut self) {
        self.set_consent(Consent::accept_all());
    }

    pub fn reject_all(&mut self) {
        self.set_consent(Consent::reject_all());
    }

    /// Switch the active tool. Invalid ids leave the state unchanged.
    pub fn set_active_tool(&mut self, id: &str) -> Result<ToolId, StateError> {
        let tool: ToolId = id.parse().map_err(|e| {
            log::warn!("Invalid tool ID: {}", id);
            StateError::InvalidTool(e)
        })?;
        self.active_tool = tool;
        if self.consent().analytics {
            log::info!("Tool navigation: {}", tool);
        }
        Ok(tool)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    InvalidTool(ParseOptionError),
    #[error("No config directory available")]
    NoConfigDir,
    #[error("Failed to access state file: {0}")]
    Io(#[from] io::Error),
    #[error("State file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage port for `AppState`.
pub trait StateStore {
    /// Load the saved state. `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<AppState>, StateError>;
    fn save(&self, state: &AppState) -> Result<(), StateError>;

    /// Load, falling back to defaults on a missing or unreadable file.
    fn load_or_default(&self) -> AppState {
        match self.load() {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                log::warn!("Ignoring saved state: {}", e);
                AppState::default()
            }
        }
    }
}

/// JSON file store (`state.json` in the config directory).
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location.
    pub fn open_default() -> Result<Self, StateError> {
        paths::state_path()
            .map(Self::new)
            .ok_or(StateError::NoConfigDir)
    }

    #[cfg(test)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<AppState>, StateError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, state: &AppState) -> Result<(), StateError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStateStore {
    state: std::cell::RefCell<Option<AppState>>,
}

#[cfg(test)]
impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<AppState>, StateError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &AppState) -> Result<(), StateError> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_chat_without_consent() {
        let state = AppState::default();
        assert_eq!(state.active_tool, ToolId::AiChat);
        assert!(!state.consent_recorded());
        assert_eq!(state.consent(), Consent::reject_all());
    }

    #[test]
    fn set_active_tool_validates() {
        let mut state = AppState::default();
        assert_eq!(state.set_active_tool("translate").unwrap(), ToolId::Translate);
        assert!(matches!(
            state.set_active_tool("plagiarism"),
            Err(StateError::InvalidTool(_))
        ));
        assert_eq!(state.active_tool, ToolId::Translate);
    }

    #[test]
    fn essential_consent_cannot_be_disabled() {
        let mut state = AppState::default();
        state.set_consent(Consent {
            essential: false,
            analytics: true,
            personalization: false,
            training: false,
        });
        let consent = state.consent();
        assert!(consent.essential);
        assert!(consent.analytics);
        assert!(state.consent_recorded());
    }

    #[test]
    fn accept_and_reject_all() {
        let mut state = AppState::default();
        state.accept_all();
        assert_eq!(state.consent(), Consent::accept_all());
        state.reject_all();
        assert_eq!(state.consent(), Consent::reject_all());
        assert!(state.consent_recorded());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested").join("state.json"));
        assert_eq!(store.load().unwrap(), None);

        let mut state = AppState::default();
        state.accept_all();
        state.set_active_tool("summarizer").unwrap();
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), Some(state));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn file_store_uses_kebab_case_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));
        let mut state = AppState::default();
        state.set_active_tool("ai-humanizer").unwrap();
        store.save(&state).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"ai-humanizer\""));
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileStateStore::new(&path);
        assert!(matches!(store.load(), Err(StateError::Json(_))));
        assert_eq!(store.load_or_default(), AppState::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"active_tool":"history"}"#).unwrap();
        let state = FileStateStore::new(&path).load().unwrap().unwrap();
        assert_eq!(state.active_tool, ToolId::History);
        assert_eq!(state.consent, None);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStateStore::default();
        assert_eq!(store.load_or_default(), AppState::default());
        let mut state = AppState::default();
        state.reject_all();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }
}
