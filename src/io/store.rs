use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::model::state::State;
use crate::ops::ids::UuidGenerator;
use crate::ops::normalize::normalize_snapshot;

/// Error type for persisting the board
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("board state in {path} is unreadable ({reason}); fix or remove the file")]
    Malformed { path: PathBuf, reason: String },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize board state: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Key-value slot holding the whole board.
///
/// An empty slot loads as `Ok(None)`, which callers treat as "no prior
/// state". Content that cannot be recovered is an error, never `None`.
pub trait Store {
    fn load(&self) -> Result<Option<State>, StoreError>;
    fn save(&self, state: &State) -> Result<(), StoreError>;
}

/// Board state kept as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Option<State>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        let malformed = |reason: String| StoreError::Malformed {
            path: self.path.clone(),
            reason,
        };
        let doc: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;
        match serde_json::from_value::<State>(doc.clone()) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                // Same repair rules as an import; the file is left untouched
                // until the next save.
                warn!(path = %self.path.display(), error = %e, "repairing board state");
                let snap = normalize_snapshot(&doc, &mut UuidGenerator)
                    .map_err(|e| malformed(e.to_string()))?;
                Ok(Some(State {
                    projects: snap.projects,
                    layout_mode: snap.layout_mode,
                }))
            }
        }
    }

    fn save(&self, state: &State) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(state)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), projects = state.projects.len(), "board saved");
        Ok(())
    }
}

/// In-memory slot, used by tests and embedders without a disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<State>>,
}

impl MemoryStore {
    pub fn saved(&self) -> Option<State> {
        self.slot.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<State>, StoreError> {
        Ok(self.saved())
    }

    fn save(&self, state: &State) -> Result<(), StoreError> {
        self.slot.replace(Some(state.clone()));
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
