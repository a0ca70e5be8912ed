use std::path::{Path, PathBuf};

use crate::io::config_io;
use crate::io::store::JsonFileStore;
use crate::model::config::BoardConfig;

/// Name of the directory that marks a board root
pub const BOARD_DIR: &str = "board";
/// Config file inside the board directory
pub const CONFIG_FILE: &str = "board.toml";

/// Error type for locating and loading a board workspace
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a task board: no board/board.toml found (try `tb init`)")]
    NotABoard,
    #[error("board already initialized at {0}")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A located board: its root, the `board/` directory and parsed config
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Parent of `board/`
    pub root: PathBuf,
    pub board_dir: PathBuf,
    pub config: BoardConfig,
}

impl Workspace {
    /// Path of the persisted board state
    pub fn state_path(&self) -> PathBuf {
        self.board_dir.join(&self.config.storage.state_file)
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(self.state_path())
    }
}

/// Discover the board by walking up from the given directory, looking for
/// a `board/board.toml`.
pub fn discover_board(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join(BOARD_DIR);
        if board_dir.is_dir() && board_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotABoard);
        }
    }
}

/// Load the workspace rooted at `root`
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(WorkspaceError::NotABoard);
    }
    let config = config_io::read_config(&board_dir)?;
    Ok(Workspace {
        root: root.to_path_buf(),
        board_dir,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_board(dir: &Path) {
        let board_dir = dir.join(BOARD_DIR);
        fs::create_dir_all(&board_dir).unwrap();
        fs::write(
            board_dir.join(CONFIG_FILE),
            "[board]\nname = \"test\"\n\n[storage]\nstate_file = \"data.json\"\n",
        )
        .unwrap();
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());
        let nested = tmp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let root = discover_board(&nested).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_discover_fails_without_board() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_board(tmp.path()),
            Err(WorkspaceError::NotABoard)
        ));
    }

    #[test]
    fn test_load_workspace() {
        let tmp = TempDir::new().unwrap();
        create_test_board(tmp.path());
        let ws = load_workspace(tmp.path()).unwrap();
        assert_eq!(ws.config.board.name, "test");
        assert_eq!(ws.state_path(), tmp.path().join("board/data.json"));
    }

    #[test]
    fn test_load_workspace_bad_config() {
        let tmp = TempDir::new().unwrap();
        let board_dir = tmp.path().join(BOARD_DIR);
        fs::create_dir_all(&board_dir).unwrap();
        fs::write(board_dir.join(CONFIG_FILE), "[board\nname = 1").unwrap();
        assert!(matches!(
            load_workspace(tmp.path()),
            Err(WorkspaceError::ConfigParseError(_))
        ));
    }
}
