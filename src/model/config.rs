use serde::{Deserialize, Serialize};

use super::state::LayoutMode;

/// Configuration from board.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub board: BoardInfo,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    #[serde(default = "default_board_name")]
    pub name: String,
}

impl Default for BoardInfo {
    fn default() -> Self {
        BoardInfo {
            name: default_board_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file, relative to the board/ directory
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            state_file: default_state_file(),
        }
    }
}

/// Which identifier generator new entities get their IDs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdGeneratorKind {
    /// Random UUID v4
    #[default]
    Uuid,
    /// Timestamp plus pseudo-random suffix
    Clock,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default)]
    pub generator: IdGeneratorKind,
}

/// Whole-state import strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Union the snapshot into the live board
    #[default]
    Merge,
    /// Discard the live board and adopt the snapshot
    Replace,
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportMode::Merge => write!(f, "merge"),
            ImportMode::Replace => write!(f, "replace"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub default_mode: ImportMode,
    /// Reject snapshots whose schemaVersion is newer than this build understands
    #[serde(default)]
    pub strict_schema: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Layout used when no state has been saved yet
    #[serde(default)]
    pub default_layout: LayoutMode,
}

fn default_board_name() -> String {
    "board".to_string()
}

fn default_state_file() -> String {
    "state.json".to_string()
}
