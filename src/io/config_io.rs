use std::fs;
use std::path::Path;

use crate::io::board_io::{WorkspaceError, CONFIG_FILE};
use crate::model::config::BoardConfig;

const BOARD_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"

[storage]
# Board state, relative to this directory
state_file = "state.json"

[ids]
# "uuid" (random) or "clock" (timestamp + pseudo-random suffix)
generator = "uuid"

[import]
# "merge" unions a snapshot into the board, "replace" discards the board first
default_mode = "merge"
# Refuse snapshots whose schemaVersion is newer than this build understands
strict_schema = false

[ui]
# "list" or "grid"; used until a layout has been saved
default_layout = "list"
"##;

/// Read and parse board.toml from the board directory
pub fn read_config(board_dir: &Path) -> Result<BoardConfig, WorkspaceError> {
    let config_path = board_dir.join(CONFIG_FILE);
    let config_text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&config_text)?)
}

/// The commented config a new board starts with
pub fn config_template(name: &str) -> String {
    BOARD_TOML_TEMPLATE.replace("{name}", &name.replace('"', "\\\""))
}

/// Write a fresh board.toml
pub fn write_config_template(board_dir: &Path, name: &str) -> Result<(), WorkspaceError> {
    fs::create_dir_all(board_dir)?;
    fs::write(board_dir.join(CONFIG_FILE), config_template(name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{IdGeneratorKind, ImportMode};
    use crate::model::state::LayoutMode;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let config: BoardConfig = toml::from_str(&config_template("home")).unwrap();
        assert_eq!(config.board.name, "home");
        assert_eq!(config.storage.state_file, "state.json");
        assert_eq!(config.ids.generator, IdGeneratorKind::Uuid);
        assert_eq!(config.import.default_mode, ImportMode::Merge);
        assert!(!config.import.strict_schema);
        assert_eq!(config.ui.default_layout, LayoutMode::List);
    }

    #[test]
    fn template_escapes_quotes_in_name() {
        let config: BoardConfig = toml::from_str(&config_template("my \"big\" board")).unwrap();
        assert_eq!(config.board.name, "my \"big\" board");
    }

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let board_dir = tmp.path().join("board");
        write_config_template(&board_dir, "test").unwrap();
        let config = read_config(&board_dir).unwrap();
        assert_eq!(config.board.name, "test");
    }

    #[test]
    fn read_missing_config_is_read_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_config(tmp.path()),
            Err(WorkspaceError::ReadError { .. })
        ));
    }
}
