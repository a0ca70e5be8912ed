use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

const SESSION_FILE: &str = ".session.json";

/// Per-checkout CLI state (written to .session.json, never exported)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Session {
    /// Project shown by `tb show` and targeted by `tb task add`
    #[serde(default)]
    pub current_project: Option<String>,
}

/// Read .session.json from the board directory
pub fn read_session(board_dir: &Path) -> Option<Session> {
    let content = fs::read_to_string(board_dir.join(SESSION_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .session.json to the board directory
pub fn write_session(board_dir: &Path, session: &Session) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(session)?;
    fs::write(board_dir.join(SESSION_FILE), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let session = Session {
            current_project: Some("p2".into()),
        };
        write_session(dir.path(), &session).unwrap();
        assert_eq!(read_session(dir.path()), Some(session));
    }

    #[test]
    fn missing_or_garbage_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_session(dir.path()), None);
        fs::write(dir.path().join(SESSION_FILE), "{nope").unwrap();
        assert_eq!(read_session(dir.path()), None);
    }
}
