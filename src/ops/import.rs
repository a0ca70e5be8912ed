use serde::Serialize;
use tracing::{info, warn};

use crate::model::config::ImportMode;
use crate::model::snapshot::{Snapshot, SCHEMA_VERSION};
use crate::model::state::AppState;
use crate::ops::ids::IdGenerator;
use crate::ops::merge::{merge_snapshot, replace_state, MergeReport};
use crate::ops::normalize::{normalize_snapshot, NormalizeError};

/// Error type for import operations. Any error leaves the live board untouched.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file: make sure it is a valid JSON export ({0})")]
    Parse(#[from] serde_json::Error),
    #[error("invalid file format: {0}")]
    InvalidFormat(#[from] NormalizeError),
    #[error("unsupported schema version {found} (this build reads up to {supported})")]
    UnsupportedSchema { found: u64, supported: u32 },
}

/// Knobs for one import
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Reject snapshots with a newer `schemaVersion` instead of reading them best-effort
    pub strict_schema: bool,
}

/// Result of an import operation
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub mode: ImportMode,
    /// Projects found in the snapshot after normalization
    pub snapshot_projects: usize,
    /// Present for merge imports only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeReport>,
}

/// Decode and normalize raw import bytes without touching any live state.
pub fn parse_snapshot(
    bytes: &[u8],
    strict_schema: bool,
    ids: &mut dyn IdGenerator,
) -> Result<Snapshot, ImportError> {
    let doc: serde_json::Value = serde_json::from_slice(bytes)?;
    let snapshot = normalize_snapshot(&doc, ids)?;
    check_schema(&snapshot, strict_schema)?;
    Ok(snapshot)
}

fn check_schema(snapshot: &Snapshot, strict: bool) -> Result<(), ImportError> {
    match snapshot.schema_version {
        Some(found) if found > u64::from(SCHEMA_VERSION) => {
            if strict {
                return Err(ImportError::UnsupportedSchema {
                    found,
                    supported: SCHEMA_VERSION,
                });
            }
            warn!(found, supported = SCHEMA_VERSION, "snapshot is newer than this build; reading best-effort");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Apply an already-normalized snapshot with the chosen strategy.
pub fn apply_snapshot(
    state: &mut AppState,
    snapshot: &Snapshot,
    mode: ImportMode,
    ids: &mut dyn IdGenerator,
) -> ImportReport {
    let merge = match mode {
        ImportMode::Replace => {
            replace_state(state, snapshot);
            None
        }
        ImportMode::Merge => Some(merge_snapshot(state, snapshot, ids)),
    };
    let report = ImportReport {
        mode,
        snapshot_projects: snapshot.projects.len(),
        merge,
    };
    match &report.merge {
        Some(m) => info!(
            projects_added = m.projects_added,
            projects_matched = m.projects_matched,
            projects_rekeyed = m.projects_rekeyed,
            tasks_added = m.tasks_added,
            subtasks_added = m.subtasks_added,
            subtasks_completed = m.subtasks_completed,
            ids_regenerated = m.ids_regenerated,
            "snapshot merged"
        ),
        None => info!(projects = report.snapshot_projects, "board replaced from snapshot"),
    }
    report
}

/// Parse raw import bytes and reconcile them into the live board.
///
/// Parsing and validation happen before the board is touched, so on error
/// the live state is exactly as it was.
pub fn import_snapshot(
    state: &mut AppState,
    bytes: &[u8],
    options: ImportOptions,
    ids: &mut dyn IdGenerator,
) -> Result<ImportReport, ImportError> {
    let snapshot = parse_snapshot(bytes, options.strict_schema, ids)?;
    Ok(apply_snapshot(state, &snapshot, options.mode, ids))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
