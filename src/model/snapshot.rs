use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::project::Project;
use super::state::{AppState, LayoutMode};

/// Schema version written by export and understood by import
pub const SCHEMA_VERSION: u32 = 1;

/// A normalized, well-formed snapshot ready to reconcile
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub layout_mode: LayoutMode,
    /// `schemaVersion` as found in the document, if it was an integer
    pub schema_version: Option<u64>,
    /// `exportedAt` as found in the document, if it was a string
    pub exported_at: Option<String>,
}

/// The export file document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub projects: Vec<Project>,
    pub layout_mode: LayoutMode,
}

impl ExportDocument {
    pub fn from_app_state(state: &AppState, exported_at: DateTime<Utc>) -> Self {
        ExportDocument {
            schema_version: SCHEMA_VERSION,
            exported_at,
            projects: state.projects.clone(),
            layout_mode: state.layout_mode,
        }
    }
}
