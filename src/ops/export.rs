use chrono::{DateTime, NaiveDate, Utc};

use crate::model::snapshot::ExportDocument;
use crate::model::state::AppState;

/// Build the export document for the live board
pub fn export_document(state: &AppState, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument::from_app_state(state, now)
}

/// Pretty-printed JSON export of the live board
pub fn export_json(state: &AppState, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_document(state, now))
}

/// Default export file name, e.g. `tasks-board-2025-05-01.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("tasks-board-{}.json", date.format("%Y-%m-%d"))
}
