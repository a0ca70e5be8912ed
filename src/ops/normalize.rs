use serde_json::{Map, Value};

use crate::model::project::{Project, UNTITLED_PROJECT};
use crate::model::snapshot::Snapshot;
use crate::model::state::LayoutMode;
use crate::model::task::{EntityKind, Subtask, Task, UNTITLED_SUBTASK, UNTITLED_TASK};
use crate::ops::ids::IdGenerator;

/// Why a decoded document could not be turned into a snapshot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("snapshot must be a JSON object")]
    NotAnObject,
    #[error("snapshot has no `projects` list")]
    MissingProjects,
}

/// Validate and coerce a decoded document into a well-formed snapshot.
///
/// Only the top-level shape is strict: the value must be an object with a
/// `projects` array. Below that everything is repaired rather than rejected:
/// non-object entries are skipped, missing IDs are generated, blank titles
/// get a placeholder and a non-boolean `done` becomes false.
pub fn normalize_snapshot(
    doc: &Value,
    ids: &mut dyn IdGenerator,
) -> Result<Snapshot, NormalizeError> {
    let root = doc.as_object().ok_or(NormalizeError::NotAnObject)?;
    let raw_projects = root
        .get("projects")
        .and_then(Value::as_array)
        .ok_or(NormalizeError::MissingProjects)?;

    let projects = raw_projects
        .iter()
        .filter_map(Value::as_object)
        .map(|p| normalize_project(p, ids))
        .collect();

    let layout_mode = root
        .get("layoutMode")
        .and_then(Value::as_str)
        .and_then(LayoutMode::parse)
        .unwrap_or_default();

    Ok(Snapshot {
        projects,
        layout_mode,
        schema_version: root.get("schemaVersion").and_then(Value::as_u64),
        exported_at: root
            .get("exportedAt")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn normalize_project(raw: &Map<String, Value>, ids: &mut dyn IdGenerator) -> Project {
    let id = id_field(raw, EntityKind::Project, ids);
    let name = text_field(raw, "name", UNTITLED_PROJECT);
    let tasks = objects(raw, "tasks")
        .map(|t| normalize_task(t, ids))
        .collect();
    Project { id, name, tasks }
}

fn normalize_task(raw: &Map<String, Value>, ids: &mut dyn IdGenerator) -> Task {
    let id = id_field(raw, EntityKind::Task, ids);
    let title = text_field(raw, "title", UNTITLED_TASK);
    let subtasks = objects(raw, "subtasks")
        .map(|s| normalize_subtask(s, ids))
        .collect();
    Task {
        id,
        title,
        subtasks,
    }
}

fn normalize_subtask(raw: &Map<String, Value>, ids: &mut dyn IdGenerator) -> Subtask {
    Subtask {
        id: id_field(raw, EntityKind::Subtask, ids),
        title: text_field(raw, "title", UNTITLED_SUBTASK),
        done: raw.get("done").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Non-empty string IDs are kept verbatim; anything else gets a fresh one.
fn id_field(raw: &Map<String, Value>, kind: EntityKind, ids: &mut dyn IdGenerator) -> String {
    match raw.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => ids.generate(kind),
    }
}

fn text_field(raw: &Map<String, Value>, key: &str, placeholder: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// Object entries of an array field; a missing or non-array field is empty.
fn objects<'a>(
    raw: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> + 'a {
    raw.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}
