use serde::{Deserialize, Serialize};

use super::project::Project;
use super::task::EntityKind;

/// How the board lays out task cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum LayoutMode {
    #[default]
    List,
    Grid,
}

impl LayoutMode {
    /// Parse a recognized layout name
    pub fn parse(s: &str) -> Option<LayoutMode> {
        match s {
            "list" => Some(LayoutMode::List),
            "grid" => Some(LayoutMode::Grid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::List => "list",
            LayoutMode::Grid => "grid",
        }
    }

    pub fn toggled(self) -> LayoutMode {
        match self {
            LayoutMode::List => LayoutMode::Grid,
            LayoutMode::Grid => LayoutMode::List,
        }
    }
}

/// Unrecognized layout names fall back to the default layout.
impl From<String> for LayoutMode {
    fn from(s: String) -> Self {
        LayoutMode::parse(&s).unwrap_or_default()
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted board (what the store reads and writes)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub layout_mode: LayoutMode,
}

/// The live board being edited
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub projects: Vec<Project>,
    pub layout_mode: LayoutMode,
    /// Project shown in the board view (session only, not persisted)
    pub current_project_id: Option<String>,
}

impl AppState {
    pub fn new(projects: Vec<Project>, layout_mode: LayoutMode) -> Self {
        let current_project_id = projects.first().map(|p| p.id.clone());
        AppState {
            projects,
            layout_mode,
            current_project_id,
        }
    }

    /// Build the live board from a persisted one, selecting the first project
    pub fn from_state(state: State) -> Self {
        AppState::new(state.projects, state.layout_mode)
    }

    pub fn to_state(&self) -> State {
        State {
            projects: self.projects.clone(),
            layout_mode: self.layout_mode,
        }
    }

    pub fn current_project(&self) -> Option<&Project> {
        let id = self.current_project_id.as_deref()?;
        self.find_project(id)
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn find_project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    /// All identifiers of one kind across the whole board, in tree order
    pub fn ids_of(&self, kind: EntityKind) -> Vec<&str> {
        match kind {
            EntityKind::Project => self.projects.iter().map(|p| p.id.as_str()).collect(),
            EntityKind::Task => self
                .projects
                .iter()
                .flat_map(|p| p.tasks.iter().map(|t| t.id.as_str()))
                .collect(),
            EntityKind::Subtask => self
                .projects
                .iter()
                .flat_map(|p| p.subtasks().map(|s| s.id.as_str()))
                .collect(),
        }
    }

    /// Keep `current_project_id` pointing at an existing project: if the
    /// selection was removed, fall back to the first project (or none).
    pub fn fix_selection(&mut self) {
        let valid = self
            .current_project_id
            .as_deref()
            .is_some_and(|id| self.projects.iter().any(|p| p.id == id));
        if !valid {
            self.current_project_id = self.projects.first().map(|p| p.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Subtask, Task};

    #[test]
    fn layout_mode_unknown_falls_back_to_list() {
        let mode: LayoutMode = serde_json::from_str(r#""mosaic""#).unwrap();
        assert_eq!(mode, LayoutMode::List);
        let mode: LayoutMode = serde_json::from_str(r#""grid""#).unwrap();
        assert_eq!(mode, LayoutMode::Grid);
        assert_eq!(serde_json::to_string(&LayoutMode::Grid).unwrap(), r#""grid""#);
    }

    #[test]
    fn state_uses_camel_case_layout_key() {
        let state = State {
            projects: vec![],
            layout_mode: LayoutMode::Grid,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"projects":[],"layoutMode":"grid"}"#);
    }

    #[test]
    fn state_defaults_on_minimal_object() {
        let state: State = serde_json::from_str("{}").unwrap();
        assert!(state.projects.is_empty());
        assert_eq!(state.layout_mode, LayoutMode::List);
    }

    #[test]
    fn from_state_selects_first_project() {
        let state = State {
            projects: vec![Project::new("p1", "Work"), Project::new("p2", "Home")],
            layout_mode: LayoutMode::List,
        };
        let app = AppState::from_state(state);
        assert_eq!(app.current_project_id.as_deref(), Some("p1"));
        assert_eq!(app.current_project().unwrap().name, "Work");
    }

    #[test]
    fn ids_of_flattens_per_kind() {
        let app = AppState::new(
            vec![
                Project::new("p1", "A").with_tasks(vec![
                    Task::new("t1", "x").with_subtasks(vec![Subtask::new("s1", "a")]),
                ]),
                Project::new("p2", "B").with_tasks(vec![
                    Task::new("t2", "y").with_subtasks(vec![Subtask::new("s2", "b")]),
                ]),
            ],
            LayoutMode::List,
        );
        assert_eq!(app.ids_of(EntityKind::Project), vec!["p1", "p2"]);
        assert_eq!(app.ids_of(EntityKind::Task), vec!["t1", "t2"]);
        assert_eq!(app.ids_of(EntityKind::Subtask), vec!["s1", "s2"]);
    }

    #[test]
    fn fix_selection_moves_to_first_remaining() {
        let mut app = AppState::new(
            vec![Project::new("p1", "A"), Project::new("p2", "B")],
            LayoutMode::List,
        );
        app.current_project_id = Some("gone".into());
        app.fix_selection();
        assert_eq!(app.current_project_id.as_deref(), Some("p1"));

        app.projects.clear();
        app.fix_selection();
        assert!(app.current_project_id.is_none());
    }
}
