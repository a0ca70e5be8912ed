use serde::{Deserialize, Serialize};

use super::task::{Subtask, Task};

/// Placeholder name for a project whose name is missing or blank
pub const UNTITLED_PROJECT: &str = "Untitled project";

/// A top-level project holding an ordered list of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Tasks in user-controlled order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Project {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Iterate every subtask in the project, in display order
    pub fn subtasks(&self) -> impl Iterator<Item = &Subtask> {
        self.tasks.iter().flat_map(|t| t.subtasks.iter())
    }
}
