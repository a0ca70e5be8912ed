use serde::{Deserialize, Serialize};

/// Placeholder title for a task whose title is missing or blank
pub const UNTITLED_TASK: &str = "Untitled task";
/// Placeholder title for a subtask whose title is missing or blank
pub const UNTITLED_SUBTASK: &str = "Untitled subtask";

/// The three entity kinds of the board hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Task,
    Subtask,
}

impl EntityKind {
    /// The one-character tag that prefixes generated identifiers
    pub fn tag(self) -> char {
        match self {
            EntityKind::Project => 'p',
            EntityKind::Task => 't',
            EntityKind::Subtask => 's',
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Project => write!(f, "project"),
            EntityKind::Task => write!(f, "task"),
            EntityKind::Subtask => write!(f, "subtask"),
        }
    }
}

/// A checklist item inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Subtask {
            id: id.into(),
            title: title.into(),
            done: false,
        }
    }
}

/// A task card: a title plus an ordered checklist of subtasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Subtasks in user-controlled order
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            subtasks: Vec::new(),
        }
    }

    /// Builder-style helper used by fixtures and the demo board
    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = subtasks;
        self
    }
}
