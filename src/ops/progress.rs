use serde::Serialize;

use crate::model::project::Project;
use crate::model::state::AppState;
use crate::model::task::{Subtask, Task};

/// Done/total subtask counts with a rounded percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

impl Progress {
    fn from_subtasks<'a>(subtasks: impl Iterator<Item = &'a Subtask>) -> Self {
        let (done, total) = subtasks.fold((0, 0), |(d, t), s| (d + usize::from(s.done), t + 1));
        Progress {
            done,
            total,
            percent: percent(done, total),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Rounded percentage, 0 for an empty set
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done * 200 + total) / (total * 2)) as u8
}

/// Progress over every subtask on the board
pub fn board_progress(state: &AppState) -> Progress {
    Progress::from_subtasks(state.projects.iter().flat_map(|p| p.subtasks()))
}

pub fn project_progress(project: &Project) -> Progress {
    Progress::from_subtasks(project.subtasks())
}

pub fn task_progress(task: &Task) -> Progress {
    Progress::from_subtasks(task.subtasks.iter())
}
