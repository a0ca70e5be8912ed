use serde::Serialize;
use tracing::debug;

use crate::model::project::Project;
use crate::model::snapshot::Snapshot;
use crate::model::state::AppState;
use crate::model::task::{EntityKind, Subtask, Task};
use crate::ops::ids::IdGenerator;
use crate::ops::matcher::KeyIndex;
use crate::ops::rekey::{claim_or_regenerate, project_collides, rekey_project, UsedIds};

/// What a merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub projects_added: usize,
    pub projects_matched: usize,
    /// Incoming projects whose whole subtree got fresh IDs
    pub projects_rekeyed: usize,
    pub tasks_added: usize,
    pub tasks_matched: usize,
    pub subtasks_added: usize,
    pub subtasks_matched: usize,
    /// Matched subtasks that were open and are now done
    pub subtasks_completed: usize,
    /// Single task/subtask IDs replaced because they were already in use
    pub ids_regenerated: usize,
}

impl MergeReport {
    /// True if the merge left the board exactly as it was
    pub fn is_noop(&self) -> bool {
        self.projects_added == 0
            && self.tasks_added == 0
            && self.subtasks_added == 0
            && self.subtasks_completed == 0
    }
}

/// Union `snapshot` into the live board.
///
/// Each incoming project is matched to a live one (ID, then name); unmatched
/// projects, tasks and subtasks are appended to the end of their parent,
/// matched subtasks take `done = live || incoming`. Nothing live is removed,
/// reordered or renamed. IDs stay unique per kind across the whole board:
/// an ambiguous project ID rekeys the project subtree, and a single task or
/// subtask ID already in use is regenerated in place.
pub fn merge_snapshot(
    state: &mut AppState,
    snapshot: &Snapshot,
    ids: &mut dyn IdGenerator,
) -> MergeReport {
    let mut merger = Merger {
        used: UsedIds::from_projects(&state.projects),
        ids,
        report: MergeReport::default(),
    };
    let mut index = KeyIndex::build(&state.projects);

    for incoming in &snapshot.projects {
        let rekeyed = project_collides(incoming, &state.projects, &merger.used);
        let incoming = if rekeyed {
            merger.report.projects_rekeyed += 1;
            rekey_project(incoming, &mut merger.used, merger.ids)
        } else {
            incoming.clone()
        };
        merger.used.claim_project(&incoming.id);

        match index.find(&incoming) {
            Some(pos) => {
                merger.report.projects_matched += 1;
                let target = &mut state.projects[pos];
                debug!(incoming = %incoming.id, target = %target.id, "project matched");
                merger.merge_tasks(target, incoming.tasks, rekeyed);
            }
            None => {
                let project = merger.prepare_new_project(incoming, rekeyed);
                debug!(id = %project.id, name = %project.name, "project added");
                index.push(&project, state.projects.len());
                state.projects.push(project);
            }
        }
    }

    merger.report
}

/// Replace the live board with the snapshot wholesale and select its first
/// project (or none if it is empty).
pub fn replace_state(state: &mut AppState, snapshot: &Snapshot) {
    *state = AppState::new(snapshot.projects.clone(), snapshot.layout_mode);
}

struct Merger<'a> {
    used: UsedIds,
    ids: &'a mut dyn IdGenerator,
    report: MergeReport,
}

impl Merger<'_> {
    /// Entities from a rekeyed subtree already hold fresh IDs, so `fresh`
    /// skips the per-entity collision check for them.
    fn claim(&mut self, kind: EntityKind, id: &mut String, fresh: bool) {
        if fresh {
            return;
        }
        if claim_or_regenerate(kind, id, &mut self.used, self.ids) {
            self.report.ids_regenerated += 1;
        }
    }

    fn prepare_new_project(&mut self, mut project: Project, fresh: bool) -> Project {
        self.report.projects_added += 1;
        for task in &mut project.tasks {
            self.prepare_new_task(task, fresh);
        }
        project
    }

    fn prepare_new_task(&mut self, task: &mut Task, fresh: bool) {
        self.report.tasks_added += 1;
        self.claim(EntityKind::Task, &mut task.id, fresh);
        for sub in &mut task.subtasks {
            self.report.subtasks_added += 1;
            self.claim(EntityKind::Subtask, &mut sub.id, fresh);
        }
    }

    fn merge_tasks(&mut self, target: &mut Project, incoming: Vec<Task>, fresh: bool) {
        let mut index = KeyIndex::build(&target.tasks);
        for mut task in incoming {
            match index.find(&task) {
                Some(pos) => {
                    self.report.tasks_matched += 1;
                    self.merge_subtasks(&mut target.tasks[pos], task.subtasks, fresh);
                }
                None => {
                    self.prepare_new_task(&mut task, fresh);
                    index.push(&task, target.tasks.len());
                    target.tasks.push(task);
                }
            }
        }
    }

    fn merge_subtasks(&mut self, target: &mut Task, incoming: Vec<Subtask>, fresh: bool) {
        let mut index = KeyIndex::build(&target.subtasks);
        for mut sub in incoming {
            match index.find(&sub) {
                Some(pos) => {
                    self.report.subtasks_matched += 1;
                    let live = &mut target.subtasks[pos];
                    // Completion only ever moves forward; the live title is kept.
                    if sub.done && !live.done {
                        live.done = true;
                        self.report.subtasks_completed += 1;
                    }
                }
                None => {
                    self.report.subtasks_added += 1;
                    self.claim(EntityKind::Subtask, &mut sub.id, fresh);
                    index.push(&sub, target.subtasks.len());
                    target.subtasks.push(sub);
                }
            }
        }
    }
}
