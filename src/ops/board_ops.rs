use crate::model::project::Project;
use crate::model::state::{AppState, LayoutMode};
use crate::model::task::{EntityKind, Subtask, Task};
use crate::ops::ids::IdGenerator;
use crate::ops::rekey::{fresh_id, UsedIds};

/// Error type for board operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{0} not found: {1}")]
    NotFound(EntityKind, String),
    #[error("{0} title cannot be empty")]
    EmptyTitle(EntityKind),
    #[error("no project selected")]
    NoCurrentProject,
}

fn not_found(kind: EntityKind, id: &str) -> BoardError {
    BoardError::NotFound(kind, id.to_string())
}

fn clean_title(kind: EntityKind, title: &str) -> Result<String, BoardError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BoardError::EmptyTitle(kind));
    }
    Ok(title.to_string())
}

/// A fresh ID not used by any entity of `kind` on the board
fn new_id(state: &AppState, kind: EntityKind, ids: &mut dyn IdGenerator) -> String {
    let mut used = UsedIds::from_projects(&state.projects);
    fresh_id(kind, &mut used, ids)
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Find a task anywhere on the board. Returns the owning project index.
pub fn find_task<'a>(state: &'a AppState, task_id: &str) -> Option<(usize, &'a Task)> {
    state.projects.iter().enumerate().find_map(|(pi, p)| {
        p.tasks.iter().find(|t| t.id == task_id).map(|t| (pi, t))
    })
}

fn find_task_mut<'a>(state: &'a mut AppState, task_id: &str) -> Option<&'a mut Task> {
    state
        .projects
        .iter_mut()
        .flat_map(|p| p.tasks.iter_mut())
        .find(|t| t.id == task_id)
}

/// Find a subtask anywhere on the board
pub fn find_subtask<'a>(state: &'a AppState, subtask_id: &str) -> Option<&'a Subtask> {
    state
        .projects
        .iter()
        .flat_map(|p| p.subtasks())
        .find(|s| s.id == subtask_id)
}

fn find_subtask_mut<'a>(state: &'a mut AppState, subtask_id: &str) -> Option<&'a mut Subtask> {
    state
        .projects
        .iter_mut()
        .flat_map(|p| p.tasks.iter_mut())
        .flat_map(|t| t.subtasks.iter_mut())
        .find(|s| s.id == subtask_id)
}

fn project_mut<'a>(state: &'a mut AppState, project_id: &str) -> Result<&'a mut Project, BoardError> {
    state
        .find_project_mut(project_id)
        .ok_or_else(|| not_found(EntityKind::Project, project_id))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Append a new project and make it the current one. Returns its ID.
pub fn add_project(
    state: &mut AppState,
    name: &str,
    ids: &mut dyn IdGenerator,
) -> Result<String, BoardError> {
    let name = clean_title(EntityKind::Project, name)?;
    let id = new_id(state, EntityKind::Project, ids);
    state.projects.push(Project::new(id.clone(), name));
    state.current_project_id = Some(id.clone());
    Ok(id)
}

/// Rename a project. Returns false if the name was unchanged.
pub fn rename_project(state: &mut AppState, project_id: &str, name: &str) -> Result<bool, BoardError> {
    let name = clean_title(EntityKind::Project, name)?;
    let project = project_mut(state, project_id)?;
    if project.name == name {
        return Ok(false);
    }
    project.name = name;
    Ok(true)
}

/// Remove every task from a project
pub fn clear_project(state: &mut AppState, project_id: &str) -> Result<(), BoardError> {
    project_mut(state, project_id)?.tasks.clear();
    Ok(())
}

/// Delete a project and everything in it
pub fn delete_project(state: &mut AppState, project_id: &str) -> Result<Project, BoardError> {
    let idx = state
        .projects
        .iter()
        .position(|p| p.id == project_id)
        .ok_or_else(|| not_found(EntityKind::Project, project_id))?;
    let removed = state.projects.remove(idx);
    state.fix_selection();
    Ok(removed)
}

pub fn select_project(state: &mut AppState, project_id: &str) -> Result<(), BoardError> {
    if state.find_project(project_id).is_none() {
        return Err(not_found(EntityKind::Project, project_id));
    }
    state.current_project_id = Some(project_id.to_string());
    Ok(())
}

/// Move a project to the position currently held by `target_id`
pub fn move_project(state: &mut AppState, project_id: &str, target_id: &str) -> Result<(), BoardError> {
    let from = state
        .projects
        .iter()
        .position(|p| p.id == project_id)
        .ok_or_else(|| not_found(EntityKind::Project, project_id))?;
    let to = state
        .projects
        .iter()
        .position(|p| p.id == target_id)
        .ok_or_else(|| not_found(EntityKind::Project, target_id))?;
    if from != to {
        let moved = state.projects.remove(from);
        state.projects.insert(to, moved);
    }
    Ok(())
}

/// Remove every project
pub fn clear_all(state: &mut AppState) {
    state.projects.clear();
    state.current_project_id = None;
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Append a task to a project. Returns the new task ID.
pub fn add_task(
    state: &mut AppState,
    project_id: &str,
    title: &str,
    ids: &mut dyn IdGenerator,
) -> Result<String, BoardError> {
    let title = clean_title(EntityKind::Task, title)?;
    if state.find_project(project_id).is_none() {
        return Err(not_found(EntityKind::Project, project_id));
    }
    let id = new_id(state, EntityKind::Task, ids);
    project_mut(state, project_id)?
        .tasks
        .push(Task::new(id.clone(), title));
    Ok(id)
}

/// Append a task to the current project
pub fn add_task_to_current(
    state: &mut AppState,
    title: &str,
    ids: &mut dyn IdGenerator,
) -> Result<String, BoardError> {
    let project_id = state
        .current_project()
        .map(|p| p.id.clone())
        .ok_or(BoardError::NoCurrentProject)?;
    add_task(state, &project_id, title, ids)
}

/// Retitle a task. Returns false if the title was unchanged.
pub fn edit_task(state: &mut AppState, task_id: &str, title: &str) -> Result<bool, BoardError> {
    let title = clean_title(EntityKind::Task, title)?;
    let task = find_task_mut(state, task_id).ok_or_else(|| not_found(EntityKind::Task, task_id))?;
    if task.title == title {
        return Ok(false);
    }
    task.title = title;
    Ok(true)
}

/// Delete a task and its subtasks
pub fn delete_task(state: &mut AppState, task_id: &str) -> Result<Task, BoardError> {
    for project in &mut state.projects {
        if let Some(idx) = project.tasks.iter().position(|t| t.id == task_id) {
            return Ok(project.tasks.remove(idx));
        }
    }
    Err(not_found(EntityKind::Task, task_id))
}

/// Remove every subtask from a task
pub fn clear_task(state: &mut AppState, task_id: &str) -> Result<(), BoardError> {
    find_task_mut(state, task_id)
        .ok_or_else(|| not_found(EntityKind::Task, task_id))?
        .subtasks
        .clear();
    Ok(())
}

/// Move a task to the end of another project and select that project
pub fn move_task(state: &mut AppState, task_id: &str, to_project_id: &str) -> Result<(), BoardError> {
    if state.find_project(to_project_id).is_none() {
        return Err(not_found(EntityKind::Project, to_project_id));
    }
    let task = delete_task(state, task_id)?;
    project_mut(state, to_project_id)?.tasks.push(task);
    state.current_project_id = Some(to_project_id.to_string());
    Ok(())
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

/// Append an open subtask to a task. Returns the new subtask ID.
pub fn add_subtask(
    state: &mut AppState,
    task_id: &str,
    title: &str,
    ids: &mut dyn IdGenerator,
) -> Result<String, BoardError> {
    let title = clean_title(EntityKind::Subtask, title)?;
    if find_task(state, task_id).is_none() {
        return Err(not_found(EntityKind::Task, task_id));
    }
    let id = new_id(state, EntityKind::Subtask, ids);
    find_task_mut(state, task_id)
        .ok_or_else(|| not_found(EntityKind::Task, task_id))?
        .subtasks
        .push(Subtask::new(id.clone(), title));
    Ok(id)
}

/// Retitle a subtask. Returns false if the title was unchanged.
pub fn edit_subtask(state: &mut AppState, subtask_id: &str, title: &str) -> Result<bool, BoardError> {
    let title = clean_title(EntityKind::Subtask, title)?;
    let sub = find_subtask_mut(state, subtask_id)
        .ok_or_else(|| not_found(EntityKind::Subtask, subtask_id))?;
    if sub.title == title {
        return Ok(false);
    }
    sub.title = title;
    Ok(true)
}

pub fn delete_subtask(state: &mut AppState, subtask_id: &str) -> Result<Subtask, BoardError> {
    for task in state.projects.iter_mut().flat_map(|p| p.tasks.iter_mut()) {
        if let Some(idx) = task.subtasks.iter().position(|s| s.id == subtask_id) {
            return Ok(task.subtasks.remove(idx));
        }
    }
    Err(not_found(EntityKind::Subtask, subtask_id))
}

/// Flip a subtask's completion flag. Returns the new value.
pub fn toggle_subtask(state: &mut AppState, subtask_id: &str) -> Result<bool, BoardError> {
    let sub = find_subtask_mut(state, subtask_id)
        .ok_or_else(|| not_found(EntityKind::Subtask, subtask_id))?;
    sub.done = !sub.done;
    Ok(sub.done)
}

/// Move a subtask to the end of another task
pub fn move_subtask(state: &mut AppState, subtask_id: &str, to_task_id: &str) -> Result<(), BoardError> {
    if find_task(state, to_task_id).is_none() {
        return Err(not_found(EntityKind::Task, to_task_id));
    }
    let sub = delete_subtask(state, subtask_id)?;
    find_task_mut(state, to_task_id)
        .ok_or_else(|| not_found(EntityKind::Task, to_task_id))?
        .subtasks
        .push(sub);
    Ok(())
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

pub fn set_layout(state: &mut AppState, layout: LayoutMode) {
    state.layout_mode = layout;
}

/// Switch between list and grid. Returns the new layout.
pub fn toggle_layout(state: &mut AppState) -> LayoutMode {
    state.layout_mode = state.layout_mode.toggled();
    state.layout_mode
}

// ---------------------------------------------------------------------------
// Demo board
// ---------------------------------------------------------------------------

/// The board a fresh install starts with
pub fn demo_projects() -> Vec<Project> {
    vec![Project::new("p1", "Demo project").with_tasks(vec![
        Task::new("t1", "Prepare project plan").with_subtasks(vec![
            Subtask::new("s1", "Define scope"),
            Subtask::new("s2", "List main milestones"),
        ]),
        Task::new("t2", "Frontend work").with_subtasks(vec![
            Subtask::new("s3", "Design header"),
            Subtask::new("s4", "Implement task board UI"),
        ]),
    ])]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
