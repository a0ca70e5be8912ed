use std::collections::HashSet;

use tracing::debug;

use crate::model::project::Project;
use crate::model::task::EntityKind;
use crate::ops::ids::IdGenerator;
use crate::ops::matcher::names_match;

/// Identifiers already taken during one import, kept per entity kind.
///
/// Seeded from the whole live board and extended with every identifier the
/// import assigns, so uniqueness is checked against the flattened set of a
/// kind rather than a single parent's children.
#[derive(Debug, Default, Clone)]
pub struct UsedIds {
    projects: HashSet<String>,
    tasks: HashSet<String>,
    subtasks: HashSet<String>,
    /// Project IDs already claimed by an earlier project of this import
    claimed: HashSet<String>,
}

impl UsedIds {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut used = UsedIds::default();
        for p in projects {
            used.projects.insert(p.id.clone());
            for t in &p.tasks {
                used.tasks.insert(t.id.clone());
                for s in &t.subtasks {
                    used.subtasks.insert(s.id.clone());
                }
            }
        }
        used
    }

    fn set(&self, kind: EntityKind) -> &HashSet<String> {
        match kind {
            EntityKind::Project => &self.projects,
            EntityKind::Task => &self.tasks,
            EntityKind::Subtask => &self.subtasks,
        }
    }

    fn set_mut(&mut self, kind: EntityKind) -> &mut HashSet<String> {
        match kind {
            EntityKind::Project => &mut self.projects,
            EntityKind::Task => &mut self.tasks,
            EntityKind::Subtask => &mut self.subtasks,
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.set(kind).contains(id)
    }

    /// Mark an identifier as taken. Returns false if it already was.
    pub fn insert(&mut self, kind: EntityKind, id: &str) -> bool {
        self.set_mut(kind).insert(id.to_string())
    }

    /// Record that an incoming project now owns `id` for the rest of the import
    pub fn claim_project(&mut self, id: &str) {
        self.projects.insert(id.to_string());
        self.claimed.insert(id.to_string());
    }

    pub fn is_claimed(&self, id: &str) -> bool {
        self.claimed.contains(id)
    }
}

/// Draw identifiers until one is not in use, then mark it used.
pub fn fresh_id(kind: EntityKind, used: &mut UsedIds, ids: &mut dyn IdGenerator) -> String {
    loop {
        let id = ids.generate(kind);
        if used.insert(kind, &id) {
            return id;
        }
        debug!(%kind, %id, "generated id already in use, drawing again");
    }
}

/// Keep `id` if it is free, otherwise replace it with a fresh one. Either way
/// the final value is marked used. Returns true if the id was replaced.
pub fn claim_or_regenerate(
    kind: EntityKind,
    id: &mut String,
    used: &mut UsedIds,
    ids: &mut dyn IdGenerator,
) -> bool {
    if used.insert(kind, id) {
        return false;
    }
    let old = std::mem::replace(id, fresh_id(kind, used, ids));
    debug!(%kind, old = %old, new = %id, "regenerated colliding id");
    true
}

/// Whether an incoming project's identifier is ambiguous and the whole
/// subtree must be rekeyed.
///
/// The ID collides if an earlier project of this import already claimed it,
/// or if a live project carries it but is unrelated: a different normalized
/// name and no task ID in common. A live project with the same ID that shares
/// the name or a task is the same record exported earlier.
pub fn project_collides(incoming: &Project, live: &[Project], used: &UsedIds) -> bool {
    if !used.contains(EntityKind::Project, &incoming.id) {
        return false;
    }
    if used.is_claimed(&incoming.id) {
        return true;
    }
    match live.iter().find(|p| p.id == incoming.id) {
        Some(existing) => !same_record(existing, incoming),
        None => true,
    }
}

fn same_record(live: &Project, incoming: &Project) -> bool {
    names_match(&live.name, &incoming.name)
        || incoming
            .tasks
            .iter()
            .any(|t| live.tasks.iter().any(|lt| lt.id == t.id))
}

/// Deep-clone a project, giving it and every task and subtask a fresh
/// identifier. The tree shape, titles and flags are unchanged.
pub fn rekey_project(project: &Project, used: &mut UsedIds, ids: &mut dyn IdGenerator) -> Project {
    let mut rekeyed = project.clone();
    rekeyed.id = fresh_id(EntityKind::Project, used, ids);
    for task in &mut rekeyed.tasks {
        task.id = fresh_id(EntityKind::Task, used, ids);
        for sub in &mut task.subtasks {
            sub.id = fresh_id(EntityKind::Subtask, used, ids);
        }
    }
    debug!(old = %project.id, new = %rekeyed.id, name = %project.name, "rekeyed project subtree");
    rekeyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Subtask, Task};
    use crate::ops::ids::SequenceGenerator;

    fn live() -> Vec<Project> {
        vec![Project::new("p1", "Work").with_tasks(vec![
            Task::new("t1", "Plan").with_subtasks(vec![Subtask::new("s1", "Define scope")]),
        ])]
    }

    #[test]
    fn used_ids_are_per_kind() {
        let used = UsedIds::from_projects(&live());
        assert!(used.contains(EntityKind::Project, "p1"));
        assert!(used.contains(EntityKind::Task, "t1"));
        assert!(used.contains(EntityKind::Subtask, "s1"));
        assert!(!used.contains(EntityKind::Task, "p1"));
        assert!(!used.contains(EntityKind::Project, "t1"));
    }

    #[test]
    fn fresh_id_skips_used_ids() {
        let mut used = UsedIds::from_projects(&live());
        let mut ids = SequenceGenerator::new();
        // "p1" is taken, so the sequence moves on to "p2"
        assert_eq!(fresh_id(EntityKind::Project, &mut used, &mut ids), "p2");
        assert!(used.contains(EntityKind::Project, "p2"));
    }

    #[test]
    fn claim_or_regenerate_keeps_free_ids() {
        let mut used = UsedIds::from_projects(&live());
        let mut ids = SequenceGenerator::new();
        let mut id = "t7".to_string();
        assert!(!claim_or_regenerate(EntityKind::Task, &mut id, &mut used, &mut ids));
        assert_eq!(id, "t7");
        assert!(used.contains(EntityKind::Task, "t7"));

        let mut id = "t1".to_string();
        assert!(claim_or_regenerate(EntityKind::Task, &mut id, &mut used, &mut ids));
        assert_eq!(id, "t2");
    }

    #[test]
    fn free_project_id_does_not_collide() {
        let used = UsedIds::from_projects(&live());
        assert!(!project_collides(&Project::new("p9", "Other"), &live(), &used));
    }

    #[test]
    fn same_record_does_not_collide() {
        let used = UsedIds::from_projects(&live());
        // Same id, same name modulo case
        assert!(!project_collides(&Project::new("p1", " WORK"), &live(), &used));
        // Same id, renamed, but shares task t1
        let renamed = Project::new("p1", "Job").with_tasks(vec![Task::new("t1", "Plan")]);
        assert!(!project_collides(&renamed, &live(), &used));
    }

    #[test]
    fn unrelated_project_with_same_id_collides() {
        let used = UsedIds::from_projects(&live());
        let other = Project::new("p1", "Garden").with_tasks(vec![Task::new("t5", "Dig")]);
        assert!(project_collides(&other, &live(), &used));
    }

    #[test]
    fn id_claimed_earlier_in_import_collides() {
        let mut used = UsedIds::from_projects(&live());
        used.claim_project("p1");
        assert!(project_collides(&Project::new("p1", "Work"), &live(), &used));
    }

    #[test]
    fn rekey_replaces_every_id_and_keeps_shape() {
        let mut used = UsedIds::from_projects(&live());
        let mut ids = SequenceGenerator::new();
        let incoming = Project::new("p1", "Garden").with_tasks(vec![
            Task::new("t1", "Dig").with_subtasks(vec![
                Subtask::new("s1", "Buy spade"),
                Subtask {
                    id: "s2".into(),
                    title: "Find spot".into(),
                    done: true,
                },
            ]),
            Task::new("t2", "Plant"),
        ]);

        let rekeyed = rekey_project(&incoming, &mut used, &mut ids);

        assert_eq!(rekeyed.id, "p2");
        assert_eq!(rekeyed.name, "Garden");
        assert_eq!(rekeyed.tasks.len(), 2);
        assert_eq!(rekeyed.tasks[0].id, "t2");
        assert_eq!(rekeyed.tasks[1].id, "t3");
        let subs = &rekeyed.tasks[0].subtasks;
        assert_eq!(subs[0].id, "s2");
        assert_eq!(subs[1].id, "s3");
        assert_eq!(subs[1].title, "Find spot");
        assert!(subs[1].done);
        // Input project untouched
        assert_eq!(incoming.id, "p1");
        for id in ["p2", "t2", "t3"] {
            let kind = if id.starts_with('p') { EntityKind::Project } else { EntityKind::Task };
            assert!(used.contains(kind, id));
        }
    }
}
