use std::collections::HashMap;

use crate::model::project::Project;
use crate::model::task::{Subtask, Task};

/// An entity that can be matched across snapshots
pub trait Keyed {
    fn key_id(&self) -> &str;
    /// Display name or title
    fn key_name(&self) -> &str;
}

impl Keyed for Project {
    fn key_id(&self) -> &str {
        &self.id
    }
    fn key_name(&self) -> &str {
        &self.name
    }
}

impl Keyed for Task {
    fn key_id(&self) -> &str {
        &self.id
    }
    fn key_name(&self) -> &str {
        &self.title
    }
}

impl Keyed for Subtask {
    fn key_id(&self) -> &str {
        &self.id
    }
    fn key_name(&self) -> &str {
        &self.title
    }
}

/// Case-insensitive, whitespace-trimmed form of a name used for matching
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Whether two names are the same once normalized
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_key(a) == normalize_key(b)
}

/// Find the live entity that corresponds to `candidate`.
///
/// An exact ID match anywhere in `live` wins over a name match; among name
/// matches the first one in order wins. Two distinct entities whose names
/// normalize the same are treated as one.
pub fn find_match<T: Keyed, C: Keyed>(live: &[T], candidate: &C) -> Option<usize> {
    live.iter()
        .position(|e| e.key_id() == candidate.key_id())
        .or_else(|| {
            let name = normalize_key(candidate.key_name());
            live.iter()
                .position(|e| normalize_key(e.key_name()) == name)
        })
}

/// Lookup table over one live collection with the same precedence as
/// [`find_match`]: ID first, then the first entity with the normalized name.
///
/// Positions stay valid as long as the collection is only appended to, which
/// is all the merge engine ever does; call [`KeyIndex::push`] after appending.
#[derive(Debug, Default, Clone)]
pub struct KeyIndex {
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl KeyIndex {
    pub fn build<T: Keyed>(live: &[T]) -> Self {
        let mut index = KeyIndex::default();
        for (pos, entity) in live.iter().enumerate() {
            index.insert(entity, pos);
        }
        index
    }

    /// Record an entity appended at position `pos`
    pub fn push<T: Keyed>(&mut self, entity: &T, pos: usize) {
        self.insert(entity, pos);
    }

    fn insert<T: Keyed>(&mut self, entity: &T, pos: usize) {
        // First occurrence wins for both keys.
        self.by_id.entry(entity.key_id().to_string()).or_insert(pos);
        self.by_name
            .entry(normalize_key(entity.key_name()))
            .or_insert(pos);
    }

    pub fn find<C: Keyed>(&self, candidate: &C) -> Option<usize> {
        self.by_id
            .get(candidate.key_id())
            .or_else(|| self.by_name.get(&normalize_key(candidate.key_name())))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("t1", "Plan"),
            Task::new("t2", "Ship"),
            Task::new("t3", "  plan "),
        ]
    }

    #[test]
    fn normalize_key_trims_and_lowercases() {
        assert_eq!(normalize_key("  Define SCOPE \n"), "define scope");
        assert!(names_match("Work", " work"));
        assert!(!names_match("Work", "Works"));
    }

    #[test]
    fn id_match_wins_over_name_match() {
        let live = tasks();
        // Named like t1 but carries t2's id
        let incoming = Task::new("t2", "Plan");
        assert_eq!(find_match(&live, &incoming), Some(1));
    }

    #[test]
    fn name_match_is_case_insensitive_and_first_wins() {
        let live = tasks();
        let incoming = Task::new("t99", "PLAN");
        assert_eq!(find_match(&live, &incoming), Some(0));
    }

    #[test]
    fn no_match() {
        let live = tasks();
        assert_eq!(find_match(&live, &Task::new("t9", "Review")), None);
        assert_eq!(find_match::<Task, _>(&[], &Task::new("t1", "Plan")), None);
    }

    #[test]
    fn index_agrees_with_scan() {
        let live = tasks();
        let index = KeyIndex::build(&live);
        for incoming in [
            Task::new("t2", "Plan"),
            Task::new("t99", "PLAN"),
            Task::new("t3", "whatever"),
            Task::new("t9", "Review"),
        ] {
            assert_eq!(index.find(&incoming), find_match(&live, &incoming));
        }
    }

    #[test]
    fn index_push_tracks_appends() {
        let mut live = tasks();
        let mut index = KeyIndex::build(&live);
        let added = Task::new("t4", "Review");
        live.push(added.clone());
        index.push(&added, live.len() - 1);
        assert_eq!(index.find(&Task::new("x", "review")), Some(3));
        assert_eq!(index.find(&Task::new("t4", "")), Some(3));
    }

    #[test]
    fn matches_across_entity_kinds() {
        let live = vec![Project::new("p1", "Work")];
        assert_eq!(find_match(&live, &Project::new("p7", "work ")), Some(0));
        let subs = vec![Subtask::new("s1", "Define scope")];
        assert_eq!(find_match(&subs, &Subtask::new("s1", "other")), Some(0));
    }
}
