use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::model::config::IdGeneratorKind;
use crate::model::task::EntityKind;

/// Source of identifiers for new entities.
///
/// Generated IDs carry the kind tag (`p`, `t`, `s`) as their first character.
/// They only need to be practically unique: import reconciliation checks every
/// fresh ID against the IDs already in use and draws again on a clash.
pub trait IdGenerator {
    fn generate(&mut self, kind: EntityKind) -> String;
}

/// Tag + random UUID v4. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&mut self, kind: EntityKind) -> String {
        format!("{}{}", kind.tag(), Uuid::new_v4())
    }
}

/// Tag + milliseconds since the epoch + `_` + a random hex suffix.
///
/// Two calls in the same millisecond still differ through the suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockGenerator;

impl IdGenerator for ClockGenerator {
    fn generate(&mut self, kind: EntityKind) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("{}{}_{:x}", kind.tag(), millis, rand::random::<u64>())
    }
}

/// Deterministic `p1`, `p2`, `t1`, ... numbering, one counter per kind.
#[derive(Debug, Default, Clone)]
pub struct SequenceGenerator {
    projects: u64,
    tasks: u64,
    subtasks: u64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequenceGenerator {
    fn generate(&mut self, kind: EntityKind) -> String {
        let counter = match kind {
            EntityKind::Project => &mut self.projects,
            EntityKind::Task => &mut self.tasks,
            EntityKind::Subtask => &mut self.subtasks,
        };
        *counter += 1;
        format!("{}{}", kind.tag(), counter)
    }
}

/// Build the generator selected in board.toml
pub fn generator_for(kind: IdGeneratorKind) -> Box<dyn IdGenerator> {
    match kind {
        IdGeneratorKind::Uuid => Box::new(UuidGenerator),
        IdGeneratorKind::Clock => Box::new(ClockGenerator),
    }
}
