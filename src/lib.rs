//! `taskboard` - a personal Projects → Tasks → Subtasks board.
//!
//! The interesting part is snapshot import: [`ops::normalize`] repairs an
//! exported document, [`ops::rekey`] and [`ops::merge`] reconcile it with the
//! live board without duplicating entities or letting identifiers collide.

pub mod board;
pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
