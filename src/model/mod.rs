pub mod task;
pub mod project;
pub mod state;
pub mod snapshot;
pub mod config;

pub use task::*;
pub use project::*;
pub use state::*;
pub use snapshot::*;
pub use config::*;
