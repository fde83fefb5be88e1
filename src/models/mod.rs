//! Planning domain models.
//!
//! Core data types for template-driven project planning: tasks and their
//! dependency references, client/global process groupings, the mutable
//! people/server resource pool, and the committed schedule.
//!
//! Tasks and processes are created once by the graph builder and stay
//! immutable; schedule results are separate [`Assignment`] records, and
//! resource availability is owned by the scheduler for one run at a time.

mod process;
mod resource;
mod schedule;
mod task;

pub use process::Process;
pub use resource::{Person, ResourcePool};
pub use schedule::{Assignee, Assignment, Schedule};
pub use task::{Task, TaskId, TaskKind, DEFAULT_PRIORITY, GLOBAL_OWNER};
