//! Greedy list scheduling and renderer hand-off.
//!
//! `ListScheduler` performs a single greedy pass over a built task graph:
//! one commit per iteration, ready tasks ranked by earliest feasible start
//! with a `priority - dependents` tie-break. It is not an optimizer:
//! no backtracking and no preemption, and nothing moves after commit.
//!
//! `PlanReport` flattens the committed schedule into rows for an external
//! renderer.

mod list;
mod report;

pub use list::{ListScheduler, ScheduleError};
pub use report::{PlanReport, ReportRow};
