//! Schedule (solution) model.
//!
//! A schedule is the committed output of one scheduling run: one
//! [`Assignment`] per task, appended in commit order. Commit order is a
//! valid topological order of the dependency graph but is not guaranteed
//! to be chronological; use [`Schedule::by_start`] for a time-sorted view.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskId;

/// Who (or what) a committed task was assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assignee {
    /// A person from the interchangeable pool.
    Person(String),
    /// A named dedicated server.
    Server(String),
    /// Unconstrained automated work with no dedicated server.
    System,
    /// Milestone marker; no resource consumed.
    Milestone,
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignee::Person(name) | Assignee::Server(name) => f.write_str(name),
            Assignee::System => f.write_str("System"),
            Assignee::Milestone => f.write_str("Milestone"),
        }
    }
}

/// A committed task: assignee plus start/end offsets in hours.
///
/// Written exactly once, at commit time. `end_hours == start_hours +
/// duration` for manual and automated tasks; `end_hours == start_hours`
/// for milestones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// The committed task.
    pub task: TaskId,
    /// Resource the task was committed to.
    pub assignee: Assignee,
    /// Start offset in hours since the start day.
    pub start_hours: f64,
    /// End offset in hours since the start day.
    pub end_hours: f64,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(task: TaskId, assignee: Assignee, start_hours: f64, end_hours: f64) -> Self {
        Self {
            task,
            assignee,
            start_hours,
            end_hours,
        }
    }

    /// Occupied span (end - start) in hours.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.end_hours - self.start_hours
    }
}

/// A complete schedule: assignments in commit order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in the order tasks were committed.
    pub assignments: Vec<Assignment>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of committed tasks.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Latest end offset across all assignments (0.0 when empty).
    pub fn makespan_hours(&self) -> f64 {
        self.assignments
            .iter()
            .map(|a| a.end_hours)
            .fold(0.0, f64::max)
    }

    /// The assignment for a given task, if committed.
    pub fn assignment_for(&self, task: TaskId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.task == task)
    }

    /// All assignments committed to a given assignee.
    pub fn assignments_for(&self, assignee: &Assignee) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| &a.assignee == assignee)
            .collect()
    }

    /// Assignments sorted by start offset. Commit order is preserved among
    /// equal starts.
    pub fn by_start(&self) -> Vec<&Assignment> {
        let mut sorted: Vec<&Assignment> = self.assignments.iter().collect();
        sorted.sort_by(|a, b| {
            a.start_hours
                .partial_cmp(&b.start_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }
}
