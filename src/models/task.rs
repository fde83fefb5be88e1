//! Task model.
//!
//! A task is the unit of scheduled work: a named piece of manual or
//! automated effort, or a zero-duration milestone. Tasks are created once
//! by the graph builder and never change afterwards; schedule results live
//! in [`Assignment`](super::Assignment) records, not on the task itself.
//!
//! # Time Representation
//! All times are in hours relative to the plan's start day (t=0).
//! The consumer defines what the start day means.

use serde::{Deserialize, Serialize};

/// Priority sentinel for tasks with no explicit priority.
///
/// Smaller numbers are more urgent; 1 is the highest priority.
pub const DEFAULT_PRIORITY: i32 = 999;

/// Owner label for milestones and global tasks.
pub const GLOBAL_OWNER: &str = "Global";

/// Stable reference to a task in a [`TaskGraph`](crate::graph::TaskGraph) arena.
///
/// Dependencies are stored as `TaskId`s rather than direct references, so
/// the dependency relation stays an index graph over the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// Position of the task in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Task classification.
///
/// Determines how the scheduler sources a resource for the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Performed by a person from the interchangeable pool.
    #[default]
    Manual,
    /// Runs on a named server, or unconstrained when no server is named.
    Automated,
    /// Zero-duration synchronization point.
    Milestone,
}

impl TaskKind {
    /// Lowercase label, matching the configuration document.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Manual => "manual",
            TaskKind::Automated => "automated",
            TaskKind::Milestone => "milestone",
        }
    }
}

/// A work item in the task graph.
///
/// The `name` is fully qualified (`Client::Template::Task`, `Global::Name`,
/// or a bare milestone name) and unique across the whole graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Fully-qualified, graph-unique name.
    pub name: String,
    /// Duration in hours. Zero for milestones.
    pub duration: f64,
    /// Task classification.
    pub kind: TaskKind,
    /// Client name, or [`GLOBAL_OWNER`] for milestones and global tasks.
    pub owner: String,
    /// Dedicated server name. Only meaningful for automated tasks.
    pub server: Option<String>,
    /// Tasks that must complete before this one starts. No self-references,
    /// no duplicates.
    pub dependencies: Vec<TaskId>,
    /// Floor offset in hours before which the task may not begin.
    pub min_start: f64,
    /// Scheduling priority (smaller = more urgent).
    pub priority: i32,
}

impl Task {
    /// Creates a new task with default floor, priority, and no dependencies.
    pub fn new(
        name: impl Into<String>,
        duration: f64,
        kind: TaskKind,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            duration,
            kind,
            owner: owner.into(),
            server: None,
            dependencies: Vec::new(),
            min_start: 0.0,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Creates a zero-duration milestone owned by the global group.
    pub fn milestone(name: impl Into<String>) -> Self {
        Self::new(name, 0.0, TaskKind::Milestone, GLOBAL_OWNER)
    }

    /// Sets the dedicated server name.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the minimum start offset (hours).
    pub fn with_min_start(mut self, min_start: f64) -> Self {
        self.min_start = min_start;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this task is a milestone.
    #[inline]
    pub fn is_milestone(&self) -> bool {
        self.kind == TaskKind::Milestone
    }
}
