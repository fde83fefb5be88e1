//! Renderer hand-off.
//!
//! Flattens a committed schedule into plain rows an external
//! reporter/renderer (console table, Gantt chart) can consume directly:
//! owner, task name, assignee identifier, start/end offsets in hours, and
//! priority. The `start_day` reference is carried through untouched;
//! converting offsets to absolute timestamps is the renderer's job.

use serde::Serialize;

use crate::graph::TaskGraph;
use crate::models::{Schedule, TaskKind};

/// One scheduled task, flattened for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Client name or "Global".
    pub owner: String,
    /// Fully-qualified task name.
    pub task: String,
    /// Task classification.
    pub kind: TaskKind,
    /// Assignee identifier ("Ana", "S1", "System", "Milestone").
    pub assigned_to: String,
    /// Start offset in hours since the start day.
    pub start_hours: f64,
    /// End offset in hours since the start day.
    pub end_hours: f64,
    /// Scheduling priority.
    pub priority: i32,
}

/// A complete plan report: rows in commit order plus the opaque start-day
/// reference.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    /// Reference instant the hour offsets are relative to, if configured.
    pub start_day: Option<String>,
    /// Rows in commit order.
    pub rows: Vec<ReportRow>,
}

impl PlanReport {
    /// Builds a report by joining the graph and a committed schedule.
    pub fn new(graph: &TaskGraph, schedule: &Schedule) -> Self {
        let rows = schedule
            .assignments
            .iter()
            .map(|assignment| {
                let task = graph.task(assignment.task);
                ReportRow {
                    owner: task.owner.clone(),
                    task: task.name.clone(),
                    kind: task.kind,
                    assigned_to: assignment.assignee.to_string(),
                    start_hours: assignment.start_hours,
                    end_hours: assignment.end_hours,
                    priority: task.priority,
                }
            })
            .collect();
        Self {
            start_day: None,
            rows,
        }
    }

    /// Attaches the start-day reference.
    pub fn with_start_day(mut self, day: impl Into<String>) -> Self {
        self.start_day = Some(day.into());
        self
    }

    /// Rows sorted chronologically by start offset.
    pub fn by_start(&self) -> Vec<&ReportRow> {
        let mut sorted: Vec<&ReportRow> = self.rows.iter().collect();
        sorted.sort_by(|a, b| {
            a.start_hours
                .partial_cmp(&b.start_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Rows belonging to one owner, in commit order.
    pub fn rows_for_owner(&self, owner: &str) -> Vec<&ReportRow> {
        self.rows.iter().filter(|r| r.owner == owner).collect()
    }

    /// Latest end offset across all rows (0.0 when empty).
    pub fn makespan_hours(&self) -> f64 {
        self.rows.iter().map(|r| r.end_hours).fold(0.0, f64::max)
    }
}
