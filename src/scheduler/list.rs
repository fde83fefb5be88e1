//! Greedy list scheduler.
//!
//! # Algorithm
//!
//! 1. Precompute each task's graph-wide dependents count.
//! 2. Loop until every task is committed: collect the ready set (all
//!    dependencies committed), compute a tentative earliest feasible start
//!    per ready task, pick the minimum (1e-9 tolerance), and break ties by
//!    `priority - dependents_count` ascending, then by enumeration order.
//! 3. Commit the chosen task, recomputing its start against current
//!    resource state, and advance the assigned resource's availability.
//!
//! Exactly one task commits per iteration; an empty ready set with tasks
//! remaining is a fatal cycle/dangling-reference error. The run operates
//! on an owned copy of the resource pool, so callers' state is untouched
//! and concurrent runs cannot interfere.
//!
//! # Complexity
//! O(n²·d) where n = tasks and d = mean dependency count.

use thiserror::Error;
use tracing::debug;

use crate::graph::TaskGraph;
use crate::models::{Assignee, Assignment, ResourcePool, Schedule, Task, TaskId, TaskKind};

/// Tolerance for treating near-equal start times as tied.
const EPSILON: f64 = 1e-9;

/// Fatal scheduling errors.
///
/// Both kinds are configuration-correctness failures; no partial schedule
/// is returned.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Tasks remain but none is ready: the dependency relation has a cycle
    /// or references a task that never entered the graph.
    #[error("no ready tasks but {remaining} remain unscheduled (dependency cycle or dangling reference)")]
    CyclicOrUnresolvable {
        /// How many tasks were still uncommitted.
        remaining: usize,
    },

    /// A manual task cannot be assigned because the people pool is empty.
    #[error("manual task '{task}' cannot be scheduled: the people pool is empty")]
    EmptyPeoplePool {
        /// Fully-qualified name of the stranded task.
        task: String,
    },
}

/// Greedy list scheduler over a built task graph and a resource pool.
///
/// # Example
///
/// ```
/// use planline::config::{ClientConfig, PlanConfig, TaskStub};
/// use planline::graph::GraphBuilder;
/// use planline::models::{ResourcePool, TaskKind};
/// use planline::scheduler::ListScheduler;
///
/// let config = PlanConfig::new()
///     .with_template(
///         "Setup",
///         vec![TaskStub::new("Install", 4.0, TaskKind::Manual)],
///     )
///     .with_client(ClientConfig::new("Acme").with_process("Setup"));
/// let graph = GraphBuilder::new(&config).build().unwrap();
/// let pool = ResourcePool::new().with_person("Ana");
///
/// let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();
/// assert_eq!(schedule.len(), 1);
/// assert!((schedule.makespan_hours() - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListScheduler;

impl ListScheduler {
    /// Creates a new scheduler.
    pub fn new() -> Self {
        Self
    }

    /// Schedules every task in the graph, returning assignments in commit
    /// order.
    ///
    /// The pool is cloned into run-local state; the caller's copy is never
    /// mutated. Commit order is a valid topological order but not
    /// necessarily chronological; sort by start explicitly when a
    /// chronological view is needed.
    pub fn schedule(
        &self,
        graph: &TaskGraph,
        pool: &ResourcePool,
    ) -> Result<Schedule, ScheduleError> {
        let mut pool = pool.clone();
        let order = graph.enumeration();
        let dependents = graph.dependents_count();

        let mut end_time: Vec<Option<f64>> = vec![None; graph.len()];
        let mut done = vec![false; graph.len()];
        let mut schedule = Schedule::new();

        while schedule.len() < order.len() {
            // Ready set, in enumeration order.
            let mut ready: Vec<(TaskId, f64)> = Vec::new();
            for &id in &order {
                if done[id.index()] {
                    continue;
                }
                let task = graph.task(id);
                if task.dependencies.iter().any(|d| !done[d.index()]) {
                    continue;
                }
                let logical = logical_earliest(task, &end_time);
                let eff_start = match task.kind {
                    TaskKind::Manual => {
                        logical.max(pool.min_person_available().unwrap_or(f64::INFINITY))
                    }
                    TaskKind::Automated => match &task.server {
                        Some(server) => logical.max(pool.server_available(server)),
                        None => logical,
                    },
                    TaskKind::Milestone => logical,
                };
                ready.push((id, eff_start));
            }

            if ready.is_empty() {
                return Err(ScheduleError::CyclicOrUnresolvable {
                    remaining: order.len() - schedule.len(),
                });
            }

            // Minimal tentative start, then score tie-break; enumeration
            // order settles remaining ties (first strict improvement wins).
            let min_start = ready.iter().fold(f64::INFINITY, |m, &(_, s)| m.min(s));
            let mut chosen = None;
            let mut best_score = i64::MAX;
            for &(id, start) in &ready {
                if (start - min_start).abs() >= EPSILON {
                    continue;
                }
                let score = graph.task(id).priority as i64 - dependents[id.index()] as i64;
                if score < best_score {
                    best_score = score;
                    chosen = Some(id);
                }
            }
            let id = chosen.unwrap_or(ready[0].0);

            // Commit: recompute the start against current resource state;
            // availability may have advanced since the tentative pass.
            let task = graph.task(id);
            let start = logical_earliest(task, &end_time);
            let assignment = match task.kind {
                TaskKind::Manual => {
                    let person = pool
                        .earliest_person()
                        .ok_or_else(|| ScheduleError::EmptyPeoplePool {
                            task: task.name.clone(),
                        })?;
                    let start = start.max(pool.person_available(person));
                    let end = start + task.duration;
                    let name = pool.person_name(person).to_string();
                    pool.commit_person(person, end);
                    Assignment::new(id, Assignee::Person(name), start, end)
                }
                TaskKind::Automated => match &task.server {
                    Some(server) => {
                        let start = start.max(pool.server_available(server));
                        let end = start + task.duration;
                        pool.commit_server(server, end);
                        Assignment::new(id, Assignee::Server(server.clone()), start, end)
                    }
                    None => Assignment::new(id, Assignee::System, start, start + task.duration),
                },
                TaskKind::Milestone => Assignment::new(id, Assignee::Milestone, start, start),
            };

            debug!(
                task = %task.name,
                assignee = %assignment.assignee,
                start = assignment.start_hours,
                end = assignment.end_hours,
                "committed task"
            );
            end_time[id.index()] = Some(assignment.end_hours);
            done[id.index()] = true;
            schedule.add_assignment(assignment);
        }

        Ok(schedule)
    }
}

/// Dependency floor and `min_start`, ignoring resource availability.
fn logical_earliest(task: &Task, end_time: &[Option<f64>]) -> f64 {
    let deps_end = task
        .dependencies
        .iter()
        .filter_map(|d| end_time[d.index()])
        .fold(0.0, f64::max);
    deps_end.max(task.min_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, GlobalTaskDef, MilestoneDef, PlanConfig, TaskStub};
    use crate::graph::{GraphBuilder, TaskGraph};
    use crate::models::Task;

    fn onboarding_config() -> PlanConfig {
        PlanConfig::new()
            .with_template(
                "Onboarding",
                vec![
                    TaskStub::new("A", 2.0, TaskKind::Manual).with_priority(1),
                    TaskStub::new("B", 1.0, TaskKind::Automated)
                        .with_server("S1")
                        .with_dependency("A"),
                ],
            )
            .with_client(ClientConfig::new("Client1").with_process("Onboarding"))
            .with_client(ClientConfig::new("Client2").with_process("Onboarding"))
    }

    fn assignment_by_name<'a>(
        graph: &TaskGraph,
        schedule: &'a Schedule,
        name: &str,
    ) -> &'a Assignment {
        let id = graph.task_by_name(name).unwrap();
        schedule.assignment_for(id).unwrap()
    }

    #[test]
    fn test_two_clients_share_pool_and_server() {
        let graph = GraphBuilder::new(&onboarding_config()).build().unwrap();
        let pool = ResourcePool::new()
            .with_people(["Ana", "Luis"])
            .with_server("S1", 0.0);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        let a1 = assignment_by_name(&graph, &schedule, "Client1::Onboarding::A");
        assert_eq!(a1.assignee, Assignee::Person("Ana".into()));
        assert!((a1.start_hours - 0.0).abs() < 1e-9);
        assert!((a1.end_hours - 2.0).abs() < 1e-9);

        let a2 = assignment_by_name(&graph, &schedule, "Client2::Onboarding::A");
        assert_eq!(a2.assignee, Assignee::Person("Luis".into()));
        assert!((a2.start_hours - 0.0).abs() < 1e-9);
        assert!((a2.end_hours - 2.0).abs() < 1e-9);

        // Both B tasks become ready at t=2 and serialize on S1.
        let b1 = assignment_by_name(&graph, &schedule, "Client1::Onboarding::B");
        assert_eq!(b1.assignee, Assignee::Server("S1".into()));
        assert!((b1.start_hours - 2.0).abs() < 1e-9);
        assert!((b1.end_hours - 3.0).abs() < 1e-9);

        let b2 = assignment_by_name(&graph, &schedule, "Client2::Onboarding::B");
        assert_eq!(b2.assignee, Assignee::Server("S1".into()));
        assert!((b2.start_hours - 3.0).abs() < 1e-9);
        assert!((b2.end_hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_graph_schedules_empty() {
        let graph = GraphBuilder::new(&PlanConfig::new()).build().unwrap();
        let pool = ResourcePool::new().with_person("Ana");
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();
        assert!(schedule.is_empty());
        // The caller's pool is untouched.
        assert_eq!(pool.min_person_available(), Some(0.0));
    }

    #[test]
    fn test_milestone_zero_duration_and_floor() {
        let config = PlanConfig::new()
            .with_milestone(MilestoneDef::new("GoLive").with_start_after(40.0))
            .with_template(
                "Launch",
                vec![TaskStub::new("Announce", 1.0, TaskKind::Manual).with_dependency("GoLive")],
            )
            .with_client(ClientConfig::new("Acme").with_process("Launch"));
        let graph = GraphBuilder::new(&config).build().unwrap();
        let pool = ResourcePool::new().with_person("Ana");
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        let go_live = assignment_by_name(&graph, &schedule, "GoLive");
        assert_eq!(go_live.assignee, Assignee::Milestone);
        assert!((go_live.start_hours - 40.0).abs() < 1e-9);
        assert!((go_live.end_hours - go_live.start_hours).abs() < 1e-9);

        let announce = assignment_by_name(&graph, &schedule, "Acme::Launch::Announce");
        assert!(announce.start_hours >= 40.0);
    }

    #[test]
    fn test_unconstrained_automated_overlap() {
        let config = PlanConfig::new()
            .with_global_task(
                GlobalTaskDef::standalone("Sync1")
                    .with_kind(TaskKind::Automated)
                    .with_duration(3.0),
            )
            .with_global_task(
                GlobalTaskDef::standalone("Sync2")
                    .with_kind(TaskKind::Automated)
                    .with_duration(2.0),
            );
        let graph = GraphBuilder::new(&config).build().unwrap();
        let schedule = ListScheduler::new()
            .schedule(&graph, &ResourcePool::new())
            .unwrap();

        let s1 = assignment_by_name(&graph, &schedule, "Global::Sync1");
        let s2 = assignment_by_name(&graph, &schedule, "Global::Sync2");
        assert_eq!(s1.assignee, Assignee::System);
        assert_eq!(s2.assignee, Assignee::System);
        // No serialization: both start at the same effective time.
        assert!((s1.start_hours - s2.start_hours).abs() < 1e-9);
    }

    #[test]
    fn test_priority_breaks_start_ties() {
        let config = PlanConfig::new()
            .with_template(
                "Work",
                vec![
                    TaskStub::new("Low", 1.0, TaskKind::Manual).with_priority(10),
                    TaskStub::new("High", 1.0, TaskKind::Manual).with_priority(1),
                ],
            )
            .with_client(ClientConfig::new("Acme").with_process("Work"));
        let graph = GraphBuilder::new(&config).build().unwrap();
        let pool = ResourcePool::new().with_person("Ana");
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        // One person: the high-priority task must commit (and run) first.
        let high = assignment_by_name(&graph, &schedule, "Acme::Work::High");
        let low = assignment_by_name(&graph, &schedule, "Acme::Work::Low");
        assert!((high.start_hours - 0.0).abs() < 1e-9);
        assert!(low.start_hours >= high.end_hours);
    }

    #[test]
    fn test_dependents_count_breaks_priority_ties() {
        // Same priority: "Hub" unblocks two downstream tasks, "Leaf" none,
        // so score = priority - dependents favors Hub.
        let config = PlanConfig::new()
            .with_template(
                "Work",
                vec![
                    TaskStub::new("Leaf", 1.0, TaskKind::Manual),
                    TaskStub::new("Hub", 1.0, TaskKind::Manual),
                    TaskStub::new("After1", 1.0, TaskKind::Manual).with_dependency("Hub"),
                    TaskStub::new("After2", 1.0, TaskKind::Manual).with_dependency("Hub"),
                ],
            )
            .with_client(ClientConfig::new("Acme").with_process("Work"));
        let graph = GraphBuilder::new(&config).build().unwrap();
        let pool = ResourcePool::new().with_person("Ana");
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        let hub = assignment_by_name(&graph, &schedule, "Acme::Work::Hub");
        let leaf = assignment_by_name(&graph, &schedule, "Acme::Work::Leaf");
        assert!((hub.start_hours - 0.0).abs() < 1e-9);
        assert!(leaf.start_hours >= hub.end_hours);
    }

    #[test]
    fn test_enumeration_order_settles_full_ties() {
        let graph = GraphBuilder::new(&onboarding_config()).build().unwrap();
        let pool = ResourcePool::new()
            .with_people(["Ana", "Luis"])
            .with_server("S1", 0.0);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        // Client1's A ties with Client2's A on start and score; the first
        // enumerated (Client1, declared first) commits first.
        let first = graph.task(schedule.assignments[0].task);
        assert_eq!(first.name, "Client1::Onboarding::A");
    }

    #[test]
    fn test_commit_order_is_topological() {
        let graph = GraphBuilder::new(&onboarding_config()).build().unwrap();
        let pool = ResourcePool::new()
            .with_people(["Ana", "Luis"])
            .with_server("S1", 0.0);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        let mut committed = vec![false; graph.len()];
        for assignment in &schedule.assignments {
            let task = graph.task(assignment.task);
            for dep in &task.dependencies {
                assert!(committed[dep.index()], "dependency committed later");
                let dep_end = schedule.assignment_for(*dep).unwrap().end_hours;
                assert!(dep_end <= assignment.start_hours + 1e-9);
            }
            committed[assignment.task.index()] = true;
        }
    }

    #[test]
    fn test_schedule_invariants() {
        let graph = GraphBuilder::new(&onboarding_config()).build().unwrap();
        let pool = ResourcePool::new()
            .with_people(["Ana", "Luis"])
            .with_server("S1", 0.0);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        for assignment in &schedule.assignments {
            let task = graph.task(assignment.task);
            assert!(assignment.start_hours <= assignment.end_hours);
            let expected = if task.is_milestone() { 0.0 } else { task.duration };
            assert!((assignment.duration_hours() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_person_overlap() {
        // Six one-person-at-a-time tasks over a two-person pool.
        let stubs: Vec<TaskStub> = (0..6)
            .map(|i| TaskStub::new(format!("T{i}"), 1.5, TaskKind::Manual))
            .collect();
        let config = PlanConfig::new()
            .with_template("Bulk", stubs)
            .with_client(ClientConfig::new("Acme").with_process("Bulk"));
        let graph = GraphBuilder::new(&config).build().unwrap();
        let pool = ResourcePool::new().with_people(["Ana", "Luis"]);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        for person in ["Ana", "Luis"] {
            let assignee = Assignee::Person(person.into());
            let mut intervals: Vec<(f64, f64)> = schedule
                .assignments_for(&assignee)
                .iter()
                .map(|a| (a.start_hours, a.end_hours))
                .collect();
            intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
            for pair in intervals.windows(2) {
                assert!(pair[0].1 <= pair[1].0 + 1e-9, "{person} double-booked");
            }
        }
    }

    #[test]
    fn test_no_server_overlap() {
        let stubs: Vec<TaskStub> = (0..4)
            .map(|i| TaskStub::new(format!("Job{i}"), 2.0, TaskKind::Automated).with_server("S1"))
            .collect();
        let config = PlanConfig::new()
            .with_template("Batch", stubs)
            .with_client(ClientConfig::new("Acme").with_process("Batch"));
        let graph = GraphBuilder::new(&config).build().unwrap();
        let schedule = ListScheduler::new()
            .schedule(&graph, &ResourcePool::new())
            .unwrap();

        let mut intervals: Vec<(f64, f64)> = schedule
            .assignments_for(&Assignee::Server("S1".into()))
            .iter()
            .map(|a| (a.start_hours, a.end_hours))
            .collect();
        assert_eq!(intervals.len(), 4);
        intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        for pair in intervals.windows(2) {
            assert!(pair[0].1 <= pair[1].0 + 1e-9, "S1 double-booked");
        }
    }

    #[test]
    fn test_cycle_fails_before_any_commit() {
        // Wired directly; the builder would reject this at build time.
        let mut graph = TaskGraph::new();
        let a = graph.push_task(Task::new("A", 1.0, TaskKind::Manual, "X"));
        let b = graph.push_task(Task::new("B", 1.0, TaskKind::Manual, "X"));
        graph.add_dependency(a, b);
        graph.add_dependency(b, a);

        let pool = ResourcePool::new().with_person("Ana");
        let err = ListScheduler::new().schedule(&graph, &pool).unwrap_err();
        match err {
            ScheduleError::CyclicOrUnresolvable { remaining } => assert_eq!(remaining, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_manual_task_with_empty_pool_fails() {
        let config = PlanConfig::new()
            .with_template(
                "Work",
                vec![TaskStub::new("Solo", 1.0, TaskKind::Manual)],
            )
            .with_client(ClientConfig::new("Acme").with_process("Work"));
        let graph = GraphBuilder::new(&config).build().unwrap();

        let err = ListScheduler::new()
            .schedule(&graph, &ResourcePool::new())
            .unwrap_err();
        match err {
            ScheduleError::EmptyPeoplePool { task } => {
                assert_eq!(task, "Acme::Work::Solo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_min_start_floor_respected() {
        let config = PlanConfig::new()
            .with_template(
                "Late",
                vec![TaskStub::new("Deferred", 1.0, TaskKind::Manual).with_start_after(8.0)],
            )
            .with_client(ClientConfig::new("Acme").with_process("Late"));
        let graph = GraphBuilder::new(&config).build().unwrap();
        let pool = ResourcePool::new().with_person("Ana");
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        let a = assignment_by_name(&graph, &schedule, "Acme::Late::Deferred");
        assert!((a.start_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_server_initial_availability_clamps_start() {
        let config = PlanConfig::new().with_global_task(
            GlobalTaskDef::standalone("Job")
                .with_kind(TaskKind::Automated)
                .with_server("S1")
                .with_duration(1.0),
        );
        let graph = GraphBuilder::new(&config).build().unwrap();
        let pool = ResourcePool::new().with_server("S1", 5.0);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();

        let id = graph.task_by_name("Global::Job").unwrap();
        let a = schedule.assignment_for(id).unwrap();
        assert!((a.start_hours - 5.0).abs() < 1e-9);
        assert!((a.end_hours - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_server_starts_at_zero() {
        let config = PlanConfig::new().with_global_task(
            GlobalTaskDef::standalone("Job")
                .with_kind(TaskKind::Automated)
                .with_server("Mystery")
                .with_duration(1.0),
        );
        let graph = GraphBuilder::new(&config).build().unwrap();
        let schedule = ListScheduler::new()
            .schedule(&graph, &ResourcePool::new())
            .unwrap();

        let id = graph.task_by_name("Global::Job").unwrap();
        assert!((schedule.assignment_for(id).unwrap().start_hours - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_caller_pool_not_mutated() {
        let graph = GraphBuilder::new(&onboarding_config()).build().unwrap();
        let pool = ResourcePool::new()
            .with_people(["Ana", "Luis"])
            .with_server("S1", 0.0);
        let _ = ListScheduler::new().schedule(&graph, &pool).unwrap();

        assert_eq!(pool.min_person_available(), Some(0.0));
        assert!((pool.server_available("S1") - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_iteration_bound_one_commit_each() {
        let graph = GraphBuilder::new(&onboarding_config()).build().unwrap();
        let pool = ResourcePool::new().with_people(["Ana", "Luis"]);
        let schedule = ListScheduler::new().schedule(&graph, &pool).unwrap();
        assert_eq!(schedule.len(), graph.len());

        // Each task appears exactly once.
        let mut seen = vec![false; graph.len()];
        for a in &schedule.assignments {
            assert!(!seen[a.task.index()]);
            seen[a.task.index()] = true;
        }
        assert_eq!(seen, vec![true; graph.len()]);
    }
}
