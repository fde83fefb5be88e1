//! Structural validation of a built task graph.
//!
//! Checks the invariants the builder must uphold before a graph is handed
//! to the scheduler:
//! - Fully-qualified task names are unique across the whole graph
//! - The dependency relation is acyclic (DFS back-edge detection)
//!
//! All findings are collected and returned together.

use std::collections::HashSet;

use crate::graph::TaskGraph;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same fully-qualified name.
    DuplicateName,
    /// The dependency relation contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a built task graph.
///
/// Checks:
/// 1. No duplicate fully-qualified task names
/// 2. No dependency cycles
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_graph(graph: &TaskGraph) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for task in graph.tasks() {
        if !names.insert(task.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate task name: {}", task.name),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(graph) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency relation using DFS.
///
/// # Algorithm
/// Depth-first traversal over dependency edges. If a back-edge is found
/// (visiting a task currently on the recursion stack), a cycle exists.
fn detect_cycles(graph: &TaskGraph) -> Option<ValidationError> {
    let n = graph.tasks().len();
    let mut visited = vec![false; n];
    let mut in_stack = vec![false; n];

    for start in 0..n {
        if !visited[start] && has_cycle_dfs(graph, start, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!(
                    "Circular dependency detected involving task '{}'",
                    graph.tasks()[start].name
                ),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    graph: &TaskGraph,
    node: usize,
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    for dep in &graph.tasks()[node].dependencies {
        let next = dep.index();
        if in_stack[next] {
            return true; // Back edge → cycle
        }
        if !visited[next] && has_cycle_dfs(graph, next, visited, in_stack) {
            return true;
        }
    }

    in_stack[node] = false;
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, PlanConfig, TaskStub};
    use crate::graph::GraphBuilder;
    use crate::models::TaskKind;

    fn chain_config() -> PlanConfig {
        PlanConfig::new()
            .with_template(
                "Chain",
                vec![
                    TaskStub::new("A", 1.0, TaskKind::Manual),
                    TaskStub::new("B", 1.0, TaskKind::Manual).with_dependency("A"),
                    TaskStub::new("C", 1.0, TaskKind::Manual).with_dependency("B"),
                ],
            )
            .with_client(ClientConfig::new("Acme").with_process("Chain"))
    }

    #[test]
    fn test_valid_graph() {
        let graph = GraphBuilder::new(&chain_config()).build().unwrap();
        assert!(validate_graph(&graph).is_ok());
    }

    #[test]
    fn test_cycle_detected() {
        // Bypass the builder's own validation by wiring a cycle directly.
        let mut graph = crate::graph::TaskGraph::new();
        let a = graph.push_task(crate::models::Task::new("A", 1.0, TaskKind::Manual, "X"));
        let b = graph.push_task(crate::models::Task::new("B", 1.0, TaskKind::Manual, "X"));
        let c = graph.push_task(crate::models::Task::new("C", 1.0, TaskKind::Manual, "X"));
        graph.add_dependency(a, c);
        graph.add_dependency(b, a);
        graph.add_dependency(c, b);

        let errors = validate_graph(&graph).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut graph = crate::graph::TaskGraph::new();
        let a = graph.push_task(crate::models::Task::new("A", 1.0, TaskKind::Manual, "X"));
        graph.add_dependency(a, a);

        let errors = validate_graph(&graph).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CyclicDependency));
    }

    #[test]
    fn test_duplicate_names() {
        let mut graph = crate::graph::TaskGraph::new();
        graph.push_task(crate::models::Task::new("A", 1.0, TaskKind::Manual, "X"));
        graph.push_task(crate::models::Task::new("A", 2.0, TaskKind::Manual, "Y"));

        let errors = validate_graph(&graph).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateName
                && e.message.contains("A")));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut graph = crate::graph::TaskGraph::new();
        let a = graph.push_task(crate::models::Task::new("A", 1.0, TaskKind::Manual, "X"));
        let b = graph.push_task(crate::models::Task::new("B", 1.0, TaskKind::Manual, "X"));
        let c = graph.push_task(crate::models::Task::new("C", 1.0, TaskKind::Manual, "X"));
        let d = graph.push_task(crate::models::Task::new("D", 1.0, TaskKind::Manual, "X"));
        graph.add_dependency(b, a);
        graph.add_dependency(c, a);
        graph.add_dependency(d, b);
        graph.add_dependency(d, c);

        assert!(validate_graph(&graph).is_ok());
    }

    #[test]
    fn test_empty_graph_is_valid() {
        assert!(validate_graph(&crate::graph::TaskGraph::new()).is_ok());
    }
}
