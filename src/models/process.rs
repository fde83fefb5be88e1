//! Process model.
//!
//! A process is a named, ordered grouping of tasks: one per client, plus
//! a final "Global" group holding milestones and global tasks. Purely
//! organizational; the scheduler flattens processes in order to obtain its
//! deterministic task enumeration.

use serde::{Deserialize, Serialize};

use super::TaskId;

/// A named, ordered grouping of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// Client name, or "Global" for the synthetic global group.
    pub name: String,
    /// Member tasks in build order.
    pub tasks: Vec<TaskId>,
}

impl Process {
    /// Creates a process with the given members.
    pub fn new(name: impl Into<String>, tasks: Vec<TaskId>) -> Self {
        Self {
            name: name.into(),
            tasks,
        }
    }

    /// Number of member tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the process has no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process() {
        let p = Process::new("Acme", vec![TaskId(0), TaskId(1)]);
        assert_eq!(p.name, "Acme");
        assert_eq!(p.len(), 2);
        assert!(!p.is_empty());

        let empty = Process::new("Global", Vec::new());
        assert!(empty.is_empty());
    }
}
