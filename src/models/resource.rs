//! Resource pool model.
//!
//! Two kinds of capacity exist: an interchangeable pool of people (any
//! manual task may go to any person) and named dedicated servers that
//! serialize the automated tasks bound to them. Each carries a single piece
//! of state, the time it becomes available again.
//!
//! The pool is mutated only by the scheduler's commit step, on a copy it
//! owns for the duration of one run; callers keep their original untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A member of the interchangeable people pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Display name, used as the assignee identifier.
    pub name: String,
    /// Hours since the start day at which this person is next free.
    pub available_from: f64,
}

impl Person {
    /// Creates a person available from t=0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available_from: 0.0,
        }
    }

    /// Sets the initial availability.
    pub fn with_available_from(mut self, hours: f64) -> Self {
        self.available_from = hours;
        self
    }
}

/// Mutable availability state for people and dedicated servers.
///
/// Reads (`min_person_available`, `server_available`) are pure; commits
/// advance the chosen resource's availability. A server name that was never
/// registered reads as available from 0.0 and is materialized on first
/// commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    people: Vec<Person>,
    servers: HashMap<String, f64>,
}

impl ResourcePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a person available from t=0.
    pub fn with_person(mut self, name: impl Into<String>) -> Self {
        self.people.push(Person::new(name));
        self
    }

    /// Adds several people available from t=0.
    pub fn with_people<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.people.push(Person::new(name));
        }
        self
    }

    /// Registers a server with an initial availability.
    pub fn with_server(mut self, name: impl Into<String>, available_from: f64) -> Self {
        self.servers.insert(name.into(), available_from);
        self
    }

    /// The people pool.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Number of people in the pool.
    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Registered servers and their availability.
    pub fn servers(&self) -> &HashMap<String, f64> {
        &self.servers
    }

    /// Smallest `available_from` across the pool. `None` if the pool is empty.
    pub fn min_person_available(&self) -> Option<f64> {
        self.people
            .iter()
            .map(|p| p.available_from)
            .fold(None, |acc, t| match acc {
                None => Some(t),
                Some(m) => Some(m.min(t)),
            })
    }

    /// Index of the earliest-available person. Ties go to the person added
    /// first, keeping assignment deterministic.
    pub fn earliest_person(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, person) in self.people.iter().enumerate() {
            match best {
                None => best = Some(idx),
                Some(b) if person.available_from < self.people[b].available_from => {
                    best = Some(idx)
                }
                _ => {}
            }
        }
        best
    }

    /// Name of the person at `idx`.
    pub fn person_name(&self, idx: usize) -> &str {
        &self.people[idx].name
    }

    /// Availability of the person at `idx`.
    pub fn person_available(&self, idx: usize) -> f64 {
        self.people[idx].available_from
    }

    /// Advances the person at `idx` to be next free at `until`.
    pub fn commit_person(&mut self, idx: usize, until: f64) {
        self.people[idx].available_from = until;
    }

    /// Availability of a named server; unknown names read as 0.0.
    pub fn server_available(&self, name: &str) -> f64 {
        self.servers.get(name).copied().unwrap_or(0.0)
    }

    /// Advances (and if needed creates) a named server to be free at `until`.
    pub fn commit_server(&mut self, name: &str, until: f64) {
        self.servers.insert(name.to_string(), until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person() {
        let p = Person::new("Ana");
        assert_eq!(p.name, "Ana");
        assert!((p.available_from - 0.0).abs() < 1e-12);

        let late = Person::new("Luis").with_available_from(8.0);
        assert!((late.available_from - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_earliest_person_tie_goes_first() {
        let pool = ResourcePool::new().with_people(["Ana", "Luis"]);
        assert_eq!(pool.earliest_person(), Some(0));
        assert_eq!(pool.person_name(0), "Ana");
    }

    #[test]
    fn test_earliest_person_after_commit() {
        let mut pool = ResourcePool::new().with_people(["Ana", "Luis"]);
        pool.commit_person(0, 2.0);
        assert_eq!(pool.earliest_person(), Some(1));
        assert_eq!(pool.min_person_available(), Some(0.0));
    }

    #[test]
    fn test_empty_pool() {
        let pool = ResourcePool::new();
        assert_eq!(pool.earliest_person(), None);
        assert_eq!(pool.min_person_available(), None);
        assert_eq!(pool.person_count(), 0);
    }

    #[test]
    fn test_unknown_server_reads_zero() {
        let pool = ResourcePool::new();
        assert!((pool.server_available("S1") - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_server_commit_materializes() {
        let mut pool = ResourcePool::new();
        pool.commit_server("S1", 3.0);
        assert!((pool.server_available("S1") - 3.0).abs() < 1e-12);
        assert!(pool.servers().contains_key("S1"));
    }

    #[test]
    fn test_registered_server() {
        let pool = ResourcePool::new().with_server("S1", 5.0);
        assert!((pool.server_available("S1") - 5.0).abs() < 1e-12);
    }
}
