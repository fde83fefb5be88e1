//! Template-driven project planning.
//!
//! Expands reusable process templates into a concrete, fully-named task
//! graph, per client and globally, with cross-namespace dependency
//! resolution, and computes a feasible, resource-constrained timeline
//! over a pool of interchangeable people and named dedicated servers.
//!
//! # Modules
//!
//! - **`config`**: Typed configuration document: clients, templates,
//!   global tasks, milestones, start day
//! - **`models`**: Domain types: `Task`, `Process`, `ResourcePool`,
//!   `Schedule`, `Assignment`
//! - **`graph`**: `GraphBuilder`, template expansion and dependency
//!   resolution into a validated `TaskGraph`
//! - **`validation`**: Structural graph checks (duplicate names, cycles)
//! - **`scheduler`**: `ListScheduler` (greedy list scheduling) and
//!   `PlanReport` for the renderer hand-off
//!
//! # Pipeline
//!
//! Configuration → `GraphBuilder` → `TaskGraph` → `ListScheduler` →
//! `Schedule` → `PlanReport` → external renderer. All core computation is
//! single-threaded, synchronous, and run-to-completion; each scheduling
//! run owns its copy of the resource pool, so independent runs cannot
//! interfere.
//!
//! All times are hours relative to the configured start day; converting
//! to absolute timestamps is the renderer's concern.

pub mod config;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod validation;
