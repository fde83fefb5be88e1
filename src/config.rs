//! Typed configuration document.
//!
//! The in-memory form of the plan configuration: clients with their ordered
//! template lists, reusable process templates, global task definitions,
//! milestones, and an opaque start-day reference. Reading and writing the
//! document from disk (YAML in the reference deployment) belongs to an
//! external configuration layer; the core consumes only this parsed form.
//!
//! All durations and offsets are in hours. `start_day` is carried through
//! untouched; the core schedules in relative hours and leaves calendar
//! conversion to the renderer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{TaskKind, DEFAULT_PRIORITY};

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

/// Top-level plan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Reference instant (ISO date string), passed through opaquely.
    #[serde(default)]
    pub start_day: Option<String>,
    /// Clients, in the order their processes are built.
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
    /// Reusable templates: name → ordered task stubs.
    #[serde(default)]
    pub process_templates: HashMap<String, Vec<TaskStub>>,
    /// Global task definitions (standalone or template instantiations).
    #[serde(default)]
    pub global_tasks: Vec<GlobalTaskDef>,
    /// Named zero-duration milestones.
    #[serde(default)]
    pub milestones: Vec<MilestoneDef>,
}

impl PlanConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start day.
    pub fn with_start_day(mut self, day: impl Into<String>) -> Self {
        self.start_day = Some(day.into());
        self
    }

    /// Adds a client.
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.clients.push(client);
        self
    }

    /// Adds a template.
    pub fn with_template(mut self, name: impl Into<String>, stubs: Vec<TaskStub>) -> Self {
        self.process_templates.insert(name.into(), stubs);
        self
    }

    /// Adds a global task definition.
    pub fn with_global_task(mut self, def: GlobalTaskDef) -> Self {
        self.global_tasks.push(def);
        self
    }

    /// Adds a milestone.
    pub fn with_milestone(mut self, milestone: MilestoneDef) -> Self {
        self.milestones.push(milestone);
        self
    }
}

/// A client and the templates it instantiates, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client name; becomes the owner of its expanded tasks.
    pub name: String,
    /// Template names to instantiate, expanded strictly in this order.
    #[serde(default)]
    pub processes_order: Vec<String>,
}

impl ClientConfig {
    /// Creates a client with no templates.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processes_order: Vec::new(),
        }
    }

    /// Appends a template to the instantiation order.
    pub fn with_process(mut self, template: impl Into<String>) -> Self {
        self.processes_order.push(template.into());
        self
    }
}

/// One task stub inside a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStub {
    /// Short name, local to the template.
    pub name: String,
    /// Duration in hours.
    pub duration: f64,
    /// Task classification.
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Dedicated server name for automated stubs.
    #[serde(default)]
    pub server: Option<String>,
    /// Dependency tokens, resolved against the expansion scope.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Minimum start offset in hours.
    #[serde(default)]
    pub start_after: f64,
    /// Priority; falls back to the instantiation's priority, then 999.
    #[serde(default)]
    pub priority: Option<i32>,
}

impl TaskStub {
    /// Creates a stub with no server, dependencies, or overrides.
    pub fn new(name: impl Into<String>, duration: f64, kind: TaskKind) -> Self {
        Self {
            name: name.into(),
            duration,
            kind,
            server: None,
            dependencies: Vec::new(),
            start_after: 0.0,
            priority: None,
        }
    }

    /// Sets the dedicated server.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Adds a dependency token.
    pub fn with_dependency(mut self, token: impl Into<String>) -> Self {
        self.dependencies.push(token.into());
        self
    }

    /// Sets the minimum start offset.
    pub fn with_start_after(mut self, hours: f64) -> Self {
        self.start_after = hours;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A global task definition.
///
/// Either a standalone task (requires `name`; `duration` may fall back to
/// `duration_per_client × client count`) or an instantiation of a named
/// template (`template`, with an optional instance `name` and a priority
/// that seeds stubs lacking their own).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalTaskDef {
    /// Declared name. Required for standalone tasks; optional instance
    /// name for template instantiations.
    #[serde(default)]
    pub name: Option<String>,
    /// Template to instantiate, when present and known.
    #[serde(default)]
    pub template: Option<String>,
    /// Explicit duration in hours (standalone tasks).
    #[serde(default)]
    pub duration: Option<f64>,
    /// Per-client duration; effective duration is this times the client
    /// count when `duration` is absent.
    #[serde(default)]
    pub duration_per_client: Option<f64>,
    /// Task classification (standalone tasks). Defaults to manual.
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Dedicated server name (standalone tasks).
    #[serde(default)]
    pub server: Option<String>,
    /// Minimum start offset in hours (standalone tasks).
    #[serde(default)]
    pub start_after: f64,
    /// Priority, also the fallback for stub priorities when instantiating.
    #[serde(default)]
    pub priority: Option<i32>,
}

impl GlobalTaskDef {
    /// Creates a standalone global task.
    pub fn standalone(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a template instantiation.
    pub fn from_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// Sets the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the explicit duration.
    pub fn with_duration(mut self, hours: f64) -> Self {
        self.duration = Some(hours);
        self
    }

    /// Sets the per-client duration.
    pub fn with_duration_per_client(mut self, hours: f64) -> Self {
        self.duration_per_client = Some(hours);
        self
    }

    /// Sets the task classification.
    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the dedicated server.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Sets the minimum start offset.
    pub fn with_start_after(mut self, hours: f64) -> Self {
        self.start_after = hours;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A named milestone definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDef {
    /// Milestone name; referenced directly by dependency tokens.
    pub name: String,
    /// Minimum start offset in hours.
    #[serde(default)]
    pub start_after: f64,
    /// Priority (default 999).
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl MilestoneDef {
    /// Creates a milestone with default offset and priority.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_after: 0.0,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Sets the minimum start offset.
    pub fn with_start_after(mut self, hours: f64) -> Self {
        self.start_after = hours;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}
