//! Template expansion and dependency wiring.
//!
//! Expansion order: milestones, then global task definitions, then each
//! client's templates strictly in the client's declared order. A template
//! instantiated later can never be seen by a dependency token in an
//! earlier one. Any failure aborts the whole build; no partial graph is
//! returned.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::debug;

use super::resolver::{ClientScope, GlobalScope, ResolutionScope};
use super::TaskGraph;
use crate::config::{PlanConfig, TaskStub};
use crate::models::{Process, Task, TaskId, DEFAULT_PRIORITY, GLOBAL_OWNER};
use crate::validation::{self, ValidationError};

/// Fatal graph-construction errors.
///
/// These are configuration-correctness errors, not transient faults; the
/// caller gets no graph on failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A client references a template absent from the template collection.
    #[error("template '{template}' not found for client '{client}'")]
    MissingTemplate {
        /// The missing template name.
        template: String,
        /// The client whose order referenced it.
        client: String,
    },

    /// A dependency token matched no resolution rule.
    #[error("dependency '{token}' cannot be resolved for task '{task}' (owner '{owner}')")]
    UnresolvedDependency {
        /// The offending token.
        token: String,
        /// Fully-qualified name of the task carrying the token.
        task: String,
        /// Owning client, or "Global".
        owner: String,
    },

    /// A standalone global task definition carries no name.
    #[error("global task at position {index} has neither a name nor a known template")]
    UnnamedGlobalTask {
        /// Position in the `global_tasks` collection.
        index: usize,
    },

    /// The wired graph failed structural validation (duplicate names or a
    /// dependency cycle).
    #[error("task graph failed validation with {} error(s)", .0.len())]
    InvalidGraph(Vec<ValidationError>),
}

/// Expands a [`PlanConfig`] into a validated [`TaskGraph`].
pub struct GraphBuilder<'a> {
    config: &'a PlanConfig,
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder over a configuration document.
    pub fn new(config: &'a PlanConfig) -> Self {
        Self { config }
    }

    /// Builds the task graph: milestones, global tasks, per-client
    /// template chains, and the process groupings (clients first, the
    /// synthetic "Global" group last).
    pub fn build(self) -> Result<TaskGraph, BuildError> {
        let mut graph = TaskGraph::new();

        // Milestones first; every later scope can reference them.
        let mut milestones: HashMap<String, TaskId> = HashMap::new();
        let mut global_members: Vec<TaskId> = Vec::new();
        for m in &self.config.milestones {
            let task = Task::milestone(&m.name)
                .with_min_start(m.start_after)
                .with_priority(m.priority);
            let id = graph.push_task(task);
            milestones.insert(m.name.clone(), id);
            global_members.push(id);
        }
        debug!(milestones = milestones.len(), "expanded milestones");

        // Global tasks: template instantiations and standalone tasks. The
        // last task of each instantiated template is retained for the
        // resolver's global fallbacks.
        let mut global_template_last: HashMap<String, TaskId> = HashMap::new();
        let mut global_by_name: HashMap<String, TaskId> = HashMap::new();
        for (index, def) in self.config.global_tasks.iter().enumerate() {
            match def.template.as_deref() {
                Some(template) if self.config.process_templates.contains_key(template) => {
                    let stubs = &self.config.process_templates[template];
                    let instance = def.name.as_deref().unwrap_or(template);

                    let mut local: HashMap<String, TaskId> = HashMap::new();
                    let mut chain: Vec<TaskId> = Vec::with_capacity(stubs.len());
                    for stub in stubs {
                        let fq = format!("{GLOBAL_OWNER}::{instance}::{}", stub.name);
                        let id = graph.push_task(stub_task(fq, stub, GLOBAL_OWNER, def.priority));
                        local.insert(stub.name.clone(), id);
                        chain.push(id);
                    }
                    for (stub, &id) in stubs.iter().zip(&chain) {
                        let scope = ResolutionScope::for_global_template(&local, &milestones);
                        for token in &stub.dependencies {
                            let dep = scope.resolve(token).ok_or_else(|| {
                                BuildError::UnresolvedDependency {
                                    token: token.clone(),
                                    task: graph.task(id).name.clone(),
                                    owner: GLOBAL_OWNER.to_string(),
                                }
                            })?;
                            graph.add_dependency(id, dep);
                        }
                    }
                    if let Some(&last) = chain.last() {
                        global_template_last.insert(template.to_string(), last);
                        if let Some(name) = &def.name {
                            global_by_name.insert(name.clone(), last);
                        }
                    }
                    debug!(template, instance, tasks = chain.len(), "expanded global template");
                    global_members.extend_from_slice(&chain);
                }
                _ => {
                    // Standalone global task. An unknown template name falls
                    // through here as well, so `name` is required.
                    let name = def
                        .name
                        .as_deref()
                        .ok_or(BuildError::UnnamedGlobalTask { index })?;
                    let duration = def.duration.unwrap_or_else(|| {
                        def.duration_per_client.unwrap_or(1.0)
                            * self.config.clients.len().max(1) as f64
                    });
                    let mut task =
                        Task::new(format!("{GLOBAL_OWNER}::{name}"), duration, def.kind, GLOBAL_OWNER)
                            .with_min_start(def.start_after)
                            .with_priority(def.priority.unwrap_or(DEFAULT_PRIORITY));
                    if let Some(server) = &def.server {
                        task = task.with_server(server);
                    }
                    let id = graph.push_task(task);
                    global_by_name.insert(name.to_string(), id);
                    global_members.push(id);
                }
            }
        }

        // Per-client expansion, strictly in each client's declared order.
        let template_names: HashSet<String> =
            self.config.process_templates.keys().cloned().collect();
        for client in &self.config.clients {
            let mut earlier: HashMap<String, TaskId> = HashMap::new();
            let mut template_last: HashMap<String, TaskId> = HashMap::new();
            let mut members: Vec<TaskId> = Vec::new();

            for template in &client.processes_order {
                let stubs = self.config.process_templates.get(template).ok_or_else(|| {
                    BuildError::MissingTemplate {
                        template: template.clone(),
                        client: client.name.clone(),
                    }
                })?;

                // Build the whole chain before wiring, so a stub may
                // reference a later stub of the same template.
                let mut local: HashMap<String, TaskId> = HashMap::new();
                let mut chain: Vec<TaskId> = Vec::with_capacity(stubs.len());
                for stub in stubs {
                    let fq = format!("{}::{}::{}", client.name, template, stub.name);
                    let id = graph.push_task(stub_task(fq, stub, &client.name, None));
                    local.insert(stub.name.clone(), id);
                    chain.push(id);
                }
                for (stub, &id) in stubs.iter().zip(&chain) {
                    let scope = ResolutionScope::for_client(
                        &local,
                        &milestones,
                        ClientScope {
                            earlier: &earlier,
                            template_last: &template_last,
                        },
                        GlobalScope {
                            template_last: &global_template_last,
                            by_name: &global_by_name,
                            template_names: &template_names,
                        },
                    );
                    for token in &stub.dependencies {
                        let dep = scope.resolve(token).ok_or_else(|| {
                            BuildError::UnresolvedDependency {
                                token: token.clone(),
                                task: graph.task(id).name.clone(),
                                owner: client.name.clone(),
                            }
                        })?;
                        graph.add_dependency(id, dep);
                    }
                }

                earlier.extend(local);
                members.extend_from_slice(&chain);
                if let Some(&last) = chain.last() {
                    template_last.insert(template.clone(), last);
                }
                debug!(client = %client.name, template = %template, tasks = chain.len(), "expanded client template");
            }

            graph.push_process(Process::new(&client.name, members));
        }

        // The synthetic global process goes last; the scheduler's
        // enumeration order follows this process order.
        graph.push_process(Process::new(GLOBAL_OWNER, global_members));

        validation::validate_graph(&graph).map_err(BuildError::InvalidGraph)?;
        debug!(
            tasks = graph.len(),
            processes = graph.processes().len(),
            "task graph built"
        );
        Ok(graph)
    }
}

fn stub_task(name: String, stub: &TaskStub, owner: &str, fallback_priority: Option<i32>) -> Task {
    let mut task = Task::new(name, stub.duration, stub.kind, owner)
        .with_min_start(stub.start_after)
        .with_priority(
            stub.priority
                .or(fallback_priority)
                .unwrap_or(DEFAULT_PRIORITY),
        );
    if let Some(server) = &stub.server {
        task = task.with_server(server);
    }
    task
}
