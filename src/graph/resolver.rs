//! Dependency-token resolution.
//!
//! A dependency token is a bare name string; the scope it is resolved in
//! decides which task it binds to. The precedence chain below is applied
//! strictly in order. The later rules are deliberately permissive
//! fallbacks for forward and global references, and reordering them would
//! change which task a token binds to:
//!
//! 1. tasks built earlier in the same template expansion (local names);
//! 2. tasks already built for the same client by previous templates;
//! 3. named milestones;
//! 4. a template name, when the current client has already instantiated
//!    it: that instantiation's last task;
//! 5. a template name not yet built for this client: the last task of its
//!    global instantiation, if one exists;
//! 6. a global task registered by declared name.
//!
//! Global template expansion uses a reduced scope (rules 1 and 3 only).

use std::collections::{HashMap, HashSet};

use crate::models::TaskId;

/// Client-side lookup state for rules 2 and 4.
pub(crate) struct ClientScope<'a> {
    /// Short name → task, across the client's previously built templates.
    pub earlier: &'a HashMap<String, TaskId>,
    /// Template name → last task of the client's own instantiation.
    pub template_last: &'a HashMap<String, TaskId>,
}

/// Global lookup state for rules 4–6.
pub(crate) struct GlobalScope<'a> {
    /// Template name → last task of the global instantiation.
    pub template_last: &'a HashMap<String, TaskId>,
    /// Declared global name → task (simple tasks and named instantiations).
    pub by_name: &'a HashMap<String, TaskId>,
    /// Every declared template name, instantiated or not.
    pub template_names: &'a HashSet<String>,
}

/// A resolution scope: the maps a token is matched against, in precedence
/// order.
pub(crate) struct ResolutionScope<'a> {
    local: &'a HashMap<String, TaskId>,
    milestones: &'a HashMap<String, TaskId>,
    client: Option<ClientScope<'a>>,
    globals: Option<GlobalScope<'a>>,
}

impl<'a> ResolutionScope<'a> {
    /// Scope for expanding a global template: local names and milestones
    /// only.
    pub fn for_global_template(
        local: &'a HashMap<String, TaskId>,
        milestones: &'a HashMap<String, TaskId>,
    ) -> Self {
        Self {
            local,
            milestones,
            client: None,
            globals: None,
        }
    }

    /// Full scope for expanding a client template.
    pub fn for_client(
        local: &'a HashMap<String, TaskId>,
        milestones: &'a HashMap<String, TaskId>,
        client: ClientScope<'a>,
        globals: GlobalScope<'a>,
    ) -> Self {
        Self {
            local,
            milestones,
            client: Some(client),
            globals: Some(globals),
        }
    }

    /// Resolves a token to exactly one task, or `None` when no rule
    /// matches.
    pub fn resolve(&self, token: &str) -> Option<TaskId> {
        if let Some(&id) = self.local.get(token) {
            return Some(id);
        }
        if let Some(client) = &self.client {
            if let Some(&id) = client.earlier.get(token) {
                return Some(id);
            }
        }
        if let Some(&id) = self.milestones.get(token) {
            return Some(id);
        }
        if let Some(globals) = &self.globals {
            let names_template = globals.template_names.contains(token)
                || globals.template_last.contains_key(token);
            if names_template {
                if let Some(client) = &self.client {
                    if let Some(&id) = client.template_last.get(token) {
                        return Some(id);
                    }
                }
                // A template with no client-side and no global instantiation
                // is unresolvable, even if a global task shares the name.
                return globals.template_last.get(token).copied();
            }
            if let Some(&id) = globals.by_name.get(token) {
                return Some(id);
            }
        }
        None
    }
}
