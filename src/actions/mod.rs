//! Post-capture actions.
//!
//! An action is one named, idempotent unit of work applied to a captured
//! file (upload it, delete it). Failures are ordinary values: an action
//! converts every internal error into a failed [`ActionOutcome`] so the
//! pipeline's stop-on-failure rule applies uniformly.

mod remove;
mod upload;

pub use remove::RemoveFileAction;
pub use upload::UploadAction;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::ActionsConfig;
use crate::error::{LapseError, Result};

/// Result of running one action on one artifact.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// Whether the action succeeded.
    pub success: bool,
    /// Failure detail, when there is one.
    pub detail: Option<String>,
}

impl ActionOutcome {
    /// A successful outcome.
    pub fn success() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    /// A failed outcome with detail.
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }
}

/// A named post-capture action.
pub trait Action: Send + Sync {
    /// Returns the name the action is registered and configured under.
    fn name(&self) -> &str;

    /// Run this action on the artifact at `path`.
    ///
    /// Must be idempotent: a retried artifact may already have been through
    /// this action in an earlier, partially successful pass.
    fn run(&self, path: &Path) -> ActionOutcome;
}

/// Registry of available actions, keyed by name.
///
/// Populated once at startup; lookups after that never mutate it.
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Registry holding every built-in action, configured from `config`.
    pub fn builtin(config: &ActionsConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(UploadAction::new(config.upload.clone())));
        registry.register(Arc::new(RemoveFileAction::new()));
        registry
    }

    /// Register an action. Replaces any existing action with the same name.
    pub fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.insert(action.name().to_owned(), action);
    }

    /// Look up an action by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Action>> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| LapseError::UnknownMethod {
                kind: "action",
                name: name.to_owned(),
            })
    }

    /// Resolve an ordered name list into an ordered action list.
    pub fn resolve_order(&self, names: &[String]) -> Result<Vec<Arc<dyn Action>>> {
        names.iter().map(|name| self.resolve(name)).collect()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
