//! Ordered application of post-capture actions.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::actions::Action;

/// Result of one pipeline pass over one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every action reported success.
    Completed,
    /// The named action failed; later actions did not run.
    FailedAt {
        /// Name of the first failing action.
        action: String,
    },
}

/// The ordered action list applied to every artifact.
///
/// A retried artifact runs the whole list from the start, so actions must
/// stay idempotent: an earlier, partially successful attempt may already
/// have carried some of them out.
pub struct Pipeline {
    actions: Vec<Arc<dyn Action>>,
}

impl Pipeline {
    /// Build a pipeline from an already-resolved action list.
    pub fn new(actions: Vec<Arc<dyn Action>>) -> Self {
        Self { actions }
    }

    /// Names of the configured actions, in execution order.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Apply every action to `artifact` in order, stopping at the first
    /// failure.
    pub fn run(&self, artifact: &Path) -> PipelineOutcome {
        for action in &self.actions {
            debug!(
                "running action \"{}\" on {}",
                action.name(),
                artifact.display()
            );
            let outcome = action.run(artifact);
            if !outcome.success {
                if let Some(detail) = &outcome.detail {
                    debug!("action \"{}\" failed: {detail}", action.name());
                }
                return PipelineOutcome::FailedAt {
                    action: action.name().to_owned(),
                };
            }
        }
        PipelineOutcome::Completed
    }
}
