//! Deletes the local artifact file.
//!
//! Meant to run after every action that reads the file. An already-missing
//! file counts as success: a retried artifact may have been removed by an
//! earlier pass.

use std::path::Path;

use tracing::debug;

use super::{Action, ActionOutcome};

/// Removes the captured file from local storage.
#[derive(Debug, Default)]
pub struct RemoveFileAction;

impl RemoveFileAction {
    /// Create the action.
    pub fn new() -> Self {
        Self
    }
}

impl Action for RemoveFileAction {
    fn name(&self) -> &str {
        "remove"
    }

    fn run(&self, path: &Path) -> ActionOutcome {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!("removed {}", path.display());
                ActionOutcome::success()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ActionOutcome::success(),
            Err(e) => ActionOutcome::failure(format!("cannot remove {}: {e}", path.display())),
        }
    }
}
