//! Uploads the artifact to remote blob storage.
//!
//! Performs an HTTP `PUT` of the file bytes to the configured base URL,
//! Azure-blob style: the base URL is expected to carry its own authorisation
//! (a SAS token) and the request marks the object as a block blob. The remote
//! object path mirrors the local `<day>/<file>` layout. Connectivity loss and
//! non-2xx responses come back as failure outcomes, which keeps the artifact
//! queued for the next cycle.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use super::{Action, ActionOutcome};
use crate::config::UploadConfig;

/// Uploads captured files to a pre-authorised HTTP endpoint.
pub struct UploadAction {
    config: UploadConfig,
    agent: ureq::Agent,
}

impl UploadAction {
    /// Create the action from its config section.
    pub fn new(config: UploadConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }

    fn object_url(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = match path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|d| d.to_str())
        {
            Some(day) => format!("{base}/{day}/{name}"),
            None => format!("{base}/{name}"),
        };
        if !self.config.sas_token.is_empty() {
            url.push('?');
            url.push_str(&self.config.sas_token);
        }
        Some(url)
    }
}

impl Action for UploadAction {
    fn name(&self) -> &str {
        "upload"
    }

    fn run(&self, path: &Path) -> ActionOutcome {
        if self.config.base_url.is_empty() {
            return ActionOutcome::failure("upload.base_url is not configured");
        }

        let Some(url) = self.object_url(path) else {
            return ActionOutcome::failure(format!(
                "artifact {} has no usable file name",
                path.display()
            ));
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return ActionOutcome::failure(format!("cannot read {}: {e}", path.display()));
            }
        };

        match self
            .agent
            .put(&url)
            .set("x-ms-blob-type", "BlockBlob")
            .set("content-type", "image/jpeg")
            .send_bytes(&bytes)
        {
            Ok(response) => {
                debug!(
                    "uploaded {} ({} bytes, status {})",
                    path.display(),
                    bytes.len(),
                    response.status()
                );
                ActionOutcome::success()
            }
            Err(e) => ActionOutcome::failure(format!("upload of {} failed: {e}", path.display())),
        }
    }
}
