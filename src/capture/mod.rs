//! Image acquisition strategies.
//!
//! A capture method turns a target path into a stored image. Both built-in
//! methods shell out to an external capture program, so hardware access
//! stays outside the daemon process and a wedged camera cannot take the
//! daemon down with it.

mod picam;
mod webcam;

pub use picam::PicamCapture;
pub use webcam::WebcamCapture;

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use crate::config::CaptureConfig;
use crate::error::{LapseError, Result};

/// A way of capturing an image to a file.
pub trait CaptureMethod: Send + Sync {
    /// Returns the name the method is registered and configured under.
    fn name(&self) -> &str;

    /// Capture one image and store it at `path`.
    fn capture(&self, path: &Path) -> Result<()>;
}

/// Registry of available capture methods, keyed by name.
///
/// Populated once at startup; lookups after that never mutate it.
pub struct CaptureRegistry {
    methods: HashMap<String, Arc<dyn CaptureMethod>>,
}

impl CaptureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Registry holding every built-in capture method, configured from
    /// `config`.
    pub fn builtin(config: &CaptureConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(WebcamCapture::new(config.webcam.clone())));
        registry.register(Arc::new(PicamCapture::new(config.picam.clone())));
        registry
    }

    /// Register a capture method. Replaces any existing method with the same
    /// name.
    pub fn register(&mut self, method: Arc<dyn CaptureMethod>) {
        self.methods.insert(method.name().to_owned(), method);
    }

    /// Look up a capture method by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn CaptureMethod>> {
        self.methods
            .get(name)
            .cloned()
            .ok_or_else(|| LapseError::UnknownMethod {
                kind: "capture method",
                name: name.to_owned(),
            })
    }
}

impl Default for CaptureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Run an external capture command, mapping a spawn failure or a non-zero
/// exit to [`LapseError::Capture`].
pub(crate) fn run_capture_command(mut command: Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .map_err(|e| LapseError::Capture(format!("cannot run {program}: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LapseError::Capture(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}
