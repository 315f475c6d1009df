//! USB webcam capture via `fswebcam`.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{CaptureMethod, run_capture_command};
use crate::config::WebcamConfig;
use crate::error::Result;

/// Captures from a USB webcam by invoking `fswebcam`.
pub struct WebcamCapture {
    config: WebcamConfig,
}

impl WebcamCapture {
    /// Create the method from its config section.
    pub fn new(config: WebcamConfig) -> Self {
        Self { config }
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .arg("-p")
            .arg(&self.config.palette)
            .arg("-S")
            .arg(self.config.skip_frames.to_string())
            .arg("--no-banner")
            .arg("--resolution")
            .arg(&self.config.resolution)
            .arg("--quiet")
            .arg(path);
        command
    }
}

impl CaptureMethod for WebcamCapture {
    fn name(&self) -> &str {
        "webcam"
    }

    fn capture(&self, path: &Path) -> Result<()> {
        debug!("capturing webcam frame to {}", path.display());
        run_capture_command(self.command(path))
    }
}
