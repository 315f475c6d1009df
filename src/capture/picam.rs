//! Raspberry Pi camera capture via `raspistill`.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{CaptureMethod, run_capture_command};
use crate::config::PicamConfig;
use crate::error::Result;

/// Captures from the Pi camera module by invoking `raspistill`.
///
/// The warm-up delay is passed through as the `--timeout` before exposure,
/// giving the sensor time to settle so consecutive frames stay consistent.
pub struct PicamCapture {
    config: PicamConfig,
}

impl PicamCapture {
    /// Create the method from its config section.
    pub fn new(config: PicamConfig) -> Self {
        Self { config }
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.config.program);
        command
            .arg("--width")
            .arg(self.config.width.to_string())
            .arg("--height")
            .arg(self.config.height.to_string())
            .arg("--ISO")
            .arg(self.config.iso.to_string())
            .arg("--timeout")
            .arg(self.config.warmup_ms.to_string())
            .arg("--nopreview")
            .arg("--output")
            .arg(path);
        command
    }
}

impl CaptureMethod for PicamCapture {
    fn name(&self) -> &str {
        "picam"
    }

    fn capture(&self, path: &Path) -> Result<()> {
        debug!("capturing pi camera frame to {}", path.display());
        run_capture_command(self.command(path))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn command_reflects_config() {
        let capture = PicamCapture::new(PicamConfig {
            program: "raspistill".to_owned(),
            width: 1024,
            height: 768,
            iso: 200,
            warmup_ms: 1500,
        });
        let command = capture.command(Path::new("/img/a.jpg"));

        assert_eq!(command.get_program().to_string_lossy(), "raspistill");
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.windows(2).any(|w| w == ["--width", "1024"]));
        assert!(args.windows(2).any(|w| w == ["--ISO", "200"]));
        assert!(args.windows(2).any(|w| w == ["--timeout", "1500"]));
        assert_eq!(args.last().map(String::as_str), Some("/img/a.jpg"));
    }
}
