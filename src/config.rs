//! Configuration types for the capture daemon.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LapseError, Result};
use crate::schedule::SECS_PER_DAY;

/// Top-level configuration for the daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Capture timing settings.
    pub schedule: ScheduleConfig,
    /// Image acquisition settings.
    pub capture: CaptureConfig,
    /// Post-capture action settings.
    pub actions: ActionsConfig,
    /// Retry queue persistence settings.
    pub queue: QueueConfig,
}

/// Capture timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between captures. Captures align to multiples of this value
    /// since midnight rather than drifting with processing time.
    pub interval_secs: u32,
    /// Daily capture window open, seconds since local midnight.
    pub window_start_secs: u32,
    /// Daily capture window close, seconds since local midnight (inclusive).
    pub window_end_secs: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            window_start_secs: 5 * 3600,
            window_end_secs: 18 * 3600,
        }
    }
}

/// Image acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Registered capture method to use (`"webcam"` or `"picam"`).
    pub method: String,
    /// Directory new captures are stored under.
    pub output_dir: PathBuf,
    /// Webcam (fswebcam) settings.
    pub webcam: WebcamConfig,
    /// Raspberry Pi camera (raspistill) settings.
    pub picam: PicamConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            method: "webcam".to_owned(),
            output_dir: PathBuf::from("images"),
            webcam: WebcamConfig::default(),
            picam: PicamConfig::default(),
        }
    }
}

/// `fswebcam` invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebcamConfig {
    /// Capture program to invoke.
    pub program: String,
    /// Pixel format passed to `-p`.
    pub palette: String,
    /// Frames to skip before capturing, passed to `-S`. Early frames come
    /// out dark while the sensor adjusts.
    pub skip_frames: u32,
    /// Capture resolution, `WIDTHxHEIGHT`.
    pub resolution: String,
}

impl Default for WebcamConfig {
    fn default() -> Self {
        Self {
            program: "fswebcam".to_owned(),
            palette: "YUYV".to_owned(),
            skip_frames: 20,
            resolution: "1920x1080".to_owned(),
        }
    }
}

/// `raspistill` invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PicamConfig {
    /// Capture program to invoke.
    pub program: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Sensor ISO.
    pub iso: u32,
    /// Warm-up delay in milliseconds before the exposure is taken, so the
    /// sensor settles on exposure and white balance and consecutive frames
    /// stay consistent.
    pub warmup_ms: u32,
}

impl Default for PicamConfig {
    fn default() -> Self {
        Self {
            program: "raspistill".to_owned(),
            width: 1920,
            height: 1080,
            iso: 100,
            warmup_ms: 2000,
        }
    }
}

/// Post-capture action configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Ordered list of actions run on every capture. Order is significant:
    /// `remove` must come after anything that reads the file.
    pub order: Vec<String>,
    /// Upload action settings.
    pub upload: UploadConfig,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            order: vec!["upload".to_owned(), "remove".to_owned()],
            upload: UploadConfig::default(),
        }
    }
}

/// Upload action settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Container base URL; the artifact's day directory and file name are
    /// appended as the object path.
    pub base_url: String,
    /// Shared-access query string appended after the object path, without
    /// the leading `?`.
    pub sas_token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            sas_token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Retry queue persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Path of the persisted queue state file.
    pub state_path: PathBuf,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("queue.json"),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LapseError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as
    /// needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LapseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check invariants the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        let schedule = &self.schedule;
        if schedule.interval_secs == 0 {
            return Err(LapseError::Config(
                "schedule.interval_secs must be positive".to_owned(),
            ));
        }
        if schedule.window_start_secs >= SECS_PER_DAY || schedule.window_end_secs >= SECS_PER_DAY {
            return Err(LapseError::Config(
                "schedule window bounds must be below 86400 seconds".to_owned(),
            ));
        }
        if schedule.window_start_secs > schedule.window_end_secs {
            return Err(LapseError::Config(
                "schedule.window_start_secs must not be after window_end_secs".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DaemonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capture.method, "webcam");
        assert_eq!(config.actions.order, vec!["upload", "remove"]);
    }

    #[test]
    fn toml_round_trip_preserves_action_order() {
        let mut config = DaemonConfig::default();
        config.actions.order = vec!["remove".to_owned(), "upload".to_owned()];
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let loaded: DaemonConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded.actions.order, config.actions.order);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let toml_str = "[schedule]\ninterval_secs = 60\n";
        let config: DaemonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.schedule.interval_secs, 60);
        assert_eq!(config.schedule.window_start_secs, 5 * 3600);
        assert_eq!(config.capture.webcam.program, "fswebcam");
        assert_eq!(config.capture.picam.iso, 100);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = DaemonConfig::default();
        config.schedule.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut config = DaemonConfig::default();
        config.schedule.window_start_secs = 64_800;
        config.schedule.window_end_secs = 18_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_window_is_rejected() {
        let mut config = DaemonConfig::default();
        config.schedule.window_end_secs = SECS_PER_DAY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = DaemonConfig::from_file(Path::new("/nonexistent/lapse.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("lapse.toml");

        let mut config = DaemonConfig::default();
        config.capture.method = "picam".to_owned();
        config.save(&path).unwrap();

        let loaded = DaemonConfig::from_file(&path).unwrap();
        assert_eq!(loaded.capture.method, "picam");
    }
}
