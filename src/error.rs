//! Error types for the capture daemon.

use std::path::PathBuf;

/// Top-level error type for the timelapse daemon.
#[derive(Debug, thiserror::Error)]
pub enum LapseError {
    /// Image acquisition error.
    #[error("capture error: {0}")]
    Capture(String),

    /// Post-processing action error.
    #[error("action error: {0}")]
    Action(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Retry queue persistence error.
    #[error("queue error: {0}")]
    Queue(String),

    /// Persisted queue state exists but cannot be read back.
    ///
    /// Never folded into an empty queue: the file records undelivered work,
    /// and continuing without it would silently drop that work.
    #[error("queue state at {} is corrupt: {detail}", .path.display())]
    QueueCorrupt {
        /// Location of the unreadable state file.
        path: PathBuf,
        /// What went wrong reading or parsing it.
        detail: String,
    },

    /// Configuration names a capture method or action that was never
    /// registered. Fatal at startup.
    #[error("unknown {kind} \"{name}\"")]
    UnknownMethod {
        /// Which registry the lookup failed in.
        kind: &'static str,
        /// The configured name with no handler behind it.
        name: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LapseError>;
