//! Artifact naming and placement.
//!
//! Captures land under the output directory in one folder per day, named by
//! wall-clock time: `<output_dir>/<YYYY-MM-DD>/<HH:MM:SS>.jpg`. The path is
//! the artifact's identity for the rest of its life; it is never renamed
//! once enqueued.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;

/// Returns the storage path for a capture taken at `timestamp`.
pub fn image_path(output_dir: &Path, timestamp: DateTime<Local>) -> PathBuf {
    output_dir
        .join(timestamp.format("%Y-%m-%d").to_string())
        .join(format!("{}.jpg", timestamp.format("%H:%M:%S")))
}

/// Create the parent directory of `path` if it does not already exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use chrono::TimeZone;

    #[test]
    fn path_is_day_directory_plus_time_of_day() {
        let timestamp = Local.with_ymd_and_hms(2026, 8, 5, 14, 30, 5).unwrap();
        let path = image_path(Path::new("images"), timestamp);
        assert_eq!(path, Path::new("images/2026-08-05/14:30:05.jpg"));
    }

    #[test]
    fn ensure_parent_dir_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2026-08-05").join("14:30:05.jpg");
        ensure_parent_dir(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn ensure_parent_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2026-08-05").join("a.jpg");
        ensure_parent_dir(&path).unwrap();
        ensure_parent_dir(&path).unwrap();
    }
}
