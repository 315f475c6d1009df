//! Durable retry queue.
//!
//! The queue is the sole record of captures that have not yet cleared the
//! full action pipeline. It is persisted as a JSON array of paths after every
//! membership change, written temp-file-then-rename so a crash mid-save never
//! clobbers the previous durable state.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{LapseError, Result};
use crate::pipeline::PipelineOutcome;

/// Ordered backlog of artifacts awaiting a full pipeline pass.
///
/// Entries are append-ordered: the newest capture sits at the back, and
/// draining starts there. Newest-first is deliberate for a timelapse: fresh
/// frames matter more than a stale backlog.
#[derive(Debug)]
pub struct RetryQueue {
    entries: Vec<PathBuf>,
    state_path: PathBuf,
}

/// What one [`RetryQueue::drain_once`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Artifacts that cleared every action and left the queue.
    pub completed: usize,
    /// Artifacts dropped because their backing file no longer exists.
    pub dropped: usize,
    /// Whether the pass stopped early on an action failure.
    pub deferred: bool,
}

impl RetryQueue {
    /// Load persisted queue state.
    ///
    /// A missing state file is the empty queue. Unreadable or unparseable
    /// content is [`LapseError::QueueCorrupt`]: the file records undelivered
    /// work, so the daemon must not continue as if it were empty.
    pub fn load(state_path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(state_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    entries: Vec::new(),
                    state_path: state_path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(LapseError::QueueCorrupt {
                    path: state_path.to_path_buf(),
                    detail: format!("cannot read state: {e}"),
                });
            }
        };

        let entries: Vec<PathBuf> =
            serde_json::from_slice(&bytes).map_err(|e| LapseError::QueueCorrupt {
                path: state_path.to_path_buf(),
                detail: format!("cannot parse state: {e}"),
            })?;

        debug!(
            pending = entries.len(),
            "loaded queue state from {}",
            state_path.display()
        );
        Ok(Self {
            entries,
            state_path: state_path.to_path_buf(),
        })
    }

    /// Pending artifacts, oldest first.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Returns `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pending artifacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a freshly captured artifact.
    pub fn push(&mut self, artifact: PathBuf) {
        self.entries.push(artifact);
    }

    /// Persist the current order atomically.
    ///
    /// Writes a sibling temp file, syncs it, then renames it over the state
    /// path, so the previous durable state survives a crash mid-write.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LapseError::Queue(format!("cannot create state dir: {e}")))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| LapseError::Queue(format!("cannot serialize state: {e}")))?;

        let mut tmp_path = self.state_path.clone();
        tmp_path.set_extension("json.tmp");

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp_path)
            .map_err(|e| {
                LapseError::Queue(format!(
                    "cannot open temp state file {}: {e}",
                    tmp_path.display()
                ))
            })?;
        file.write_all(json.as_bytes()).map_err(|e| {
            LapseError::Queue(format!(
                "cannot write temp state file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.sync_all().map_err(|e| {
            LapseError::Queue(format!(
                "cannot sync temp state file {}: {e}",
                tmp_path.display()
            ))
        })?;
        std::fs::rename(&tmp_path, &self.state_path).map_err(|e| {
            LapseError::Queue(format!(
                "cannot promote temp state file {} -> {}: {e}",
                tmp_path.display(),
                self.state_path.display()
            ))
        })?;
        Ok(())
    }

    /// Run one drain pass: newest entries first, until the queue empties or
    /// an action fails.
    ///
    /// An entry whose backing file vanished is dropped permanently without
    /// invoking the pipeline; it cannot be processed and must not block the
    /// rest of the backlog. On the first pipeline failure the artifact goes
    /// back to the head of the retry order and the pass stops, leaving the
    /// remaining backlog untouched for the next cycle.
    pub fn drain_once<F>(&mut self, mut run_pipeline: F) -> DrainReport
    where
        F: FnMut(&Path) -> PipelineOutcome,
    {
        let mut report = DrainReport::default();

        while let Some(artifact) = self.entries.pop() {
            if !artifact.exists() {
                warn!(
                    "dropping queued artifact {}: file no longer exists",
                    artifact.display()
                );
                report.dropped += 1;
                continue;
            }

            match run_pipeline(&artifact) {
                PipelineOutcome::Completed => {
                    info!("artifact {} completed all actions", artifact.display());
                    report.completed += 1;
                }
                PipelineOutcome::FailedAt { action } => {
                    info!(
                        "action \"{action}\" failed on {}; kept queued for the next cycle",
                        artifact.display()
                    );
                    self.entries.push(artifact);
                    report.deferred = true;
                    break;
                }
            }
        }

        report
    }
}
