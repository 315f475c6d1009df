//! Daemon orchestration.
//!
//! One sequential worker owns the queue, the schedule and the pipeline.
//! Each cycle drains the backlog to quiescence or first failure, persists,
//! sleeps until the next scheduled capture, captures a new artifact,
//! enqueues it and persists again before the next cycle, so a crash directly
//! after a capture cannot lose the artifact reference.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::actions::ActionRegistry;
use crate::artifact;
use crate::capture::{CaptureMethod, CaptureRegistry};
use crate::config::DaemonConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::queue::RetryQueue;
use crate::schedule;

/// The capture daemon.
pub struct Daemon {
    config: DaemonConfig,
    queue: RetryQueue,
    pipeline: Pipeline,
    capture: Arc<dyn CaptureMethod>,
}

impl Daemon {
    /// Resolve configuration into a runnable daemon using the built-in
    /// registries.
    ///
    /// Fails fast on configuration it cannot honour: an unregistered
    /// capture method or action name, or unreadable queue state.
    pub fn new(config: DaemonConfig) -> Result<Self> {
        let captures = CaptureRegistry::builtin(&config.capture);
        let actions = ActionRegistry::builtin(&config.actions);
        Self::with_registries(config, &captures, &actions)
    }

    /// Like [`Daemon::new`], but resolving against caller-supplied
    /// registries.
    pub fn with_registries(
        config: DaemonConfig,
        captures: &CaptureRegistry,
        actions: &ActionRegistry,
    ) -> Result<Self> {
        config.validate()?;

        let capture = captures.resolve(&config.capture.method)?;
        let pipeline = Pipeline::new(actions.resolve_order(&config.actions.order)?);
        let queue = RetryQueue::load(&config.queue.state_path)?;

        info!(
            method = %config.capture.method,
            actions = ?pipeline.action_names(),
            pending = queue.len(),
            "daemon ready"
        );

        Ok(Self {
            config,
            queue,
            pipeline,
            capture,
        })
    }

    /// Pending artifact backlog, oldest first.
    pub fn pending(&self) -> &[PathBuf] {
        self.queue.entries()
    }

    /// Drain the retry backlog, then persist the surviving order.
    pub fn drain_and_persist(&mut self) -> Result<()> {
        let report = self.queue.drain_once(|a| self.pipeline.run(a));
        if report.completed > 0 || report.dropped > 0 || report.deferred {
            info!(
                completed = report.completed,
                dropped = report.dropped,
                remaining = self.queue.len(),
                "drain pass finished"
            );
        }
        self.queue.save()
    }

    /// Capture a new artifact, enqueue it and persist the queue.
    ///
    /// A failed capture is logged and skipped; the daemon keeps cycling.
    pub fn capture_and_persist(&mut self) -> Result<()> {
        let path = artifact::image_path(&self.config.capture.output_dir, chrono::Local::now());
        artifact::ensure_parent_dir(&path)?;

        info!("capturing to {}", path.display());
        match self.capture.capture(&path) {
            Ok(()) => {
                self.queue.push(path);
                self.queue.save()?;
            }
            Err(e) => warn!("capture failed, skipping this cycle: {e}"),
        }
        Ok(())
    }

    /// Run one full cycle without sleeping: drain the backlog, capture, then
    /// drain again so the fresh artifact is processed too.
    pub fn run_once(&mut self) -> Result<()> {
        self.drain_and_persist()?;
        self.capture_and_persist()?;
        self.drain_and_persist()
    }

    /// Run the daemon loop until Ctrl+C.
    ///
    /// Queued work is left persisted on shutdown and picked up by the next
    /// start.
    pub async fn run(mut self) -> Result<()> {
        info!("daemon loop started");
        loop {
            self.drain_and_persist()?;

            let now = schedule::local_secs_since_midnight();
            let delay = schedule::next_delay(now, &self.config.schedule);
            info!("next capture in {}s", delay.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("cannot listen for shutdown signal: {e}");
                    }
                    info!(
                        pending = self.queue.len(),
                        "shutting down; queued work is persisted"
                    );
                    return Ok(());
                }
            }

            self.capture_and_persist()?;
        }
    }
}
