//! Command dispatcher: serializes open/close against the actuation lock
//! and runs the device calls on per-direction background workers
//!
//! Protocol for each command: take the lock, hand the device call to that
//! direction's single-slot worker, sit out the grace window while
//! publishing elapsed-fraction progress, release the lock, signal
//! completion. The grace window is wall-clock; the background call's
//! completion is not awaited — its outcome shows up in the logs and in
//! the next status query.

use crate::defaults;
use crate::device::ValveCommands;
use crate::error::ValveError;
use crate::lock::ActuationLock;
use crate::types::Direction;
use crate::ValveConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{debug, info, warn};

/// Progress and completion signals published to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchSignal {
    /// No command in flight
    Idle,
    /// Grace window running; `fraction` advances 0.0 → 1.0 once per second
    Running { direction: Direction, fraction: f64 },
    /// Grace window elapsed; safe to re-query status
    Done { direction: Direction },
}

/// Serializes valve commands and owns the background workers
pub struct CommandDispatcher {
    lock: Arc<ActuationLock>,
    config: ValveConfig,
    open_worker: mpsc::Sender<Direction>,
    close_worker: mpsc::Sender<Direction>,
    progress: watch::Sender<DispatchSignal>,
}

impl CommandDispatcher {
    /// Create a dispatcher, spawning one single-slot worker per direction.
    /// Must be called from within a Tokio runtime.
    pub fn new(
        config: ValveConfig,
        lock: Arc<ActuationLock>,
        device: Arc<dyn ValveCommands>,
    ) -> Self {
        let (progress, _) = watch::channel(DispatchSignal::Idle);
        Self {
            open_worker: spawn_worker(Direction::Open, device.clone()),
            close_worker: spawn_worker(Direction::Close, device),
            lock,
            config,
            progress,
        }
    }

    /// Subscribe to progress/completion signals
    pub fn progress(&self) -> watch::Receiver<DispatchSignal> {
        self.progress.subscribe()
    }

    /// Dispatch an open command. Returns once the grace window elapsed;
    /// fails fast with [`ValveError::Busy`] when another actuation holds
    /// the lock.
    pub async fn open(&self) -> Result<(), ValveError> {
        self.dispatch(Direction::Open).await
    }

    /// Dispatch a close command; same protocol as [`Self::open`]
    pub async fn close(&self) -> Result<(), ValveError> {
        self.dispatch(Direction::Close).await
    }

    async fn dispatch(&self, direction: Direction) -> Result<(), ValveError> {
        self.lock.try_acquire(Instant::now()).map_err(|e| {
            info!(%direction, "rejected: actuation lock is busy");
            e
        })?;

        let worker = match direction {
            Direction::Open => &self.open_worker,
            Direction::Close => &self.close_worker,
        };

        // One slot per direction: a second same-direction command queues
        // behind the in-flight one, anything beyond that is dropped.
        match worker.try_send(direction) {
            Ok(()) => info!(%direction, "command handed to worker"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(%direction, "worker slot full, command superseded")
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(%direction, "worker gone, command dropped")
            }
        }

        self.wait_grace(direction, self.config.grace_for(direction))
            .await;

        self.lock.release();
        let _ = self.progress.send(DispatchSignal::Done { direction });
        Ok(())
    }

    /// Sit out the grace window, publishing elapsed-fraction updates once
    /// per second. Never observes the background call.
    async fn wait_grace(&self, direction: Direction, grace: Duration) {
        let ticks = grace.as_secs().max(1);
        let mut ticker = interval(Duration::from_millis(defaults::PROGRESS_TICK_MS));
        for elapsed in 0..=ticks {
            // First tick completes immediately, publishing fraction 0.0
            ticker.tick().await;
            let fraction = elapsed as f64 / ticks as f64;
            let _ = self
                .progress
                .send(DispatchSignal::Running { direction, fraction });
            debug!(%direction, fraction, "grace window progress");
        }
    }
}

/// Spawn the background worker that talks to the device for one
/// direction. The bounded queue (capacity 1) gives at most one call in
/// flight plus one queued per direction; the worker lives as long as
/// the dispatcher's sender does.
fn spawn_worker(direction: Direction, device: Arc<dyn ValveCommands>) -> mpsc::Sender<Direction> {
    let (tx, mut rx) = mpsc::channel(1);
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            let outcome = match direction {
                Direction::Open => device.open().await,
                Direction::Close => device.close().await,
            };
            if outcome.is_success() {
                info!(%direction, observed_at = outcome.observed_at, "device call succeeded");
            } else {
                warn!(
                    %direction,
                    observed_at = outcome.observed_at,
                    "device call failed; next status query will show the real state"
                );
            }
        }
        debug!(%direction, "worker shutting down");
    });
    tx
}
