//! Single-slot actuation lock with time-based auto-expiry
//!
//! Serializes physical actuations: one caller may hold the lock at a
//! time, and a holder that never releases (crashed task, early-return
//! failure path) loses the slot once `max_hold` elapses. Release is
//! wall-clock based rather than completion based; the device call runs
//! detached and its completion is never observed here, so in practice
//! the lock is a cool-down window between user-triggered actuations.

use crate::error::ValveError;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Mutual-exclusion guard for valve actuations
#[derive(Debug)]
pub struct ActuationLock {
    /// `None` = free, `Some(t)` = busy since `t`
    acquired_at: Mutex<Option<Instant>>,
    max_hold: Duration,
}

impl ActuationLock {
    /// Create a free lock whose holders auto-expire after `max_hold`
    pub fn new(max_hold: Duration) -> Self {
        Self {
            acquired_at: Mutex::new(None),
            max_hold,
        }
    }

    /// Try to take the lock at `now`. Succeeds when the lock is free or
    /// the current holder has exceeded `max_hold`; otherwise fails with
    /// [`ValveError::Busy`] without mutating state.
    pub fn try_acquire(&self, now: Instant) -> Result<(), ValveError> {
        let mut slot = self.slot();
        match *slot {
            Some(at) if now.saturating_duration_since(at) < self.max_hold => {
                Err(ValveError::Busy {
                    retry_after: self.max_hold - now.saturating_duration_since(at),
                })
            }
            _ => {
                *slot = Some(now);
                Ok(())
            }
        }
    }

    /// Release the lock. Idempotent: releasing a free lock is a no-op.
    pub fn release(&self) {
        *self.slot() = None;
    }

    /// Whether the lock is held and not yet expired at `now`
    pub fn is_held(&self, now: Instant) -> bool {
        matches!(*self.slot(), Some(at) if now.saturating_duration_since(at) < self.max_hold)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        // A poisoned mutex only means a panicking holder; the Option
        // inside is still coherent.
        self.acquired_at.lock().unwrap_or_else(|e| e.into_inner())
    }
}
