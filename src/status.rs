//! Lock-guarded read of the valve's current state

use crate::device::ValveCommands;
use crate::error::ValveError;
use crate::lock::ActuationLock;
use crate::types::DeviceStatus;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Status read that respects the actuation lock, so a check can never
/// interleave with an in-flight actuation and report a transitional
/// state as final.
pub struct StatusQuery {
    lock: Arc<ActuationLock>,
    device: Arc<dyn ValveCommands>,
}

impl StatusQuery {
    pub fn new(lock: Arc<ActuationLock>, device: Arc<dyn ValveCommands>) -> Self {
        Self { lock, device }
    }

    /// Query the device's reported state. Fails with [`ValveError::Busy`]
    /// while an actuation holds the lock; the caller should back off and
    /// retry after the indicated duration. The lock is always released
    /// before returning, including on transport and protocol failures.
    pub async fn get_status(&self) -> Result<DeviceStatus, ValveError> {
        self.lock.try_acquire(Instant::now())?;
        let result = self.device.query_status().await;
        self.lock.release();
        debug!(ok = result.is_ok(), "status query finished");
        result
    }
}
