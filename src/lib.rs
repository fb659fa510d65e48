//! ventctl — command-serialization core for an HTTP-controlled valve
//!
//! Mediates user-initiated open/close commands against a single physical
//! valve actuator, guaranteeing at most one actuation in flight at a time
//! and reflecting the device's reported state back to the caller:
//!
//! - [`DeviceClient`]: talks to the valve's HTTP interface
//! - [`ActuationLock`]: single-slot lock with time-based auto-expiry
//! - [`CommandDispatcher`]: serializes commands, runs the device call on a
//!   per-direction background worker, publishes grace-window progress
//! - [`StatusQuery`]: lock-guarded read of the current valve state
//!
//! The presentation layer and process bootstrap live outside this crate;
//! they consume the types re-exported here.

pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod lock;
pub mod status;
pub mod types;

use std::time::{SystemTime, UNIX_EPOCH};

pub use config::ValveConfig;
pub use device::{DeviceClient, ValveCommands};
pub use dispatch::{CommandDispatcher, DispatchSignal};
pub use error::ValveError;
pub use lock::ActuationLock;
pub use status::StatusQuery;
pub use types::{CommandOutcome, DeviceStatus, Direction, OutcomeKind};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Default timing parameters for the actuation core
pub mod defaults {
    /// Grace window after dispatching an open command, in seconds
    pub const OPEN_GRACE_SECS: u64 = 5;

    /// Grace window after dispatching a close command, in seconds.
    /// Closing drives the valve through its full travel, hence the
    /// longer window.
    pub const CLOSE_GRACE_SECS: u64 = 35;

    /// Maximum time the actuation lock may be held before an unreleased
    /// holder is treated as expired
    pub const MAX_HOLD_SECS: u64 = 60;

    /// Timeout applied to each device HTTP call, in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Cadence of progress updates during the grace window
    pub const PROGRESS_TICK_MS: u64 = 1000;
}
