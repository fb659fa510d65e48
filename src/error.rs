//! Error taxonomy for the actuation core
//!
//! None of these are fatal to the process: transport and protocol
//! failures surface as reportable conditions, and lock contention is a
//! retryable state for the presentation layer to render.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the actuation core
#[derive(Error, Debug)]
pub enum ValveError {
    /// Network-level failure talking to the device
    #[error("transport failure talking to the device: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered, but the body was not understood. The caller
    /// should render the valve state as UNKNOWN.
    #[error("unexpected device response: {detail}")]
    Protocol { detail: String },

    /// Another actuation holds the lock; retry after the given duration
    #[error("device is busy, retry in {}s", retry_after.as_secs())]
    Busy { retry_after: Duration },
}

impl ValveError {
    /// Lock contention is the only condition worth an automatic retry
    pub fn is_busy(&self) -> bool {
        matches!(self, ValveError::Busy { .. })
    }
}
