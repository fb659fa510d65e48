//! Shared types for the actuation core

use serde::Deserialize;

/// Direction of a valve actuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Open,
    Close,
}

impl Direction {
    /// Device endpoint commanded for this direction
    pub fn endpoint(&self) -> &'static str {
        match self {
            Direction::Open => "open",
            Direction::Close => "close",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Valve state as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Open,
    Closed,
    /// Anything the device reports other than the two known literals
    Unknown,
}

impl DeviceStatus {
    /// Classify a reported status string. Only the exact literals
    /// "OPEN" and "CLOSED" are recognized; everything else is Unknown.
    pub fn from_report(raw: &str) -> Self {
        match raw {
            "OPEN" => DeviceStatus::Open,
            "CLOSED" => DeviceStatus::Closed,
            _ => DeviceStatus::Unknown,
        }
    }

    /// Whether an open command is a meaningful affordance in this state
    pub fn can_open(&self) -> bool {
        !matches!(self, DeviceStatus::Open)
    }

    /// Whether a close command is a meaningful affordance in this state
    pub fn can_close(&self) -> bool {
        !matches!(self, DeviceStatus::Closed)
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeviceStatus::Open => "OPEN",
            DeviceStatus::Closed => "CLOSED",
            DeviceStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Wire shape of the device's status response body
#[derive(Debug, Deserialize)]
pub(crate) struct StatusReport {
    pub status: String,
}

/// How a device command call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The device accepted the request
    Success,
    /// The request never completed (connection refused, timeout, ...)
    TransportError,
}

/// Result of a single fire-and-forget command call. Consumed by the
/// worker loop for logging; never fed back into the lock (release is
/// time-based, not outcome-based).
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub kind: OutcomeKind,
    pub direction: Direction,
    /// Milliseconds since Unix epoch at which the outcome was observed
    pub observed_at: u64,
}

impl CommandOutcome {
    pub fn success(direction: Direction) -> Self {
        Self {
            kind: OutcomeKind::Success,
            direction,
            observed_at: crate::now_ms(),
        }
    }

    pub fn transport_error(direction: Direction) -> Self {
        Self {
            kind: OutcomeKind::TransportError,
            direction,
            observed_at: crate::now_ms(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}
