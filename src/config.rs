//! Read-only configuration surface for the actuation core
//!
//! Owned by the embedding process's bootstrap; the core only consumes it.

use crate::defaults;
use crate::types::Direction;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for the valve actuation core
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValveConfig {
    /// Base URL of the valve's HTTP interface
    pub base_url: String,
    /// Grace window after dispatching an open command
    pub open_grace_secs: u64,
    /// Grace window after dispatching a close command
    pub close_grace_secs: u64,
    /// Auto-expiry threshold for the actuation lock
    pub max_hold_secs: u64,
    /// Timeout applied to each device HTTP call
    pub request_timeout_secs: u64,
}

impl Default for ValveConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.178.56/".into(),
            open_grace_secs: defaults::OPEN_GRACE_SECS,
            close_grace_secs: defaults::CLOSE_GRACE_SECS,
            max_hold_secs: defaults::MAX_HOLD_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ValveConfig {
    pub fn open_grace(&self) -> Duration {
        Duration::from_secs(self.open_grace_secs)
    }

    pub fn close_grace(&self) -> Duration {
        Duration::from_secs(self.close_grace_secs)
    }

    /// Grace window for the given actuation direction
    pub fn grace_for(&self, direction: Direction) -> Duration {
        match direction {
            Direction::Open => self.open_grace(),
            Direction::Close => self.close_grace(),
        }
    }

    pub fn max_hold(&self) -> Duration {
        Duration::from_secs(self.max_hold_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = ValveConfig::default();
        assert_eq!(config.open_grace(), Duration::from_secs(5));
        assert_eq!(config.close_grace(), Duration::from_secs(35));
        assert_eq!(config.max_hold(), Duration::from_secs(60));
    }

    #[test]
    fn test_grace_for_direction() {
        let config = ValveConfig::default();
        assert_eq!(config.grace_for(Direction::Open), config.open_grace());
        assert_eq!(config.grace_for(Direction::Close), config.close_grace());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ValveConfig =
            serde_json::from_str(r#"{"base_url": "http://valve.local/", "close_grace_secs": 20}"#)
                .expect("valid config");
        assert_eq!(config.base_url, "http://valve.local/");
        assert_eq!(config.close_grace_secs, 20);
        assert_eq!(config.open_grace_secs, defaults::OPEN_GRACE_SECS);
        assert_eq!(config.max_hold_secs, defaults::MAX_HOLD_SECS);
    }
}
