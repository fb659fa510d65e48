//! HTTP client for the valve actuator
//!
//! Issues the three remote operations (status, open, close) against the
//! device endpoint. One outbound request per call, no retries; a
//! transport failure is an expected result, not a fault.

use crate::error::ValveError;
use crate::types::{CommandOutcome, DeviceStatus, Direction, StatusReport};
use crate::ValveConfig;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

/// The device operations the dispatcher and status query depend on
#[async_trait]
pub trait ValveCommands: Send + Sync {
    /// Query the valve's reported state
    async fn query_status(&self) -> Result<DeviceStatus, ValveError>;

    /// Command the valve to open (fire-and-forget)
    async fn open(&self) -> CommandOutcome;

    /// Command the valve to close (fire-and-forget)
    async fn close(&self) -> CommandOutcome;
}

/// reqwest-backed implementation of [`ValveCommands`]
pub struct DeviceClient {
    client: Client,
    base_url: String,
}

impl DeviceClient {
    /// Build a client for the device at `config.base_url`. The configured
    /// request timeout bounds every call, including the detached command
    /// calls nothing awaits from the foreground.
    pub fn new(config: &ValveConfig) -> Result<Self, ValveError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issue one command POST and classify the result. The response body
    /// is not inspected; only transport success matters.
    async fn command(&self, direction: Direction) -> CommandOutcome {
        match self.client.post(self.url(direction.endpoint())).send().await {
            Ok(_) => {
                info!(endpoint = direction.endpoint(), "device accepted POST");
                CommandOutcome::success(direction)
            }
            Err(e) => {
                warn!(endpoint = direction.endpoint(), error = %e, "POST to device failed");
                CommandOutcome::transport_error(direction)
            }
        }
    }
}

#[async_trait]
impl ValveCommands for DeviceClient {
    async fn query_status(&self) -> Result<DeviceStatus, ValveError> {
        let response = self
            .client
            .post(self.url("status"))
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = "status", error = %e, "POST to device failed");
                ValveError::from(e)
            })?;

        let report: StatusReport = response.json().await.map_err(|e| {
            warn!(endpoint = "status", error = %e, "device response not understood");
            ValveError::Protocol {
                detail: e.to_string(),
            }
        })?;

        let status = DeviceStatus::from_report(&report.status);
        info!(endpoint = "status", reported = %report.status, "device status read");
        Ok(status)
    }

    async fn open(&self) -> CommandOutcome {
        self.command(Direction::Open).await
    }

    async fn close(&self) -> CommandOutcome {
        self.command(Direction::Close).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutcomeKind;

    fn client_for(server: &mockito::ServerGuard) -> DeviceClient {
        let config = ValveConfig {
            base_url: server.url(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        DeviceClient::new(&config).expect("client builds")
    }

    fn unreachable_client() -> DeviceClient {
        // Nothing listens on port 1
        let config = ValveConfig {
            base_url: "http://127.0.0.1:1".into(),
            request_timeout_secs: 1,
            ..Default::default()
        };
        DeviceClient::new(&config).expect("client builds")
    }

    #[tokio::test]
    async fn test_status_parses_known_literals() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/status")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"OPEN"}"#)
            .create_async()
            .await;

        let status = client_for(&server).query_status().await.expect("status");
        assert_eq!(status, DeviceStatus::Open);
    }

    #[tokio::test]
    async fn test_unrecognized_status_maps_to_unknown() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/status")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"AJAR"}"#)
            .create_async()
            .await;

        let status = client_for(&server).query_status().await.expect("status");
        assert_eq!(status, DeviceStatus::Unknown);
    }

    #[tokio::test]
    async fn test_malformed_body_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/status")
            .with_body("garbage")
            .create_async()
            .await;

        let err = client_for(&server).query_status().await.unwrap_err();
        assert!(matches!(err, ValveError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_device_is_transport_error() {
        let err = unreachable_client().query_status().await.unwrap_err();
        assert!(matches!(err, ValveError::Transport(_)));
    }

    #[tokio::test]
    async fn test_open_command_classifies_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/open").create_async().await;

        let outcome = client_for(&server).open().await;
        assert!(outcome.is_success());
        assert_eq!(outcome.direction, Direction::Open);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_command_transport_failure_is_a_value() {
        let outcome = unreachable_client().close().await;
        assert_eq!(outcome.kind, OutcomeKind::TransportError);
        assert_eq!(outcome.direction, Direction::Close);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_tolerated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/close").create_async().await;

        let config = ValveConfig {
            base_url: format!("{}/", server.url()),
            ..Default::default()
        };
        let outcome = DeviceClient::new(&config)
            .expect("client builds")
            .close()
            .await;
        assert!(outcome.is_success());
        mock.assert_async().await;
    }
}
