//! Disconnect → reconfigure → connect orchestration
//!
//! Disconnect and the settling delay are best effort: the client may
//! already be down, and waiting merely guards against reconfiguring
//! while the old tunnel is still tearing down. Setting the relay
//! location and connecting are the only steps whose failure aborts the
//! sequence. Nothing is retried within one invocation.

use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::client::VpnClient;
use crate::locations::{self, LocationEntry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Unknown location code: {0}")]
    UnknownLocation(String),
    #[error("Failed to set relay location: {0}")]
    SetLocation(String),
    #[error("Failed to connect: {0}")]
    Connect(String),
}

/// Switch the client to the location named by `code`.
///
/// An unknown code fails before any subprocess is spawned.
pub async fn connect_to<C: VpnClient>(
    client: &C,
    code: &str,
    settle: Duration,
) -> Result<&'static LocationEntry, ConnectError> {
    let entry = locations::lookup(code)
        .ok_or_else(|| ConnectError::UnknownLocation(code.to_string()))?;
    apply(client, entry, settle).await?;
    Ok(entry)
}

async fn apply<C: VpnClient>(
    client: &C,
    entry: &LocationEntry,
    settle: Duration,
) -> Result<(), ConnectError> {
    info!("Disconnecting from current relay");
    if let Err(error) = client.disconnect().await {
        // The client may simply not be connected.
        warn!("Disconnect before reconfigure failed: {}", error);
    }
    sleep(settle).await;

    if entry.relay.is_empty() {
        info!("Connecting to {} ({})", entry.name, entry.server);
        client
            .connect(Some(entry.server))
            .await
            .map_err(|error| ConnectError::Connect(error.to_string()))?;
    } else {
        info!("Setting relay location to {}", entry.name);
        client
            .set_location(entry.relay)
            .await
            .map_err(|error| ConnectError::SetLocation(error.to_string()))?;

        info!("Connecting to {}", entry.name);
        client
            .connect(None)
            .await
            .map_err(|error| ConnectError::Connect(error.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use std::cell::RefCell;

    /// Records every call; fails the steps it is told to fail.
    #[derive(Default)]
    struct ScriptedClient {
        calls: RefCell<Vec<String>>,
        fail_disconnect: bool,
        fail_set_location: bool,
        fail_connect: bool,
    }

    impl ScriptedClient {
        fn step(&self, name: String, fail: bool) -> Result<(), ClientError> {
            self.calls.borrow_mut().push(name.clone());
            if fail {
                Err(ClientError::Failed {
                    command: name,
                    message: "scripted failure".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl VpnClient for ScriptedClient {
        async fn status(&self) -> Result<String, ClientError> {
            unimplemented!()
        }
        async fn disconnect(&self) -> Result<(), ClientError> {
            self.step("disconnect".to_string(), self.fail_disconnect)
        }
        async fn set_location(&self, relay: &[&str]) -> Result<(), ClientError> {
            self.step(format!("set_location {}", relay.join(" ")), self.fail_set_location)
        }
        async fn connect(&self, server: Option<&str>) -> Result<(), ClientError> {
            let name = match server {
                Some(server) => format!("connect --server {server}"),
                None => "connect".to_string(),
            };
            self.step(name, self.fail_connect)
        }
    }

    #[tokio::test]
    async fn unknown_code_spawns_nothing() {
        let client = ScriptedClient::default();
        let result = connect_to(&client, "XXX", Duration::ZERO).await;
        assert_eq!(result, Err(ConnectError::UnknownLocation("XXX".to_string())));
        assert!(client.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn full_sequence_in_order() {
        let client = ScriptedClient::default();
        let entry = connect_to(&client, "aus", Duration::ZERO).await.unwrap();
        assert_eq!(entry.code, "AUS");
        assert_eq!(
            *client.calls.borrow(),
            vec![
                "disconnect".to_string(),
                "set_location au adl au-adl-wg-301".to_string(),
                "connect".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn disconnect_failure_is_not_fatal() {
        let client = ScriptedClient {
            fail_disconnect: true,
            ..ScriptedClient::default()
        };
        let result = connect_to(&client, "SGP", Duration::ZERO).await;
        assert!(result.is_ok());
        assert_eq!(client.calls.borrow().len(), 3);
    }

    #[tokio::test]
    async fn set_location_failure_aborts_before_connect() {
        let client = ScriptedClient {
            fail_set_location: true,
            ..ScriptedClient::default()
        };
        let result = connect_to(&client, "AUS", Duration::ZERO).await;
        assert!(matches!(result, Err(ConnectError::SetLocation(_))));
        let calls = client.calls.borrow();
        assert!(!calls.iter().any(|call| call.starts_with("connect")));
    }

    #[tokio::test]
    async fn connect_failure_is_reported() {
        let client = ScriptedClient {
            fail_connect: true,
            ..ScriptedClient::default()
        };
        let result = connect_to(&client, "UK", Duration::ZERO).await;
        assert!(matches!(result, Err(ConnectError::Connect(_))));
    }

    #[tokio::test]
    async fn entry_without_relay_arguments_connects_by_server_name() {
        let entry = LocationEntry {
            code: "TST",
            name: "Testland",
            city: "Test City",
            server: "ts-tst-wg-001",
            relay: &[],
            flag: "🏴",
        };
        let client = ScriptedClient::default();
        apply(&client, &entry, Duration::ZERO).await.unwrap();
        assert_eq!(
            *client.calls.borrow(),
            vec![
                "disconnect".to_string(),
                "connect --server ts-tst-wg-001".to_string(),
            ]
        );
    }
}
