//! Resolution of `mullvad status` output into structured state
//!
//! The Mullvad CLI only offers human-readable text, so recognition works
//! by substring: a literal marker for the connected state and a labeled
//! relay line for the server identity. Unexpected output degrades to
//! "disconnected" or an unresolved location, never to a panic; the
//! daemon stays the sole source of truth and nothing here is cached.

use tracing::debug;

use crate::client::{ClientError, VpnClient};
use crate::locations::{self, LocationEntry};

/// Marker token distinguishing connected output. Case-sensitive on
/// purpose: "Disconnected" must not match.
const CONNECTED_MARKER: &str = "Connected";

/// Labels of the line carrying the relay identifier.
const SERVER_LABELS: [&str; 2] = ["Relay:", "Server:"];

/// Where the current connection landed within the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// One of the catalogue locations.
    Known(&'static LocationEntry),
    /// Connected, but not to a catalogue location.
    Other,
}

/// Snapshot of the client's connection state, rebuilt on every query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub connected: bool,
    /// Relay identifier as reported by the client, verbatim.
    pub server_info: Option<String>,
    pub location: Option<Resolved>,
    pub error: Option<ClientError>,
}

impl ConnectionState {
    fn from_error(error: ClientError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Resolved catalogue code, if the connection landed on one.
    pub fn code(&self) -> Option<&'static str> {
        match self.location {
            Some(Resolved::Known(entry)) => Some(entry.code),
            _ => None,
        }
    }
}

/// Query the client and resolve the reported state.
pub async fn query<C: VpnClient>(client: &C) -> ConnectionState {
    match client.status().await {
        Ok(raw) => parse_status(&raw),
        Err(error) => {
            debug!("Status query failed: {}", error);
            ConnectionState::from_error(error)
        }
    }
}

/// Parse raw status output into a connection snapshot.
pub fn parse_status(raw: &str) -> ConnectionState {
    if !raw.contains(CONNECTED_MARKER) {
        return ConnectionState::default();
    }

    let server_info = raw.lines().find_map(|line| {
        if SERVER_LABELS.iter().any(|label| line.contains(label)) {
            line.split_once(':')
                .map(|(_, rest)| rest.trim().to_string())
        } else {
            None
        }
    });

    let location = match &server_info {
        Some(info) => match locations::resolve(info) {
            Some(entry) => Resolved::Known(entry),
            None => Resolved::Other,
        },
        // Connected, but the client did not report which relay.
        None => Resolved::Other,
    };

    ConnectionState {
        connected: true,
        server_info,
        location: Some(location),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FixedClient(Result<String, ClientError>);

    impl VpnClient for FixedClient {
        async fn status(&self) -> Result<String, ClientError> {
            self.0.clone()
        }
        async fn disconnect(&self) -> Result<(), ClientError> {
            unimplemented!()
        }
        async fn set_location(&self, _relay: &[&str]) -> Result<(), ClientError> {
            unimplemented!()
        }
        async fn connect(&self, _server: Option<&str>) -> Result<(), ClientError> {
            unimplemented!()
        }
    }

    #[test]
    fn relay_line_resolves_to_catalogue_code() {
        let state = parse_status("Connected\nRelay: se-sto-wg-001");
        assert!(state.connected);
        assert_eq!(state.server_info.as_deref(), Some("se-sto-wg-001"));
        assert_eq!(state.code(), Some("SWE"));
        assert_eq!(state.error, None);
    }

    #[test]
    fn server_label_is_also_recognized() {
        let state = parse_status("Connected\nServer: jp-tok-wg-001");
        assert_eq!(state.code(), Some("JPN"));
    }

    #[test]
    fn disconnected_output() {
        let state = parse_status("Disconnected");
        assert!(!state.connected);
        assert_eq!(state.location, None);
        assert_eq!(state.server_info, None);
        assert_eq!(state.error, None);
    }

    #[test]
    fn text_without_marker_is_disconnected_without_error() {
        for raw in ["", "Connecting to relay...", "Blocked: no network", "garbage\noutput"] {
            let state = parse_status(raw);
            assert!(!state.connected, "{raw:?} parsed as connected");
            assert_eq!(state.error, None);
        }
    }

    #[test]
    fn unknown_relay_resolves_to_other() {
        let state = parse_status("Connected\nRelay: de-fra-wg-102");
        assert!(state.connected);
        assert_eq!(state.location, Some(Resolved::Other));
        assert_eq!(state.code(), None);
    }

    #[test]
    fn connected_without_relay_line_is_other() {
        let state = parse_status("Connected");
        assert!(state.connected);
        assert_eq!(state.server_info, None);
        assert_eq!(state.location, Some(Resolved::Other));
    }

    #[test]
    fn city_name_matches_when_hostname_differs() {
        let state = parse_status("Connected\nRelay: wireguard exit near Adelaide");
        assert_eq!(state.code(), Some("AUS"));
    }

    #[tokio::test]
    async fn query_folds_client_errors_into_the_state() {
        let error = ClientError::Timeout {
            command: "status".to_string(),
            timeout: Duration::from_secs(10),
        };
        let state = query(&FixedClient(Err(error.clone()))).await;
        assert!(!state.connected);
        assert_eq!(state.error, Some(error));
    }

    #[tokio::test]
    async fn query_parses_successful_output() {
        let client = FixedClient(Ok("Connected\nRelay: us-sfo-wg-001\n".to_string()));
        let state = query(&client).await;
        assert_eq!(state.code(), Some("USA"));
    }
}
