//! Subprocess layer for the `mullvad` CLI
//!
//! Every invocation is a scoped child process with an explicit timeout;
//! a step that exceeds its bound is killed and reported the same way as
//! a non-zero exit. The `VpnClient` trait is the seam between the
//! resolution/orchestration logic and the real binary.

use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::config::Config;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Mullvad CLI not found")]
    Unavailable,
    #[error("`mullvad {command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("`mullvad {command}` failed: {message}")]
    Failed { command: String, message: String },
}

/// Control surface of the VPN client, abstracted so orchestration and
/// status resolution can be exercised without the real binary.
#[allow(async_fn_in_trait)]
pub trait VpnClient {
    /// Run the status query and return its raw stdout.
    async fn status(&self) -> Result<String, ClientError>;
    /// Tear down the current tunnel.
    async fn disconnect(&self) -> Result<(), ClientError>;
    /// Point the client at a new relay location.
    async fn set_location(&self, relay: &[&str]) -> Result<(), ClientError>;
    /// Bring the tunnel up, optionally pinned to a specific server.
    async fn connect(&self, server: Option<&str>) -> Result<(), ClientError>;
}

/// The real Mullvad CLI, driven as a subprocess.
pub struct MullvadCli {
    bin: String,
    status_timeout: Duration,
    control_timeout: Duration,
    set_location_timeout: Duration,
    connect_timeout: Duration,
}

impl MullvadCli {
    pub fn new(config: &Config) -> Self {
        Self {
            bin: config.mullvad_bin.clone(),
            status_timeout: Duration::from_secs(config.timeouts.status_secs),
            control_timeout: Duration::from_secs(config.timeouts.control_secs),
            set_location_timeout: Duration::from_secs(config.timeouts.set_location_secs),
            connect_timeout: Duration::from_secs(config.timeouts.connect_secs),
        }
    }

    async fn run(&self, args: &[&str], timeout: Duration) -> Result<String, ClientError> {
        let command = args.join(" ");
        debug!("Running `{} {}` with timeout {:?}", self.bin, command, timeout);

        let output = Command::new(&self.bin)
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(timeout, output).await {
            Err(_) => return Err(ClientError::Timeout { command, timeout }),
            Ok(Err(error)) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClientError::Unavailable);
            }
            Ok(Err(error)) => {
                return Err(ClientError::Failed {
                    command,
                    message: error.to_string(),
                });
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(ClientError::Failed { command, message });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VpnClient for MullvadCli {
    async fn status(&self) -> Result<String, ClientError> {
        self.run(&["status"], self.status_timeout).await
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        self.run(&["disconnect"], self.control_timeout).await.map(drop)
    }

    async fn set_location(&self, relay: &[&str]) -> Result<(), ClientError> {
        let mut args = vec!["relay", "set", "location"];
        args.extend_from_slice(relay);
        self.run(&args, self.set_location_timeout).await.map(drop)
    }

    async fn connect(&self, server: Option<&str>) -> Result<(), ClientError> {
        let args: Vec<&str> = match server {
            Some(server) => vec!["connect", "--server", server],
            None => vec!["connect"],
        };
        self.run(&args, self.connect_timeout).await.map(drop)
    }
}
