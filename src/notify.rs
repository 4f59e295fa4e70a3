//! Desktop notifications
//!
//! Notifications are advisory. A missing notification daemon must never
//! change the result of a connect, so failures are logged and dropped.

use notify_rust::Notification;
use tracing::debug;

use crate::locations::LocationEntry;

const ICON: &str = "network-vpn";
const TIMEOUT_MS: i32 = 3000;

/// Announce a successful connection.
pub fn connection_established(entry: &LocationEntry) {
    let result = Notification::new()
        .summary("VPN Connected")
        .body(&format!("Connected to {}", entry.name))
        .icon(ICON)
        .timeout(TIMEOUT_MS)
        .show();

    if let Err(error) = result {
        debug!("Notification failed: {}", error);
    }
}
