//! Waybar JSON records
//!
//! Waybar consumes one `{text, tooltip, class}` object per invocation on
//! stdout. The class strings are part of the bar contract: the bar's CSS
//! selects on them, so they must stay stable even when the wording of
//! text and tooltips changes.

use serde::Serialize;

use crate::locations::LocationEntry;
use crate::status::{ConnectionState, Resolved};

const CLASS_CONNECTED: &str = "vpn-connected";
const CLASS_CONNECTED_OTHER: &str = "vpn-connected-other";
const CLASS_DISCONNECTED: &str = "vpn-disconnected";
const CLASS_ERROR: &str = "vpn-error";
const CLASS_BUTTON_ACTIVE: &str = "button-active";
const CLASS_BUTTON_INACTIVE: &str = "button-inactive";
const CLASS_BUTTON_ERROR: &str = "button-error";

/// Glyphs for the minimal widget.
const GLYPH_LOCKED: &str = "󰒃";
const GLYPH_UNLOCKED: &str = "x";

/// One record consumed by a Waybar `custom` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub text: String,
    pub tooltip: String,
    pub class: String,
}

impl Module {
    fn new(text: impl Into<String>, tooltip: impl Into<String>, class: &str) -> Self {
        Self {
            text: text.into(),
            tooltip: tooltip.into(),
            class: class.to_string(),
        }
    }
}

/// Record for the main status widget.
pub fn status_module(state: &ConnectionState) -> Module {
    if let Some(error) = &state.error {
        return Module::new("VPN ERR", format!("Error: {error}"), CLASS_ERROR);
    }

    if !state.connected {
        return Module::new(
            "VPN OFF",
            "VPN Disconnected\n\nUse buttons to connect to specific locations",
            CLASS_DISCONNECTED,
        );
    }

    match state.location {
        Some(Resolved::Known(entry)) => Module::new(
            format!("VPN {}", entry.code),
            format!(
                "Connected to {}\nServer: {}\n\nRight-click to disconnect",
                entry.name,
                state.server_info.as_deref().unwrap_or(entry.server),
            ),
            CLASS_CONNECTED,
        ),
        _ => Module::new(
            "VPN ON",
            format!(
                "Connected to: {}\n\nRight-click to disconnect",
                state.server_info.as_deref().unwrap_or("unknown server"),
            ),
            CLASS_CONNECTED_OTHER,
        ),
    }
}

/// Record for one per-location button widget.
pub fn button_module(entry: &LocationEntry, state: &ConnectionState) -> Module {
    if state.code() == Some(entry.code) {
        Module::new(
            entry.flag,
            format!("Connected to {}\nClick to reconnect", entry.name),
            CLASS_BUTTON_ACTIVE,
        )
    } else {
        Module::new(
            entry.flag,
            format!("Connect to {}\n({})", entry.name, entry.city),
            CLASS_BUTTON_INACTIVE,
        )
    }
}

/// Record emitted when a button widget is invoked with a bad code.
pub fn button_error() -> Module {
    Module::new("ERR", "Unknown location code", CLASS_BUTTON_ERROR)
}

/// Record for the compact lock-icon widget.
pub fn minimal_module(state: &ConnectionState) -> Module {
    if let Some(error) = &state.error {
        return Module::new(GLYPH_UNLOCKED, format!("Error: {error}"), CLASS_DISCONNECTED);
    }

    if state.connected {
        let tooltip = match state.server_info.as_deref() {
            Some(info) => format!("VPN Connected\nRelay: {info}"),
            None => "VPN Connected".to_string(),
        };
        Module::new(GLYPH_LOCKED, tooltip, CLASS_CONNECTED)
    } else {
        Module::new(GLYPH_UNLOCKED, "VPN Disconnected", CLASS_DISCONNECTED)
    }
}
