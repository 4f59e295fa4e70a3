//! Mullvad VPN widgets for Waybar
//!
//! This crate supervises the `mullvad` CLI for a status bar: it resolves
//! the client's free-text status output against a fixed catalogue of
//! exit locations, switches the active location through a
//! disconnect/reconfigure/connect sequence, and renders `{text, tooltip,
//! class}` JSON records for Waybar custom modules.
//!
//! # Architecture
//!
//! - `config`: TOML configuration (binary, timeouts, notifications)
//! - `locations`: static catalogue of exit locations
//! - `client`: `mullvad` subprocess layer with per-call timeouts
//! - `status`: raw status text → structured connection state
//! - `connect`: disconnect/reconfigure/connect orchestration
//! - `cycle`: next/previous navigation over the location list
//! - `waybar`: JSON records for the bar
//! - `notify`: desktop notifications
//!
//! Every widget invocation is a fresh, stateless process; the Mullvad
//! daemon is the only holder of connection state.

pub mod client;
pub mod config;
pub mod connect;
pub mod cycle;
pub mod locations;
pub mod notify;
pub mod status;
pub mod waybar;

pub use config::Config;
