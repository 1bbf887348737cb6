//! A Rust library for controlling wpa_supplicant over D-Bus.
//!
//! This crate keeps a live, reconciled view of one wireless interface managed
//! by wpa_supplicant and exposes the commands needed to join a network:
//!
//! - Acquiring (or registering) the supplicant interface object
//! - Requesting scans and tracking the observed access points
//! - Staging, selecting, connecting, and removing network configurations
//! - Following interface state, driver, and the associated BSS
//!
//! # Example
//!
//! ```no_run
//! use wpars::{Interface, ScanKind};
//!
//! # async fn example() -> wpars::Result<()> {
//! let wifi = Interface::open("wlan0").await?;
//!
//! // Scan and list visible networks
//! for net in wifi.scan_and_wait(ScanKind::Active).await? {
//!     println!("{} ({} dBm, {} MHz)", net.ssid(), net.signal(), net.frequency());
//! }
//!
//! // Connect to a network
//! wifi.connect("MyNetwork", "password123").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, WifiError>`. The error type separates bus
//! failures from lookups that found nothing, commands issued in the wrong
//! lifecycle step, and timeouts.
//!
//! # Signal-Based State Tracking
//!
//! The session subscribes to the interface's `PropertiesChanged` and
//! `ScanDone` signals instead of polling. Property changes are merged into
//! the session state as they arrive, and every completed scan triggers a
//! reconciliation of the BSS list. Network records are kept by BSS object
//! path, so a handle obtained before a rescan stays valid after it.
//!
//! Observers subscribe with [`Interface::subscribe`] and receive
//! [`InterfaceEvent`]s. No event is published before initialization has
//! completed, except [`InterfaceEvent::Error`] when it fails.
//!
//! # Testing
//!
//! [`Interface::with_bus`] accepts any [`SupplicantBus`] implementation, so
//! the whole session can run against an in-memory supplicant.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod core;
mod dbus;
mod monitoring;
mod types;
mod util;

// Public API modules
pub mod api;

// Re-exported public API
pub use api::builders;
pub use api::builders::{NetworkConfig, build_network_config};
pub use api::bus::{SignalStream, SupplicantBus};
pub use api::config::SessionConfig;
pub use api::interface::Interface;
pub use api::models::{
    Bssid, InterfaceEvent, InterfaceSignal, InterfaceState, NetworkInfo, NetworkLifecycle,
    NetworkOptions, PropertyChanges, RsnInfo, ScanKind, WifiError,
};
pub use api::network::Network;
pub use dbus::ZbusSupplicant;
pub use util::utils::default_ifname;

/// A specialized `Result` type for supplicant operations.
pub type Result<T> = std::result::Result<T, WifiError>;
