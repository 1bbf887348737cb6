//! Configuration builders for supplicant networks.
//!
//! This module provides functions to construct the `AddNetwork` argument
//! dictionary passed to wpa_supplicant's D-Bus API.
//!
//! # When to Use These
//!
//! Most users should stage networks through [`Network::stage`](crate::Network::stage)
//! or [`Network::connect`](crate::Network::connect). The builder is exposed for
//! callers that drive [`SupplicantBus`](crate::SupplicantBus) directly.
//!
//! # Examples
//!
//! ```rust
//! use wpars::builders::build_network_config;
//! use wpars::NetworkOptions;
//!
//! let config = build_network_config("MyNetwork", 2412, &NetworkOptions::from("password"));
//! assert!(config.contains_key("psk"));
//! ```

pub mod network;

pub use network::{NetworkConfig, build_network_config};
