//! D-Bus proxy interfaces for wpa_supplicant.
//!
//! This module contains low-level D-Bus proxy definitions for communicating
//! with wpa_supplicant over the system bus, plus the zbus-backed
//! implementation of [`SupplicantBus`](crate::SupplicantBus).
//!
//! # wpa_supplicant D-Bus Structure
//!
//! - `/fi/w1/wpa_supplicant1` - Root object (interface creation/lookup)
//! - `/fi/w1/wpa_supplicant1/Interfaces/N` - One object per managed interface
//! - `/fi/w1/wpa_supplicant1/Interfaces/N/BSSs/M` - Observed access points
//! - `/fi/w1/wpa_supplicant1/Interfaces/N/Networks/M` - Configured networks

mod backend;
mod bss;
mod interface;
mod supplicant;

pub use backend::ZbusSupplicant;
pub(crate) use bss::WpaBssProxy;
pub(crate) use interface::WpaInterfaceProxy;
pub(crate) use supplicant::WpaSupplicantProxy;
