//! Type definitions and constants.
//!
//! This module contains wpa_supplicant D-Bus constants.

pub(crate) mod constants;
