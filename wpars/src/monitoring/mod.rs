//! Real-time monitoring of supplicant signals.
//!
//! This module runs the background task that feeds `PropertiesChanged` and
//! `ScanDone` notifications into an interface session.

pub(crate) mod signals;
