//! Public API module.
//!
//! This module contains the high-level user-facing API for the `wpars` crate.

pub mod builders;
pub mod bus;
pub mod config;
pub mod interface;
pub mod models;
pub mod network;
