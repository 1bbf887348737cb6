//! Core internal logic for state synchronization.
//!
//! This module contains the internal implementation details for acquiring
//! the supplicant interface, reconciling scan results, and merging signal
//! notifications into session state.

pub(crate) mod interface;
pub(crate) mod scan;
pub(crate) mod session;
pub(crate) mod state;
