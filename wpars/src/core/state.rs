//! Session state and property-change merging.

use std::collections::HashMap;
use zvariant::OwnedObjectPath;

use crate::api::models::{InterfaceState, PropertyChanges};
use crate::api::network::Network;
use crate::core::scan::ScanResults;
use crate::types::constants::bus;

/// Everything a session knows about its interface.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    /// Supplicant interface object path, once acquired.
    pub iface: Option<OwnedObjectPath>,
    /// Networks sorted by (ssid, frequency).
    pub networks: Vec<Network>,
    pub by_path: HashMap<OwnedObjectPath, Network>,
    /// `CurrentBSS` as last reported, `None` for "/".
    pub reported_bss: Option<OwnedObjectPath>,
    /// `reported_bss` if it names a known network.
    pub current: Option<OwnedObjectPath>,
    pub scanning: bool,
    pub driver: Option<String>,
    pub state: InterfaceState,
}

impl SessionState {
    /// Replaces the network set with freshly reconciled results.
    pub(crate) fn publish(&mut self, results: ScanResults) {
        self.networks = results.networks;
        self.by_path = results.by_path;
        self.resolve_current();
    }

    /// Records the supplicant's `CurrentBSS` and re-resolves the current network.
    pub(crate) fn set_current_bss(&mut self, path: OwnedObjectPath) {
        self.reported_bss = (path.as_str() != bus::NO_OBJECT).then_some(path);
        self.resolve_current();
    }

    fn resolve_current(&mut self) {
        self.current = self
            .reported_bss
            .as_ref()
            .filter(|path| self.by_path.contains_key(*path))
            .cloned();
    }

    /// Applies the fields present in a notification; absent fields are kept.
    pub(crate) fn merge(&mut self, changes: PropertyChanges) {
        if let Some(scanning) = changes.scanning {
            self.scanning = scanning;
        }
        if let Some(state) = changes.state {
            self.state = state;
        }
        if let Some(driver) = changes.driver {
            self.driver = Some(driver);
        }
        if let Some(path) = changes.current_bss {
            self.set_current_bss(path);
        }
    }

    pub(crate) fn current_network(&self) -> Option<Network> {
        self.current
            .as_ref()
            .and_then(|path| self.by_path.get(path))
            .cloned()
    }
}
