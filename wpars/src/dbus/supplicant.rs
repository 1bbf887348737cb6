//! wpa_supplicant root object proxy.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedObjectPath, Value};

/// Proxy for the root `fi.w1.wpa_supplicant1` interface.
///
/// Used to register a network interface with the supplicant, or to look up
/// the object path of one that is already registered.
#[proxy(
    interface = "fi.w1.wpa_supplicant1",
    default_service = "fi.w1.wpa_supplicant1",
    default_path = "/fi/w1/wpa_supplicant1"
)]
pub trait WpaSupplicant {
    /// Registers an interface. `args` must carry at least `Ifname`.
    fn create_interface(&self, args: HashMap<&str, Value<'_>>) -> Result<OwnedObjectPath>;

    /// Returns the object path of an already registered interface.
    fn get_interface(&self, ifname: &str) -> Result<OwnedObjectPath>;
}
