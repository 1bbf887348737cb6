//! wpa_supplicant BSS proxy.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::OwnedValue;

/// Proxy for one observed access point.
///
/// Provides the raw SSID/BSSID bytes, RSN capabilities, frequency,
/// signal level, and age of a BSS from the supplicant's scan results.
#[proxy(
    interface = "fi.w1.wpa_supplicant1.BSS",
    default_service = "fi.w1.wpa_supplicant1"
)]
pub trait WpaBss {
    /// SSID as raw bytes (may be NUL padded, may not be valid UTF-8).
    #[zbus(property, name = "SSID")]
    fn ssid(&self) -> Result<Vec<u8>>;

    /// BSSID (MAC address) as raw bytes.
    #[zbus(property, name = "BSSID")]
    fn bssid(&self) -> Result<Vec<u8>>;

    /// RSN information (`KeyMgmt`, `Pairwise`, `Group`, `MgmtGroup`).
    #[zbus(property, name = "RSN")]
    fn rsn(&self) -> Result<HashMap<String, OwnedValue>>;

    /// Operating frequency in MHz.
    #[zbus(property)]
    fn frequency(&self) -> Result<u16>;

    /// Signal level in dBm.
    #[zbus(property)]
    fn signal(&self) -> Result<i16>;

    /// Seconds since the BSS was last seen.
    #[zbus(property)]
    fn age(&self) -> Result<u32>;
}
