//! Constants for wpa_supplicant D-Bus interface values.
//!
//! These constants correspond to the service names, object paths, and
//! dictionary keys used by wpa_supplicant's D-Bus API.

/// Object paths on the system bus.
pub mod bus {
    /// Object path the supplicant reports when there is no current BSS.
    pub const NO_OBJECT: &str = "/";
}

/// D-Bus error names returned by the supplicant.
pub mod errors {
    pub const INTERFACE_UNKNOWN: &str = "fi.w1.wpa_supplicant1.InterfaceUnknown";
    pub const INTERFACE_EXISTS: &str = "fi.w1.wpa_supplicant1.InterfaceExists";
}

/// Argument keys of root and interface methods.
pub mod args {
    pub const IFNAME: &str = "Ifname";
    pub const SCAN_TYPE: &str = "Type";
}

/// Keys of the `PropertiesChanged` dictionary on an interface object.
pub mod property {
    pub const SCANNING: &str = "Scanning";
    pub const STATE: &str = "State";
    pub const CURRENT_BSS: &str = "CurrentBSS";
    pub const DRIVER: &str = "Driver";
}

/// Keys of the BSS `RSN` dictionary.
pub mod rsn {
    pub const KEY_MGMT: &str = "KeyMgmt";
    pub const PAIRWISE: &str = "Pairwise";
    pub const GROUP: &str = "Group";
    pub const MGMT_GROUP: &str = "MgmtGroup";
}

/// Keys of the `AddNetwork` configuration dictionary.
pub mod network_config {
    pub const SSID: &str = "ssid";
    pub const FREQUENCY: &str = "frequency";
    pub const PSK: &str = "psk";
    pub const KEY_MGMT: &str = "key_mgmt";
    pub const SCAN_SSID: &str = "scan_ssid";
    pub const PRIORITY: &str = "priority";

    /// `key_mgmt` value for open networks.
    pub const KEY_MGMT_NONE: &str = "NONE";

    /// Keys derived from the scanned network or the typed options.
    pub const RESERVED: [&str; 4] = [SSID, FREQUENCY, PSK, KEY_MGMT];
}

/// Interface name lookup defaults.
pub mod ifname {
    pub const SYS_CLASS_NET: &str = "/sys/class/net";
    pub const WIRELESS_PREFIX: char = 'w';
    pub const FALLBACK: &str = "wlan0";
}

/// Session defaults.
pub mod defaults {
    use std::time::Duration;

    /// Buffered events per subscriber before slow receivers start lagging.
    pub const EVENT_CAPACITY: usize = 64;

    const SCAN_TIMEOUT_SECS: u64 = 30;

    /// Returns how long `scan_and_wait` waits for `ScanDone`.
    pub fn scan_timeout() -> Duration {
        Duration::from_secs(SCAN_TIMEOUT_SECS)
    }
}

/// WiFi frequency constants (MHz)
pub mod frequency {
    pub const BAND_2_4_START: u32 = 2412;
    pub const BAND_2_4_END: u32 = 2472;
    pub const BAND_2_4_CH14: u32 = 2484;
    pub const BAND_5_START: u32 = 5150;
    pub const BAND_5_END: u32 = 5925;
    pub const BAND_6_START: u32 = 5955;
    pub const BAND_6_END: u32 = 7115;
    pub const CHANNEL_SPACING: u32 = 5;
}
