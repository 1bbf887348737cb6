use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::types::constants::{property, rsn};

/// Kind of scan to request from the supplicant.
///
/// Active scans send probe requests and also discover hidden networks;
/// passive scans only listen for beacons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanKind {
    /// Probe for networks (the supplicant default).
    #[default]
    Active,
    /// Listen for beacons only.
    Passive,
}

impl ScanKind {
    /// Returns the value of the `Type` key in the `Scan` arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Active => "active",
            ScanKind::Passive => "passive",
        }
    }
}

impl Display for ScanKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware address of an access point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bssid(pub [u8; 6]);

impl Bssid {
    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Bssid {
    type Error = WifiError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw: [u8; 6] = bytes
            .try_into()
            .map_err(|_| WifiError::InvalidBssid(bytes.len()))?;
        Ok(Bssid(raw))
    }
}

impl Display for Bssid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// RSN (WPA2/WPA3) capabilities advertised by an access point.
///
/// Built from the BSS `RSN` property. An access point that advertises no
/// key management suites is treated as open and has no `RsnInfo` at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsnInfo {
    /// Key management suites (e.g. `wpa-psk`, `sae`, `wpa-eap`)
    pub key_management: Vec<String>,
    /// Pairwise ciphers (e.g. `ccmp`)
    pub pairwise: Vec<String>,
    /// Group cipher
    pub group: String,
    /// Management frame protection group cipher
    pub management_group: String,
}

impl RsnInfo {
    /// Parses the supplicant's `RSN` dictionary.
    ///
    /// Returns `None` for open networks, where the supplicant reports an
    /// empty `KeyMgmt` list (or no dictionary entries at all).
    pub fn from_dict(dict: &HashMap<String, OwnedValue>) -> Option<Self> {
        let key_management = dict.get(rsn::KEY_MGMT).map(string_list).unwrap_or_default();
        if key_management.is_empty() {
            return None;
        }

        Some(RsnInfo {
            key_management,
            pairwise: dict.get(rsn::PAIRWISE).map(string_list).unwrap_or_default(),
            group: dict.get(rsn::GROUP).and_then(string).unwrap_or_default(),
            management_group: dict.get(rsn::MGMT_GROUP).and_then(string).unwrap_or_default(),
        })
    }

    /// Returns `true` if any key management suite is pre-shared-key based.
    pub fn is_psk(&self) -> bool {
        self.key_management
            .iter()
            .any(|k| k.contains("psk") || k == "sae")
    }

    /// Returns `true` if any key management suite is 802.1X based.
    pub fn is_eap(&self) -> bool {
        self.key_management.iter().any(|k| k.contains("eap"))
    }
}

fn string(value: &OwnedValue) -> Option<String> {
    match &**value {
        Value::Str(s) => Some(s.as_str().to_string()),
        _ => None,
    }
}

fn string_list(value: &OwnedValue) -> Vec<String> {
    match &**value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Str(s) => Some(s.as_str().to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Supplicant interface states.
///
/// Mirrors the `State` property of a supplicant interface object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InterfaceState {
    /// Not associated and not trying to.
    Disconnected,
    /// No enabled networks; the supplicant is idle.
    Inactive,
    /// Scanning for a network.
    Scanning,
    /// Trying to authenticate with a BSS.
    Authenticating,
    /// Trying to associate with a BSS.
    Associating,
    /// Association completed, key negotiation pending.
    Associated,
    /// WPA 4-way handshake in progress.
    FourWayHandshake,
    /// WPA group key handshake in progress.
    GroupHandshake,
    /// Fully connected.
    Completed,
    /// Interface is disabled.
    InterfaceDisabled,
    /// State not yet read, or reported as unknown.
    #[default]
    Unknown,
    /// Unrecognized state string.
    Other(String),
}

impl InterfaceState {
    /// Returns `true` when the interface is fully connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, InterfaceState::Completed)
    }

    /// Returns `true` while association or key negotiation is in progress.
    pub fn is_connecting(&self) -> bool {
        matches!(
            self,
            InterfaceState::Authenticating
                | InterfaceState::Associating
                | InterfaceState::Associated
                | InterfaceState::FourWayHandshake
                | InterfaceState::GroupHandshake
        )
    }
}

impl From<&str> for InterfaceState {
    fn from(value: &str) -> Self {
        match value {
            "disconnected" => InterfaceState::Disconnected,
            "inactive" => InterfaceState::Inactive,
            "scanning" => InterfaceState::Scanning,
            "authenticating" => InterfaceState::Authenticating,
            "associating" => InterfaceState::Associating,
            "associated" => InterfaceState::Associated,
            "4way_handshake" => InterfaceState::FourWayHandshake,
            "group_handshake" => InterfaceState::GroupHandshake,
            "completed" => InterfaceState::Completed,
            "interface_disabled" => InterfaceState::InterfaceDisabled,
            "unknown" => InterfaceState::Unknown,
            other => InterfaceState::Other(other.to_string()),
        }
    }
}

impl Display for InterfaceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceState::Disconnected => write!(f, "Disconnected"),
            InterfaceState::Inactive => write!(f, "Inactive"),
            InterfaceState::Scanning => write!(f, "Scanning"),
            InterfaceState::Authenticating => write!(f, "Authenticating"),
            InterfaceState::Associating => write!(f, "Associating"),
            InterfaceState::Associated => write!(f, "Associated"),
            InterfaceState::FourWayHandshake => write!(f, "4-way handshake"),
            InterfaceState::GroupHandshake => write!(f, "Group handshake"),
            InterfaceState::Completed => write!(f, "Completed"),
            InterfaceState::InterfaceDisabled => write!(f, "Interface disabled"),
            InterfaceState::Unknown => write!(f, "Unknown"),
            InterfaceState::Other(s) => write!(f, "Other({s})"),
        }
    }
}

/// The subset of interface properties carried by one `PropertiesChanged`
/// notification. Absent fields were not part of the notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyChanges {
    /// New `Scanning` value
    pub scanning: Option<bool>,
    /// New `State` value
    pub state: Option<InterfaceState>,
    /// New `CurrentBSS` path
    pub current_bss: Option<OwnedObjectPath>,
    /// New `Driver` value
    pub driver: Option<String>,
}

impl PropertyChanges {
    /// Extracts the known properties from a `PropertiesChanged` payload.
    ///
    /// Values of an unexpected type are ignored, as are unknown keys.
    pub fn from_dict(dict: &HashMap<&str, Value<'_>>) -> Self {
        let mut changes = PropertyChanges::default();

        if let Some(Value::Bool(scanning)) = dict.get(property::SCANNING) {
            changes.scanning = Some(*scanning);
        }
        if let Some(Value::Str(state)) = dict.get(property::STATE) {
            changes.state = Some(InterfaceState::from(state.as_str()));
        }
        if let Some(Value::ObjectPath(path)) = dict.get(property::CURRENT_BSS) {
            changes.current_bss = Some(OwnedObjectPath::from(path.to_owned()));
        }
        if let Some(Value::Str(driver)) = dict.get(property::DRIVER) {
            changes.driver = Some(driver.as_str().to_string());
        }

        changes
    }

    /// Returns `true` if the notification carried none of the tracked fields.
    pub fn is_empty(&self) -> bool {
        self.scanning.is_none()
            && self.state.is_none()
            && self.current_bss.is_none()
            && self.driver.is_none()
    }
}

/// A signal received from a supplicant interface object.
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceSignal {
    /// Some interface properties changed.
    PropertiesChanged(PropertyChanges),
    /// A scan finished; the BSS list may have changed.
    ScanDone {
        /// Whether the scan itself succeeded
        success: bool,
    },
}

/// Events published by an [`Interface`](crate::Interface) session.
///
/// `Ready`, `Update`, `ScanDone` and `Warning` are only published once the
/// session has been initialized. `Error` reports a failed initialization.
#[derive(Debug, Clone)]
pub enum InterfaceEvent {
    /// Initialization completed; state is now authoritative.
    Ready,
    /// Some part of the session state changed.
    Update,
    /// Scan results were reconciled.
    ScanDone,
    /// A non-fatal failure, e.g. reconciliation after a scan failed.
    Warning(Arc<WifiError>),
    /// Initialization failed.
    Error(Arc<WifiError>),
}

/// Local lifecycle of a network record, as driven through this crate.
///
/// The supplicant only allows one selected network at a time; this value
/// reflects the last command issued through a given record and is not
/// updated when another record is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkLifecycle {
    /// Not yet registered with the supplicant.
    #[default]
    Unstaged,
    /// Registered as a configured network.
    Staged,
    /// Selected as the network to use.
    Selected,
    /// A reconnect was requested after selecting.
    Connected,
    /// A disconnect was requested.
    Disconnected,
}

impl Display for NetworkLifecycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkLifecycle::Unstaged => write!(f, "unstaged"),
            NetworkLifecycle::Staged => write!(f, "staged"),
            NetworkLifecycle::Selected => write!(f, "selected"),
            NetworkLifecycle::Connected => write!(f, "connected"),
            NetworkLifecycle::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Options used when registering a network with the supplicant.
///
/// Without a pre-shared key the network is registered as open
/// (`key_mgmt=NONE`) regardless of `key_mgmt`.
///
/// # Examples
///
/// ```rust
/// use wpars::NetworkOptions;
///
/// // Open network
/// let open = NetworkOptions::default();
///
/// // WPA2-Personal, shorthand for NetworkOptions::new().with_psk("secret")
/// let psk: NetworkOptions = "secret".into();
///
/// // Hidden network with an explicit priority
/// let hidden = NetworkOptions::new()
///     .with_psk("secret")
///     .with_scan_ssid(true)
///     .with_priority(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkOptions {
    /// Pre-shared key (passphrase)
    pub psk: Option<String>,
    /// Key management override (e.g. `SAE`, `WPA-PSK`)
    pub key_mgmt: Option<String>,
    /// Probe for the SSID explicitly (hidden networks)
    pub scan_ssid: bool,
    /// Selection priority, higher is preferred
    pub priority: Option<i32>,
    /// Additional string-valued network fields
    pub extra: Vec<(String, String)>,
}

impl NetworkOptions {
    /// Creates empty options (an open network).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-shared key.
    #[must_use]
    pub fn with_psk(mut self, psk: impl Into<String>) -> Self {
        self.psk = Some(psk.into());
        self
    }

    /// Sets the key management suite.
    #[must_use]
    pub fn with_key_mgmt(mut self, key_mgmt: impl Into<String>) -> Self {
        self.key_mgmt = Some(key_mgmt.into());
        self
    }

    /// Enables probing for a hidden SSID.
    #[must_use]
    pub fn with_scan_ssid(mut self, scan_ssid: bool) -> Self {
        self.scan_ssid = scan_ssid;
        self
    }

    /// Sets the selection priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Adds an arbitrary string-valued network field (e.g. `ieee80211w`).
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

impl From<&str> for NetworkOptions {
    fn from(psk: &str) -> Self {
        NetworkOptions::new().with_psk(psk)
    }
}

impl From<String> for NetworkOptions {
    fn from(psk: String) -> Self {
        NetworkOptions::new().with_psk(psk)
    }
}

/// Plain, serializable snapshot of a network record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// BSS object path
    pub path: String,
    /// Network SSID (name)
    pub ssid: String,
    /// Access point MAC address
    pub bssid: String,
    /// RSN capabilities, `None` for open networks
    pub security: Option<RsnInfo>,
    /// Frequency in MHz
    pub frequency: u32,
    /// Channel number, if the frequency is in a known band
    pub channel: Option<u16>,
    /// Signal level in dBm
    pub signal: i32,
    /// Seconds since last seen
    pub age: u32,
    /// Whether the network is registered with the supplicant
    pub staged: bool,
}

/// Errors that can occur while talking to wpa_supplicant.
///
/// # Examples
///
/// ```no_run
/// use wpars::{Interface, ScanKind, WifiError};
///
/// # async fn example() -> wpars::Result<()> {
/// let wifi = Interface::new("wlan0").await?;
///
/// match wifi.request_scan(ScanKind::Active).await {
///     Ok(()) => println!("Scan requested"),
///     Err(WifiError::Initialization(cause)) => eprintln!("Interface unavailable: {cause}"),
///     Err(e) => eprintln!("Error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Error)]
pub enum WifiError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A D-Bus value could not be converted.
    #[error("D-Bus value error: {0}")]
    Variant(#[from] zvariant::Error),

    /// The supplicant does not know the requested interface.
    #[error("wireless interface not found: {0}")]
    InterfaceNotFound(String),

    /// No scanned network matches the request.
    #[error("network not found: {0}")]
    NetworkNotFound(String),

    /// The network has not been registered with the supplicant.
    #[error("network has not been staged")]
    NotStaged,

    /// A BSSID property did not have six bytes.
    #[error("invalid BSSID length: {0}")]
    InvalidBssid(usize),

    /// Timed out waiting for scan results.
    #[error("timed out waiting for scan results")]
    Timeout,

    /// The session was closed or its signal stream ended.
    #[error("interface session closed")]
    Closed,

    /// Initialization failed; every caller waiting on it gets this error.
    #[error("initialization failed: {0}")]
    Initialization(Arc<WifiError>),

    /// Scan results could not be reconciled.
    #[error("scan reconciliation failed: {0}")]
    Scan(Arc<WifiError>),
}
