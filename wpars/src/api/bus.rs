//! The bus operations a session needs from wpa_supplicant.
//!
//! [`SupplicantBus`] is the seam between the reconciliation engine and the
//! message bus. [`ZbusSupplicant`](crate::ZbusSupplicant) implements it over
//! the system D-Bus; tests and embedders may provide their own.

use async_trait::async_trait;
use futures::stream::BoxStream;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::builders::NetworkConfig;
use crate::api::models::{InterfaceSignal, RsnInfo, ScanKind};

/// Stream of signals emitted by one supplicant interface object.
pub type SignalStream = BoxStream<'static, InterfaceSignal>;

/// Remote operations on the supplicant daemon.
///
/// `iface` arguments are interface object paths as returned by
/// [`create_interface`](SupplicantBus::create_interface) or
/// [`get_interface`](SupplicantBus::get_interface); `bss` arguments are BSS
/// object paths from [`bss_paths`](SupplicantBus::bss_paths).
///
/// Property reads must go to the daemon rather than a local cache.
#[async_trait]
pub trait SupplicantBus: Send + Sync {
    /// Registers `ifname` with the supplicant and returns its object path.
    async fn create_interface(&self, ifname: &str) -> Result<OwnedObjectPath>;

    /// Looks up the object path of an already registered interface.
    async fn get_interface(&self, ifname: &str) -> Result<OwnedObjectPath>;

    /// Reads the interface `BSSs` property.
    async fn bss_paths(&self, iface: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>>;

    /// Reads the interface `CurrentBSS` property.
    async fn current_bss(&self, iface: &OwnedObjectPath) -> Result<OwnedObjectPath>;

    /// Reads the interface `Scanning` property.
    async fn scanning(&self, iface: &OwnedObjectPath) -> Result<bool>;

    /// Reads the interface `Driver` property.
    async fn driver(&self, iface: &OwnedObjectPath) -> Result<String>;

    /// Reads the interface `State` property.
    async fn state(&self, iface: &OwnedObjectPath) -> Result<String>;

    /// Calls `Scan` with the given scan type.
    async fn scan(&self, iface: &OwnedObjectPath, kind: ScanKind) -> Result<()>;

    /// Calls `AddNetwork` and returns the configured network's path.
    async fn add_network(
        &self,
        iface: &OwnedObjectPath,
        config: NetworkConfig,
    ) -> Result<OwnedObjectPath>;

    /// Calls `SelectNetwork`.
    async fn select_network(
        &self,
        iface: &OwnedObjectPath,
        network: &OwnedObjectPath,
    ) -> Result<()>;

    /// Calls `RemoveNetwork`.
    async fn remove_network(
        &self,
        iface: &OwnedObjectPath,
        network: &OwnedObjectPath,
    ) -> Result<()>;

    /// Calls `RemoveAllNetworks`.
    async fn remove_all_networks(&self, iface: &OwnedObjectPath) -> Result<()>;

    /// Calls `Reconnect`.
    async fn reconnect(&self, iface: &OwnedObjectPath) -> Result<()>;

    /// Calls `Disconnect`.
    async fn disconnect(&self, iface: &OwnedObjectPath) -> Result<()>;

    /// Reads the BSS `SSID` property (raw bytes).
    async fn bss_ssid(&self, bss: &OwnedObjectPath) -> Result<Vec<u8>>;

    /// Reads the BSS `BSSID` property (raw bytes).
    async fn bss_bssid(&self, bss: &OwnedObjectPath) -> Result<Vec<u8>>;

    /// Reads and parses the BSS `RSN` property; `None` for open networks.
    async fn bss_rsn(&self, bss: &OwnedObjectPath) -> Result<Option<RsnInfo>>;

    /// Reads the BSS `Frequency` property.
    async fn bss_frequency(&self, bss: &OwnedObjectPath) -> Result<u16>;

    /// Reads the BSS `Signal` property.
    async fn bss_signal(&self, bss: &OwnedObjectPath) -> Result<i16>;

    /// Reads the BSS `Age` property.
    async fn bss_age(&self, bss: &OwnedObjectPath) -> Result<u32>;

    /// Subscribes to `PropertiesChanged` and `ScanDone` on an interface.
    ///
    /// Signals are buffered from the moment this returns, so no notification
    /// is lost between subscribing and starting to poll the stream.
    async fn subscribe(&self, iface: &OwnedObjectPath) -> Result<SignalStream>;
}
