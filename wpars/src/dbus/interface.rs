//! wpa_supplicant Interface proxy.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{ObjectPath, OwnedObjectPath, Value};

/// Proxy for a supplicant-managed network interface.
///
/// # Signals
///
/// The supplicant emits its own `PropertiesChanged` signal on this interface
/// carrying only the properties that changed, and `ScanDone` once a scan
/// request has finished:
///
/// ```ignore
/// let mut stream = iface.receive_scan_done().await?;
/// while let Some(signal) = stream.next().await {
///     println!("scan finished, success = {}", signal.args()?.success);
/// }
/// ```
#[proxy(
    interface = "fi.w1.wpa_supplicant1.Interface",
    default_service = "fi.w1.wpa_supplicant1"
)]
pub trait WpaInterface {
    /// Triggers a scan. `args` must carry `Type` ("active" or "passive").
    fn scan(&self, args: HashMap<&str, Value<'_>>) -> Result<()>;

    /// Adds a configured network and returns its object path.
    fn add_network(&self, args: HashMap<String, Value<'_>>) -> Result<OwnedObjectPath>;

    /// Makes the given configured network the only enabled one.
    fn select_network(&self, network: &ObjectPath<'_>) -> Result<()>;

    /// Removes one configured network.
    fn remove_network(&self, network: &ObjectPath<'_>) -> Result<()>;

    /// Removes every configured network.
    fn remove_all_networks(&self) -> Result<()>;

    /// Reconnects if the interface is disconnected.
    fn reconnect(&self) -> Result<()>;

    /// Disconnects and waits for a reconnect command.
    fn disconnect(&self) -> Result<()>;

    /// Emitted when a scan request has completed.
    #[zbus(signal)]
    fn scan_done(&self, success: bool) -> Result<()>;

    /// Emitted with the subset of interface properties that changed.
    #[zbus(signal)]
    fn properties_changed(&self, properties: HashMap<&str, Value<'_>>) -> Result<()>;

    /// Supplicant state string ("completed", "scanning", ...).
    #[zbus(property)]
    fn state(&self) -> Result<String>;

    /// Whether a scan is in progress.
    #[zbus(property)]
    fn scanning(&self) -> Result<bool>;

    /// Driver name used by the interface.
    #[zbus(property)]
    fn driver(&self) -> Result<String>;

    /// Path of the BSS the interface is associated with ("/" if none).
    #[zbus(property, name = "CurrentBSS")]
    fn current_bss(&self) -> Result<OwnedObjectPath>;

    /// Paths of every BSS from the last scan results.
    #[zbus(property, name = "BSSs")]
    fn bsss(&self) -> Result<Vec<OwnedObjectPath>>;
}
