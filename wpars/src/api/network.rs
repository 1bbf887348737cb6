//! Observed networks and their lifecycle commands.

use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::builders::build_network_config;
use crate::api::bus::SupplicantBus;
use crate::api::models::{Bssid, NetworkInfo, NetworkLifecycle, NetworkOptions, RsnInfo, WifiError};
use crate::util::utils::channel_from_freq;

/// Properties of a BSS as read from the supplicant.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BssProperties {
    pub ssid: String,
    pub bssid: Bssid,
    pub security: Option<RsnInfo>,
    pub frequency: u32,
    pub signal: i32,
    pub age: u32,
}

#[derive(Debug, Default)]
struct StagedConfig {
    path: Option<OwnedObjectPath>,
    lifecycle: NetworkLifecycle,
}

struct NetworkInner {
    path: OwnedObjectPath,
    iface: OwnedObjectPath,
    bus: Arc<dyn SupplicantBus>,
    props: RwLock<BssProperties>,
    staged: Mutex<StagedConfig>,
}

/// One access point observed by the supplicant.
///
/// A `Network` is a cheap, clonable handle. When a BSS is still present
/// after a rescan, the session keeps the same record and refreshes its
/// properties in place, so any configuration staged through it survives.
///
/// # Lifecycle
///
/// `Unstaged -> Staged -> Selected -> Connected / Disconnected`
///
/// [`select`](Network::select), [`connect`](Network::connect) and
/// [`disconnect`](Network::disconnect) stage the network first when needed.
///
/// # Example
///
/// ```no_run
/// use wpars::Interface;
///
/// # async fn example() -> wpars::Result<()> {
/// let wifi = Interface::open("wlan0").await?;
///
/// if let Some(network) = wifi.find_by_ssid("HomeWiFi") {
///     network.connect("my_secure_password").await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Network {
    inner: Arc<NetworkInner>,
}

impl Network {
    pub(crate) fn new(
        bus: Arc<dyn SupplicantBus>,
        iface: OwnedObjectPath,
        path: OwnedObjectPath,
    ) -> Self {
        Self {
            inner: Arc::new(NetworkInner {
                path,
                iface,
                bus,
                props: RwLock::new(BssProperties::default()),
                staged: Mutex::new(StagedConfig::default()),
            }),
        }
    }

    fn props(&self) -> RwLockReadGuard<'_, BssProperties> {
        self.inner.props.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn staged(&self) -> MutexGuard<'_, StagedConfig> {
        self.inner.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn apply(&self, props: BssProperties) {
        *self.inner.props.write().unwrap_or_else(PoisonError::into_inner) = props;
    }

    pub(crate) fn clear_staged(&self) {
        let mut staged = self.staged();
        staged.path = None;
        staged.lifecycle = NetworkLifecycle::Unstaged;
    }

    /// Returns `true` if both handles refer to the same record.
    pub fn ptr_eq(a: &Network, b: &Network) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// BSS object path; the record's identity.
    pub fn path(&self) -> &OwnedObjectPath {
        &self.inner.path
    }

    /// Network SSID, with NUL padding removed.
    pub fn ssid(&self) -> String {
        self.props().ssid.clone()
    }

    /// Access point MAC address.
    pub fn bssid(&self) -> Bssid {
        self.props().bssid
    }

    /// RSN capabilities, `None` for open networks.
    pub fn security(&self) -> Option<RsnInfo> {
        self.props().security.clone()
    }

    /// Returns `true` if the access point advertises RSN key management.
    pub fn is_secured(&self) -> bool {
        self.props().security.is_some()
    }

    /// Frequency in MHz.
    pub fn frequency(&self) -> u32 {
        self.props().frequency
    }

    /// Channel number derived from the frequency.
    pub fn channel(&self) -> Option<u16> {
        channel_from_freq(self.frequency())
    }

    /// Signal level in dBm.
    pub fn signal(&self) -> i32 {
        self.props().signal
    }

    /// Seconds since the BSS was last seen.
    pub fn age(&self) -> u32 {
        self.props().age
    }

    /// Path of the configured network created by [`stage`](Network::stage).
    pub fn staged_path(&self) -> Option<OwnedObjectPath> {
        self.staged().path.clone()
    }

    /// Returns `true` once the network has been staged.
    pub fn is_staged(&self) -> bool {
        self.staged().path.is_some()
    }

    /// Last lifecycle step completed through this record.
    pub fn lifecycle(&self) -> NetworkLifecycle {
        self.staged().lifecycle
    }

    /// Returns a plain snapshot of the record.
    pub fn info(&self) -> NetworkInfo {
        let props = self.props().clone();
        NetworkInfo {
            path: self.inner.path.to_string(),
            channel: channel_from_freq(props.frequency),
            ssid: props.ssid,
            bssid: props.bssid.to_string(),
            security: props.security,
            frequency: props.frequency,
            signal: props.signal,
            age: props.age,
            staged: self.is_staged(),
        }
    }

    /// Registers this network with the supplicant.
    ///
    /// Submits the SSID, frequency, and `options`. Without a pre-shared key
    /// the network is registered as open. Calling this again registers a new
    /// configured network and replaces the stored path.
    pub async fn stage(&self, options: impl Into<NetworkOptions>) -> Result<()> {
        let options = options.into();
        let (ssid, frequency) = {
            let props = self.props();
            (props.ssid.clone(), props.frequency)
        };

        debug!("Staging network '{ssid}' ({})", self.inner.path);
        let config = build_network_config(&ssid, frequency, &options);
        let configured = self.inner.bus.add_network(&self.inner.iface, config).await?;
        debug!("Network '{ssid}' staged as {configured}");

        let mut staged = self.staged();
        staged.path = Some(configured);
        staged.lifecycle = NetworkLifecycle::Staged;
        Ok(())
    }

    async fn ensure_staged(&self, options: NetworkOptions) -> Result<OwnedObjectPath> {
        if let Some(path) = self.staged_path() {
            return Ok(path);
        }
        self.stage(options).await?;
        self.staged_path().ok_or(WifiError::NotStaged)
    }

    /// Makes this the network the supplicant should use.
    ///
    /// Stages the network with `options` first if it is not staged yet;
    /// `options` are ignored for an already staged network. The supplicant
    /// disables every other configured network when one is selected.
    pub async fn select(&self, options: impl Into<NetworkOptions>) -> Result<()> {
        let configured = self.ensure_staged(options.into()).await?;
        self.inner
            .bus
            .select_network(&self.inner.iface, &configured)
            .await?;
        self.staged().lifecycle = NetworkLifecycle::Selected;
        Ok(())
    }

    /// Selects this network and asks the supplicant to reconnect.
    ///
    /// Accepts [`NetworkOptions`] or, as shorthand, a pre-shared key:
    ///
    /// ```no_run
    /// # async fn example(network: wpars::Network) -> wpars::Result<()> {
    /// network.connect("secret").await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// If staging fails, neither select nor reconnect is attempted.
    pub async fn connect(&self, options: impl Into<NetworkOptions>) -> Result<()> {
        self.select(options).await?;
        self.inner.bus.reconnect(&self.inner.iface).await?;
        self.staged().lifecycle = NetworkLifecycle::Connected;
        Ok(())
    }

    /// Selects this network, then disconnects the interface.
    ///
    /// An unstaged network is staged as open first. Use
    /// [`Interface::disconnect`](crate::Interface::disconnect) to disconnect
    /// without touching the configured networks.
    pub async fn disconnect(&self) -> Result<()> {
        self.select(NetworkOptions::default()).await?;
        self.inner.bus.disconnect(&self.inner.iface).await?;
        self.staged().lifecycle = NetworkLifecycle::Disconnected;
        Ok(())
    }

    /// Removes the configured network created by [`stage`](Network::stage).
    ///
    /// On success the record returns to the unstaged state.
    ///
    /// # Errors
    ///
    /// Returns [`WifiError::NotStaged`] if the network was never staged.
    pub async fn remove(&self) -> Result<()> {
        let configured = self.staged_path().ok_or(WifiError::NotStaged)?;
        self.inner
            .bus
            .remove_network(&self.inner.iface, &configured)
            .await?;

        let mut staged = self.staged();
        // A concurrent re-stage may have replaced the path meanwhile.
        if staged.path.as_ref() == Some(&configured) {
            staged.path = None;
            staged.lifecycle = NetworkLifecycle::Unstaged;
        }
        Ok(())
    }
}

impl Debug for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let props = self.props();
        f.debug_struct("Network")
            .field("path", &self.inner.path.as_str())
            .field("ssid", &props.ssid)
            .field("frequency", &props.frequency)
            .field("signal", &props.signal)
            .field("staged", &self.staged_path().map(|p| p.to_string()))
            .finish()
    }
}
