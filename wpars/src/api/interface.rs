use log::debug;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::bus::SupplicantBus;
use crate::api::config::SessionConfig;
use crate::api::models::{InterfaceEvent, InterfaceState, NetworkOptions, ScanKind, WifiError};
use crate::api::network::Network;
use crate::core::session::Session;
use crate::dbus::ZbusSupplicant;

/// A wireless interface managed by wpa_supplicant.
///
/// This is the main entry point of the crate. It acquires (or registers) the
/// supplicant interface object, keeps a live view of the scanned networks
/// and interface state, and exposes scan and configuration commands.
///
/// # Creating an Instance
///
/// ```no_run
/// use wpars::Interface;
///
/// # async fn example() -> wpars::Result<()> {
/// // Connects to the system bus; nothing is read until initialization.
/// let wifi = Interface::new("wlan0").await?;
/// wifi.initialize().await?;
///
/// // Or both at once.
/// let wifi = Interface::open("wlan0").await?;
/// # Ok(())
/// # }
/// ```
///
/// # State
///
/// Accessors like [`networks`](Interface::networks) and
/// [`current_network`](Interface::current_network) can be read at any time
/// but are only authoritative once initialization has completed (the
/// [`InterfaceEvent::Ready`] event). Commands wait for initialization
/// themselves.
///
/// # Events
///
/// ```no_run
/// use wpars::{Interface, InterfaceEvent, ScanKind};
///
/// # async fn example() -> wpars::Result<()> {
/// let wifi = Interface::open("wlan0").await?;
/// let mut events = wifi.subscribe();
///
/// wifi.request_scan(ScanKind::Active).await?;
/// while let Ok(event) = events.recv().await {
///     if let InterfaceEvent::ScanDone = event {
///         for net in wifi.networks() {
///             println!("{:30} {} MHz {} dBm", net.ssid(), net.frequency(), net.signal());
///         }
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `Interface` is `Clone`; clones share one session and one signal monitor.
#[derive(Clone)]
pub struct Interface {
    inner: Arc<Session>,
}

impl Interface {
    /// Creates a session for `ifname` over the system D-Bus.
    pub async fn new(ifname: impl Into<String>) -> Result<Self> {
        let bus = ZbusSupplicant::system().await?;
        Ok(Self::with_bus(
            Arc::new(bus),
            SessionConfig::new().with_ifname(ifname),
        ))
    }

    /// Creates a session for `ifname` and initializes it.
    pub async fn open(ifname: impl Into<String>) -> Result<Self> {
        let wifi = Self::new(ifname).await?;
        wifi.initialize().await?;
        Ok(wifi)
    }

    /// Creates a session over the given bus handle.
    ///
    /// Nothing is read from the bus until [`initialize`](Interface::initialize)
    /// is called, explicitly or by a command.
    pub fn with_bus(bus: Arc<dyn SupplicantBus>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(Session::new(bus, config)),
        }
    }

    /// Acquires the supplicant interface and loads the initial state.
    ///
    /// Safe to call any number of times and from concurrent tasks: one
    /// initialization runs and every caller waiting on it receives its
    /// outcome. After a failure the next call tries again.
    ///
    /// On success [`InterfaceEvent::Ready`] and [`InterfaceEvent::Update`]
    /// are published; on failure [`InterfaceEvent::Error`].
    pub async fn initialize(&self) -> Result<()> {
        self.inner.initialize().await
    }

    async fn ready_iface(&self) -> Result<OwnedObjectPath> {
        self.initialize().await?;
        self.inner.iface()
    }

    /// Removes every configured network from the supplicant.
    ///
    /// The scanned network list is unaffected, but every record loses its
    /// staged configuration.
    pub async fn clear_all_networks(&self) -> Result<()> {
        let iface = self.ready_iface().await?;
        self.inner.bus.remove_all_networks(&iface).await?;

        for network in self.networks() {
            network.clear_staged();
        }
        Ok(())
    }

    /// Requests a scan.
    ///
    /// Checks the supplicant's `Scanning` property first and does nothing if a
    /// scan is already running. Returns once the request is accepted; results
    /// arrive with [`InterfaceEvent::ScanDone`].
    pub async fn request_scan(&self, kind: ScanKind) -> Result<()> {
        let iface = self.ready_iface().await?;

        if self.inner.bus.scanning(&iface).await? {
            debug!("Scan already in progress on {}", self.inner.ifname);
            return Ok(());
        }

        self.inner.bus.scan(&iface, kind).await
    }

    /// Requests a scan and waits until its results are reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`WifiError::Timeout`] if no results arrive within the
    /// configured scan timeout, or [`WifiError::Scan`] if the results could
    /// not be read.
    pub async fn scan_and_wait(&self, kind: ScanKind) -> Result<Vec<Network>> {
        self.initialize().await?;
        let mut events = self.subscribe();
        self.request_scan(kind).await?;

        let wait = async {
            loop {
                match events.recv().await {
                    Ok(InterfaceEvent::ScanDone) => return Ok(()),
                    Ok(InterfaceEvent::Warning(e)) => return Err(WifiError::Scan(e)),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Scan waiter lagged by {skipped} events");
                        continue;
                    }
                    Err(RecvError::Closed) => return Err(WifiError::Closed),
                }
            }
        };

        tokio::time::timeout(self.inner.config.scan_timeout, wait)
            .await
            .map_err(|_| WifiError::Timeout)??;

        Ok(self.networks())
    }

    /// Connects to the strongest scanned network named `ssid`.
    ///
    /// # Errors
    ///
    /// Returns [`WifiError::NetworkNotFound`] if no scanned network has that SSID.
    pub async fn connect(&self, ssid: &str, options: impl Into<NetworkOptions>) -> Result<Network> {
        self.initialize().await?;
        let network = self
            .find_by_ssid(ssid)
            .ok_or_else(|| WifiError::NetworkNotFound(ssid.to_string()))?;

        network.connect(options).await?;
        Ok(network)
    }

    /// Disconnects the interface without touching configured networks.
    pub async fn disconnect(&self) -> Result<()> {
        let iface = self.ready_iface().await?;
        self.inner.bus.disconnect(&iface).await
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<InterfaceEvent> {
        self.inner.subscribe()
    }

    /// Stops listening for supplicant signals.
    ///
    /// The session keeps its last known state and commands keep working, but
    /// nothing is refreshed anymore. Calling this more than once is harmless.
    pub fn close(&self) {
        if !self.inner.close() {
            debug!("Interface {} has no running signal monitor", self.inner.ifname);
        }
    }

    /// Scanned networks, sorted by SSID then frequency.
    pub fn networks(&self) -> Vec<Network> {
        self.inner.read_state().networks.clone()
    }

    /// Looks up a scanned network by BSS object path.
    pub fn network(&self, path: &str) -> Option<Network> {
        let path = OwnedObjectPath::try_from(path).ok()?;
        self.inner.read_state().by_path.get(&path).cloned()
    }

    /// Returns the strongest scanned network named `ssid`.
    pub fn find_by_ssid(&self, ssid: &str) -> Option<Network> {
        self.inner
            .read_state()
            .networks
            .iter()
            .filter(|n| n.ssid() == ssid)
            .max_by_key(|n| n.signal())
            .cloned()
    }

    /// The network the interface is associated with, if it was scanned.
    pub fn current_network(&self) -> Option<Network> {
        self.inner.read_state().current_network()
    }

    /// Whether the supplicant is scanning.
    pub fn is_scanning(&self) -> bool {
        self.inner.read_state().scanning
    }

    /// Driver name, once read.
    pub fn driver(&self) -> Option<String> {
        self.inner.read_state().driver.clone()
    }

    /// Supplicant state of the interface.
    pub fn state(&self) -> InterfaceState {
        self.inner.read_state().state.clone()
    }

    /// Whether initialization has completed.
    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    /// Name of the managed network interface.
    pub fn ifname(&self) -> &str {
        &self.inner.ifname
    }

    /// Supplicant object path of the interface, once acquired.
    pub fn path(&self) -> Option<OwnedObjectPath> {
        self.inner.read_state().iface.clone()
    }
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("ifname", &self.inner.ifname)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
