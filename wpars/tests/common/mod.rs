//! In-memory supplicant used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use wpars::{
    InterfaceEvent, InterfaceSignal, NetworkConfig, PropertyChanges, Result, RsnInfo, ScanKind,
    SignalStream, SupplicantBus, WifiError,
};
use zvariant::{OwnedObjectPath, Value};

pub const IFACE: &str = "/fi/w1/wpa_supplicant1/Interfaces/0";

pub fn bss_path(index: u32) -> OwnedObjectPath {
    OwnedObjectPath::try_from(format!("{IFACE}/BSSs/{index}")).unwrap()
}

pub fn path(p: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(p).unwrap()
}

/// A remote call observed by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateInterface(String),
    GetInterface(String),
    Scan(ScanKind),
    AddNetwork {
        ssid: String,
        psk: Option<String>,
        key_mgmt: Option<String>,
    },
    SelectNetwork(String),
    RemoveNetwork(String),
    RemoveAllNetworks,
    Reconnect,
    Disconnect,
}

impl Call {
    fn add_network(config: &NetworkConfig) -> Self {
        let text = |key: &str| match config.get(key) {
            Some(Value::Str(s)) => Some(s.as_str().to_string()),
            _ => None,
        };
        Call::AddNetwork {
            ssid: text("ssid").unwrap_or_default(),
            psk: text("psk"),
            key_mgmt: text("key_mgmt"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeBss {
    pub ssid: Vec<u8>,
    pub bssid: Vec<u8>,
    pub rsn: Option<RsnInfo>,
    pub frequency: u16,
    pub signal: i16,
    pub age: u32,
}

impl FakeBss {
    pub fn open(ssid: &str, frequency: u16, signal: i16) -> Self {
        Self {
            ssid: ssid.as_bytes().to_vec(),
            bssid: vec![0x02, 0, 0, 0, 0, frequency as u8],
            rsn: None,
            frequency,
            signal,
            age: 1,
        }
    }

    pub fn secured(ssid: &str, frequency: u16, signal: i16) -> Self {
        Self {
            rsn: Some(RsnInfo {
                key_management: vec!["wpa-psk".into()],
                pairwise: vec!["ccmp".into()],
                group: "ccmp".into(),
                management_group: String::new(),
            }),
            ..Self::open(ssid, frequency, signal)
        }
    }
}

struct FakeState {
    calls: Vec<Call>,
    bss_order: Vec<OwnedObjectPath>,
    bss: HashMap<OwnedObjectPath, FakeBss>,
    failing_bss: HashSet<OwnedObjectPath>,
    current_bss: OwnedObjectPath,
    scanning: bool,
    driver: String,
    state: String,
    registered: bool,
    create_fails: bool,
    add_network_fails: bool,
    create_delay: Option<Duration>,
    scan_done_on_scan: bool,
    on_subscribe: Vec<InterfaceSignal>,
    next_network: u32,
    subscribers: Vec<mpsc::UnboundedSender<InterfaceSignal>>,
}

/// Scriptable stand-in for wpa_supplicant.
pub struct FakeSupplicant {
    state: Mutex<FakeState>,
}

impl Default for FakeSupplicant {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                bss_order: Vec::new(),
                bss: HashMap::new(),
                failing_bss: HashSet::new(),
                current_bss: path("/"),
                scanning: false,
                driver: "nl80211".into(),
                state: "disconnected".into(),
                registered: false,
                create_fails: false,
                add_network_fails: false,
                create_delay: None,
                scan_done_on_scan: false,
                on_subscribe: Vec::new(),
                next_network: 0,
                subscribers: Vec::new(),
            }),
        }
    }
}

impl FakeSupplicant {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Adds a BSS to the `BSSs` list.
    pub fn add_bss(&self, path: OwnedObjectPath, bss: FakeBss) {
        self.with(|s| {
            s.bss_order.push(path.clone());
            s.bss.insert(path, bss);
        });
    }

    /// Removes a BSS from the `BSSs` list.
    pub fn drop_bss(&self, path: &OwnedObjectPath) {
        self.with(|s| {
            s.bss_order.retain(|p| p != path);
            s.bss.remove(path);
        });
    }

    /// Sets the raw `BSSs` list, duplicates included.
    pub fn set_bss_order(&self, order: Vec<OwnedObjectPath>) {
        self.with(|s| s.bss_order = order);
    }

    pub fn set_signal(&self, path: &OwnedObjectPath, signal: i16) {
        self.with(|s| {
            if let Some(bss) = s.bss.get_mut(path) {
                bss.signal = signal;
            }
        });
    }

    pub fn fail_bss(&self, path: OwnedObjectPath) {
        self.with(|s| s.failing_bss.insert(path));
    }

    pub fn heal_bss(&self) {
        self.with(|s| s.failing_bss.clear());
    }

    pub fn set_current_bss(&self, path: OwnedObjectPath) {
        self.with(|s| s.current_bss = path);
    }

    pub fn set_scanning(&self, scanning: bool) {
        self.with(|s| s.scanning = scanning);
    }

    pub fn set_state(&self, state: &str) {
        self.with(|s| s.state = state.to_string());
    }

    /// Makes `CreateInterface` fail as if the interface were already registered.
    pub fn set_registered(&self, registered: bool) {
        self.with(|s| s.registered = registered);
    }

    /// Makes `CreateInterface` fail, and `GetInterface` too unless registered.
    pub fn set_create_fails(&self, fails: bool) {
        self.with(|s| s.create_fails = fails);
    }

    pub fn set_add_network_fails(&self, fails: bool) {
        self.with(|s| s.add_network_fails = fails);
    }

    pub fn set_create_delay(&self, delay: Duration) {
        self.with(|s| s.create_delay = Some(delay));
    }

    /// Emits `ScanDone` whenever `Scan` is called.
    pub fn set_scan_done_on_scan(&self, enabled: bool) {
        self.with(|s| s.scan_done_on_scan = enabled);
    }

    /// Queues `signal` on every new subscription, as if it fired during load.
    pub fn queue_on_subscribe(&self, signal: InterfaceSignal) {
        self.with(|s| s.on_subscribe.push(signal));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|s| s.calls.clone())
    }

    pub fn clear_calls(&self) {
        self.with(|s| s.calls.clear());
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.with(|s| s.calls.iter().filter(|c| pred(c)).count())
    }

    /// Delivers a signal to every subscriber.
    pub fn emit(&self, signal: InterfaceSignal) {
        self.with(|s| {
            s.subscribers
                .retain(|tx| tx.unbounded_send(signal.clone()).is_ok());
        });
    }

    pub fn emit_scan_done(&self) {
        self.emit(InterfaceSignal::ScanDone { success: true });
    }

    pub fn emit_changes(&self, changes: PropertyChanges) {
        self.emit(InterfaceSignal::PropertiesChanged(changes));
    }

    fn record(&self, call: Call) {
        self.with(|s| s.calls.push(call));
    }

    fn read_bss<T>(&self, bss: &OwnedObjectPath, f: impl FnOnce(&FakeBss) -> T) -> Result<T> {
        self.with(|s| {
            if s.failing_bss.contains(bss) {
                return Err(WifiError::Dbus(zbus::Error::Failure(format!(
                    "BSS {bss} vanished"
                ))));
            }
            s.bss
                .get(bss)
                .map(f)
                .ok_or_else(|| WifiError::Dbus(zbus::Error::Failure(format!("no BSS {bss}"))))
        })
    }
}

#[async_trait]
impl SupplicantBus for FakeSupplicant {
    async fn create_interface(&self, ifname: &str) -> Result<OwnedObjectPath> {
        self.record(Call::CreateInterface(ifname.to_string()));
        let delay = self.with(|s| s.create_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.with(|s| {
            if s.create_fails || s.registered {
                Err(WifiError::Dbus(zbus::Error::Failure(
                    "interface already exists".into(),
                )))
            } else {
                s.registered = true;
                Ok(path(IFACE))
            }
        })
    }

    async fn get_interface(&self, ifname: &str) -> Result<OwnedObjectPath> {
        self.record(Call::GetInterface(ifname.to_string()));
        self.with(|s| {
            if s.registered {
                Ok(path(IFACE))
            } else {
                Err(WifiError::InterfaceNotFound(ifname.to_string()))
            }
        })
    }

    async fn bss_paths(&self, _iface: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        Ok(self.with(|s| s.bss_order.clone()))
    }

    async fn current_bss(&self, _iface: &OwnedObjectPath) -> Result<OwnedObjectPath> {
        Ok(self.with(|s| s.current_bss.clone()))
    }

    async fn scanning(&self, _iface: &OwnedObjectPath) -> Result<bool> {
        Ok(self.with(|s| s.scanning))
    }

    async fn driver(&self, _iface: &OwnedObjectPath) -> Result<String> {
        Ok(self.with(|s| s.driver.clone()))
    }

    async fn state(&self, _iface: &OwnedObjectPath) -> Result<String> {
        Ok(self.with(|s| s.state.clone()))
    }

    async fn scan(&self, _iface: &OwnedObjectPath, kind: ScanKind) -> Result<()> {
        self.record(Call::Scan(kind));
        if self.with(|s| s.scan_done_on_scan) {
            self.emit_scan_done();
        }
        Ok(())
    }

    async fn add_network(
        &self,
        iface: &OwnedObjectPath,
        config: NetworkConfig,
    ) -> Result<OwnedObjectPath> {
        self.record(Call::add_network(&config));
        self.with(|s| {
            if s.add_network_fails {
                return Err(WifiError::Dbus(zbus::Error::Failure(
                    "invalid network config".into(),
                )));
            }
            let index = s.next_network;
            s.next_network += 1;
            Ok(path(&format!("{iface}/Networks/{index}")))
        })
    }

    async fn select_network(
        &self,
        _iface: &OwnedObjectPath,
        network: &OwnedObjectPath,
    ) -> Result<()> {
        self.record(Call::SelectNetwork(network.to_string()));
        Ok(())
    }

    async fn remove_network(
        &self,
        _iface: &OwnedObjectPath,
        network: &OwnedObjectPath,
    ) -> Result<()> {
        self.record(Call::RemoveNetwork(network.to_string()));
        Ok(())
    }

    async fn remove_all_networks(&self, _iface: &OwnedObjectPath) -> Result<()> {
        self.record(Call::RemoveAllNetworks);
        Ok(())
    }

    async fn reconnect(&self, _iface: &OwnedObjectPath) -> Result<()> {
        self.record(Call::Reconnect);
        Ok(())
    }

    async fn disconnect(&self, _iface: &OwnedObjectPath) -> Result<()> {
        self.record(Call::Disconnect);
        Ok(())
    }

    async fn bss_ssid(&self, bss: &OwnedObjectPath) -> Result<Vec<u8>> {
        self.read_bss(bss, |b| b.ssid.clone())
    }

    async fn bss_bssid(&self, bss: &OwnedObjectPath) -> Result<Vec<u8>> {
        self.read_bss(bss, |b| b.bssid.clone())
    }

    async fn bss_rsn(&self, bss: &OwnedObjectPath) -> Result<Option<RsnInfo>> {
        self.read_bss(bss, |b| b.rsn.clone())
    }

    async fn bss_frequency(&self, bss: &OwnedObjectPath) -> Result<u16> {
        self.read_bss(bss, |b| b.frequency)
    }

    async fn bss_signal(&self, bss: &OwnedObjectPath) -> Result<i16> {
        self.read_bss(bss, |b| b.signal)
    }

    async fn bss_age(&self, bss: &OwnedObjectPath) -> Result<u32> {
        self.read_bss(bss, |b| b.age)
    }

    async fn subscribe(&self, _iface: &OwnedObjectPath) -> Result<SignalStream> {
        let (tx, rx) = mpsc::unbounded();
        self.with(|s| {
            for signal in &s.on_subscribe {
                let _ = tx.unbounded_send(signal.clone());
            }
            s.subscribers.push(tx);
        });
        Ok(rx.boxed())
    }
}

/// Waits for the next event matching `pred`, skipping others.
pub async fn wait_for(
    events: &mut broadcast::Receiver<InterfaceEvent>,
    pred: impl Fn(&InterfaceEvent) -> bool,
) -> InterfaceEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Collects every event already buffered.
pub fn drain(events: &mut broadcast::Receiver<InterfaceEvent>) -> Vec<InterfaceEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn home() -> OwnedObjectPath {
    bss_path(0)
}

pub fn cafe() -> OwnedObjectPath {
    bss_path(1)
}

/// A supplicant seeing "Home" on 2.4 GHz and "Cafe" on 5 GHz.
pub fn two_networks() -> Arc<FakeSupplicant> {
    init_logging();
    let fake = FakeSupplicant::new();
    fake.add_bss(home(), FakeBss::secured("Home", 2412, -60));
    fake.add_bss(cafe(), FakeBss::open("Cafe", 5180, -70));
    fake
}

pub fn interface(fake: &Arc<FakeSupplicant>) -> wpars::Interface {
    let bus: Arc<dyn SupplicantBus> = fake.clone();
    wpars::Interface::with_bus(bus, wpars::SessionConfig::new().with_ifname("wlan0"))
}

pub fn ssids(networks: &[wpars::Network]) -> Vec<String> {
    networks.iter().map(|n| n.ssid()).collect()
}
