//! Shared state behind an [`Interface`](crate::Interface) handle.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::bus::{SignalStream, SupplicantBus};
use crate::api::config::SessionConfig;
use crate::api::models::{InterfaceEvent, InterfaceSignal, InterfaceState, WifiError};
use crate::core::interface::acquire_interface;
use crate::core::scan::reconcile;
use crate::core::state::SessionState;
use crate::monitoring::signals::spawn_monitor;

/// Outcome of one initialization attempt, shared by every waiting caller.
type InitFuture = Shared<BoxFuture<'static, std::result::Result<(), Arc<WifiError>>>>;

pub(crate) struct Session {
    pub(crate) bus: Arc<dyn SupplicantBus>,
    pub(crate) config: SessionConfig,
    pub(crate) ifname: String,
    state: RwLock<SessionState>,
    initialized: AtomicBool,
    events: broadcast::Sender<InterfaceEvent>,
    init: Mutex<Option<InitFuture>>,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub(crate) fn new(bus: Arc<dyn SupplicantBus>, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let ifname = config.ifname();

        Self {
            bus,
            config,
            ifname,
            state: RwLock::new(SessionState::default()),
            initialized: AtomicBool::new(false),
            events,
            init: Mutex::new(None),
            monitor: Mutex::new(None),
        }
    }

    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_slot(&self) -> MutexGuard<'_, Option<InitFuture>> {
        self.init.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn monitor_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<InterfaceEvent> {
        self.events.subscribe()
    }

    /// Publishes `event` once the session is initialized; dropped before.
    fn emit(&self, event: InterfaceEvent) {
        if self.is_initialized() {
            // No subscribers is not an error.
            let _ = self.events.send(event);
        }
    }

    /// Runs initialization once, sharing its outcome with concurrent callers.
    ///
    /// A failed attempt is forgotten so a later call starts a new one.
    pub(crate) async fn initialize(self: &Arc<Self>) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let attempt = {
            let mut slot = self.init_slot();
            match slot.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    let session = Arc::clone(self);
                    let attempt = async move { session.open().await }.boxed().shared();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await.map_err(WifiError::Initialization)
    }

    async fn open(self: Arc<Self>) -> std::result::Result<(), Arc<WifiError>> {
        match self.load().await {
            Ok(signals) => {
                self.initialized.store(true, Ordering::Release);
                info!(
                    "Interface {} ready with {} networks",
                    self.ifname,
                    self.read_state().networks.len()
                );
                self.emit(InterfaceEvent::Ready);
                self.emit(InterfaceEvent::Update);

                // Signals buffered during load are only handled after Ready.
                let monitor = spawn_monitor(Arc::downgrade(&self), signals);
                *self.monitor_slot() = Some(monitor);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to initialize interface {}: {e}", self.ifname);
                let error = Arc::new(e);
                let _ = self.events.send(InterfaceEvent::Error(Arc::clone(&error)));
                self.init_slot().take();
                Err(error)
            }
        }
    }

    /// Acquires the interface and reads the initial state.
    ///
    /// Subscribes before reading so that no notification between the reads
    /// and the start of the monitor is lost.
    async fn load(&self) -> Result<SignalStream> {
        let iface = acquire_interface(self.bus.as_ref(), &self.ifname).await?;
        self.write_state().iface = Some(iface.clone());

        let signals = self.bus.subscribe(&iface).await?;
        self.refresh_networks(&iface).await?;

        let current_bss = self.bus.current_bss(&iface).await?;
        let scanning = self.bus.scanning(&iface).await?;
        let driver = self.bus.driver(&iface).await?;
        let state = self.bus.state(&iface).await?;

        let mut guard = self.write_state();
        guard.set_current_bss(current_bss);
        guard.scanning = scanning;
        guard.driver = Some(driver);
        guard.state = InterfaceState::from(state.as_str());

        Ok(signals)
    }

    pub(crate) fn iface(&self) -> Result<OwnedObjectPath> {
        self.read_state()
            .iface
            .clone()
            .ok_or_else(|| WifiError::InterfaceNotFound(self.ifname.clone()))
    }

    /// Reconciles the supplicant's BSS list into the network set.
    pub(crate) async fn refresh_networks(&self, iface: &OwnedObjectPath) -> Result<()> {
        let bss_paths = self.bus.bss_paths(iface).await?;
        let current = self.read_state().by_path.clone();
        let results = reconcile(&self.bus, iface, &current, bss_paths).await?;
        self.write_state().publish(results);
        Ok(())
    }

    pub(crate) async fn handle_signal(&self, signal: InterfaceSignal) {
        match signal {
            InterfaceSignal::PropertiesChanged(changes) => {
                self.write_state().merge(changes);
                self.emit(InterfaceEvent::Update);
            }
            InterfaceSignal::ScanDone { success } => {
                debug!("Scan finished on {} (success: {success})", self.ifname);
                let refreshed = match self.iface() {
                    Ok(iface) => self.refresh_networks(&iface).await,
                    Err(e) => Err(e),
                };

                match refreshed {
                    Ok(()) => {
                        self.emit(InterfaceEvent::ScanDone);
                        self.emit(InterfaceEvent::Update);
                    }
                    Err(e) => {
                        warn!("Failed to refresh scan results on {}: {e}", self.ifname);
                        self.emit(InterfaceEvent::Warning(Arc::new(e)));
                    }
                }
            }
        }
    }

    /// Stops the signal monitor. Returns `false` if none was running.
    pub(crate) fn close(&self) -> bool {
        match self.monitor_slot().take() {
            Some(monitor) => {
                monitor.abort();
                debug!("Stopped signal monitor for {}", self.ifname);
                true
            }
            None => false,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(monitor) = self
            .monitor
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            monitor.abort();
        }
    }
}
