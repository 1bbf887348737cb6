//! [`SupplicantBus`] over a zbus connection.

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::collections::HashMap;
use zbus::Connection;
use zbus::proxy::CacheProperties;
use zvariant::{OwnedObjectPath, Value};

use crate::Result;
use crate::api::builders::NetworkConfig;
use crate::api::bus::{SignalStream, SupplicantBus};
use crate::api::models::{InterfaceSignal, PropertyChanges, RsnInfo, ScanKind, WifiError};
use crate::dbus::{WpaBssProxy, WpaInterfaceProxy, WpaSupplicantProxy};
use crate::types::constants::{args, errors};

/// wpa_supplicant reached over D-Bus.
///
/// Proxies are built per call with property caching disabled, so every
/// property read goes to the daemon.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wpars::{Interface, SessionConfig, ZbusSupplicant};
///
/// # async fn example() -> wpars::Result<()> {
/// let bus = ZbusSupplicant::system().await?;
/// let wifi = Interface::with_bus(Arc::new(bus), SessionConfig::new().with_ifname("wlan0"));
/// wifi.initialize().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZbusSupplicant {
    conn: Connection,
}

impl ZbusSupplicant {
    /// Connects to the system bus.
    pub async fn system() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn root(&self) -> Result<WpaSupplicantProxy<'static>> {
        Ok(WpaSupplicantProxy::builder(&self.conn)
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }

    async fn interface(&self, path: &OwnedObjectPath) -> Result<WpaInterfaceProxy<'static>> {
        Ok(WpaInterfaceProxy::builder(&self.conn)
            .path(path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }

    async fn bss(&self, path: &OwnedObjectPath) -> Result<WpaBssProxy<'static>> {
        Ok(WpaBssProxy::builder(&self.conn)
            .path(path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }
}

fn is_method_error(err: &zbus::Error, error_name: &str) -> bool {
    matches!(err, zbus::Error::MethodError(name, _, _) if name.as_str() == error_name)
}

#[async_trait]
impl SupplicantBus for ZbusSupplicant {
    async fn create_interface(&self, ifname: &str) -> Result<OwnedObjectPath> {
        let mut create_args = HashMap::new();
        create_args.insert(args::IFNAME, Value::from(ifname));

        match self.root().await?.create_interface(create_args).await {
            Ok(path) => Ok(path),
            Err(e) if is_method_error(&e, errors::INTERFACE_EXISTS) => {
                debug!("Interface {ifname} is already registered");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_interface(&self, ifname: &str) -> Result<OwnedObjectPath> {
        match self.root().await?.get_interface(ifname).await {
            Ok(path) => Ok(path),
            Err(e) if is_method_error(&e, errors::INTERFACE_UNKNOWN) => {
                Err(WifiError::InterfaceNotFound(ifname.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn bss_paths(&self, iface: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        Ok(self.interface(iface).await?.bsss().await?)
    }

    async fn current_bss(&self, iface: &OwnedObjectPath) -> Result<OwnedObjectPath> {
        Ok(self.interface(iface).await?.current_bss().await?)
    }

    async fn scanning(&self, iface: &OwnedObjectPath) -> Result<bool> {
        Ok(self.interface(iface).await?.scanning().await?)
    }

    async fn driver(&self, iface: &OwnedObjectPath) -> Result<String> {
        Ok(self.interface(iface).await?.driver().await?)
    }

    async fn state(&self, iface: &OwnedObjectPath) -> Result<String> {
        Ok(self.interface(iface).await?.state().await?)
    }

    async fn scan(&self, iface: &OwnedObjectPath, kind: ScanKind) -> Result<()> {
        let mut scan_args = HashMap::new();
        scan_args.insert(args::SCAN_TYPE, Value::from(kind.as_str()));
        Ok(self.interface(iface).await?.scan(scan_args).await?)
    }

    async fn add_network(
        &self,
        iface: &OwnedObjectPath,
        config: NetworkConfig,
    ) -> Result<OwnedObjectPath> {
        Ok(self.interface(iface).await?.add_network(config).await?)
    }

    async fn select_network(
        &self,
        iface: &OwnedObjectPath,
        network: &OwnedObjectPath,
    ) -> Result<()> {
        Ok(self.interface(iface).await?.select_network(network).await?)
    }

    async fn remove_network(
        &self,
        iface: &OwnedObjectPath,
        network: &OwnedObjectPath,
    ) -> Result<()> {
        Ok(self.interface(iface).await?.remove_network(network).await?)
    }

    async fn remove_all_networks(&self, iface: &OwnedObjectPath) -> Result<()> {
        Ok(self.interface(iface).await?.remove_all_networks().await?)
    }

    async fn reconnect(&self, iface: &OwnedObjectPath) -> Result<()> {
        Ok(self.interface(iface).await?.reconnect().await?)
    }

    async fn disconnect(&self, iface: &OwnedObjectPath) -> Result<()> {
        Ok(self.interface(iface).await?.disconnect().await?)
    }

    async fn bss_ssid(&self, bss: &OwnedObjectPath) -> Result<Vec<u8>> {
        Ok(self.bss(bss).await?.ssid().await?)
    }

    async fn bss_bssid(&self, bss: &OwnedObjectPath) -> Result<Vec<u8>> {
        Ok(self.bss(bss).await?.bssid().await?)
    }

    async fn bss_rsn(&self, bss: &OwnedObjectPath) -> Result<Option<RsnInfo>> {
        let dict = self.bss(bss).await?.rsn().await?;
        Ok(RsnInfo::from_dict(&dict))
    }

    async fn bss_frequency(&self, bss: &OwnedObjectPath) -> Result<u16> {
        Ok(self.bss(bss).await?.frequency().await?)
    }

    async fn bss_signal(&self, bss: &OwnedObjectPath) -> Result<i16> {
        Ok(self.bss(bss).await?.signal().await?)
    }

    async fn bss_age(&self, bss: &OwnedObjectPath) -> Result<u32> {
        Ok(self.bss(bss).await?.age().await?)
    }

    async fn subscribe(&self, iface: &OwnedObjectPath) -> Result<SignalStream> {
        let proxy = self.interface(iface).await?;

        let scan_done = proxy.receive_scan_done().await?.filter_map(|signal| {
            let parsed = match signal.args() {
                Ok(args) => Some(InterfaceSignal::ScanDone {
                    success: args.success,
                }),
                Err(e) => {
                    warn!("Malformed ScanDone signal: {e}");
                    None
                }
            };
            future::ready(parsed)
        });

        let changed = proxy
            .receive_properties_changed()
            .await?
            .filter_map(|signal| {
                let parsed = match signal.args() {
                    Ok(args) => Some(InterfaceSignal::PropertiesChanged(
                        PropertyChanges::from_dict(&args.properties),
                    )),
                    Err(e) => {
                        warn!("Malformed PropertiesChanged signal: {e}");
                        None
                    }
                };
                future::ready(parsed)
            });

        debug!("Subscribed to supplicant signals on {iface}");
        Ok(stream::select(scan_done, changed).boxed())
    }
}
