//! Supplicant interface acquisition.

use log::{debug, info};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::bus::SupplicantBus;

/// Returns the object path of the supplicant interface for `ifname`.
///
/// Registers the interface first; if the supplicant refuses (typically
/// because the interface is already registered), looks up the existing one.
/// The lookup error is the one reported.
pub(crate) async fn acquire_interface(
    bus: &dyn SupplicantBus,
    ifname: &str,
) -> Result<OwnedObjectPath> {
    let path = match bus.create_interface(ifname).await {
        Ok(path) => path,
        Err(e) => {
            debug!("CreateInterface for {ifname} failed ({e}), looking up existing interface");
            bus.get_interface(ifname).await?
        }
    };

    info!("Using supplicant interface {path} for {ifname}");
    Ok(path)
}
