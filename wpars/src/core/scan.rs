//! Scan result reconciliation.
//!
//! Turns the supplicant's BSS path list into the session's network set,
//! reusing records whose BSS survived the rescan.

use futures::future::try_join_all;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::bus::SupplicantBus;
use crate::api::models::Bssid;
use crate::api::network::{BssProperties, Network};
use crate::util::utils::decode_ssid;

/// A reconciled network set.
#[derive(Debug, Default)]
pub(crate) struct ScanResults {
    /// Records sorted by (ssid ignoring case, frequency, path).
    pub networks: Vec<Network>,
    /// The same records keyed by BSS path.
    pub by_path: HashMap<OwnedObjectPath, Network>,
}

impl ScanResults {
    /// Orders `records` and builds the path index from the final list.
    ///
    /// SSIDs compare case-insensitively first; the exact SSID, frequency and
    /// path break ties.
    pub(crate) fn from_records(mut records: Vec<Network>) -> Self {
        records.sort_by_cached_key(|n| {
            let ssid = n.ssid();
            (ssid.to_lowercase(), ssid, n.frequency(), n.path().to_string())
        });

        let by_path = records
            .iter()
            .map(|n| (n.path().clone(), n.clone()))
            .collect();

        Self {
            networks: records,
            by_path,
        }
    }
}

/// Reads the six BSS properties concurrently.
///
/// Fails on the first property read that fails.
pub(crate) async fn fetch_bss(bus: &dyn SupplicantBus, bss: &OwnedObjectPath) -> Result<BssProperties> {
    let (ssid, bssid, security, frequency, signal, age) = futures::try_join!(
        bus.bss_ssid(bss),
        bus.bss_bssid(bss),
        bus.bss_rsn(bss),
        bus.bss_frequency(bss),
        bus.bss_signal(bss),
        bus.bss_age(bss),
    )?;

    Ok(BssProperties {
        ssid: decode_ssid(&ssid),
        bssid: Bssid::try_from(bssid.as_slice())?,
        security,
        frequency: u32::from(frequency),
        signal: i32::from(signal),
        age,
    })
}

/// Reconciles `bss_paths` against the records in `current`.
///
/// Records are reused by path, all BSSs are fetched concurrently, and the
/// first failure aborts the whole reconciliation. Records are only updated
/// once every fetch has succeeded, so a failed reconciliation leaves the
/// published records untouched.
pub(crate) async fn reconcile(
    bus: &Arc<dyn SupplicantBus>,
    iface: &OwnedObjectPath,
    current: &HashMap<OwnedObjectPath, Network>,
    bss_paths: Vec<OwnedObjectPath>,
) -> Result<ScanResults> {
    let mut seen = HashSet::new();
    let records: Vec<Network> = bss_paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .map(|path| match current.get(&path) {
            Some(existing) => existing.clone(),
            None => Network::new(Arc::clone(bus), iface.clone(), path),
        })
        .collect();

    let fetched = try_join_all(records.iter().map(|n| fetch_bss(bus.as_ref(), n.path()))).await?;

    for (network, props) in records.iter().zip(fetched) {
        network.apply(props);
    }

    debug!(
        "Reconciled {} BSSs ({} reused)",
        records.len(),
        records.iter().filter(|n| current.contains_key(n.path())).count()
    );

    Ok(ScanResults::from_records(records))
}
