//! wpa_supplicant network configuration builder.
//!
//! Constructs the dictionary accepted by `fi.w1.wpa_supplicant1.Interface.AddNetwork`.
//! Keys are wpa_supplicant network block fields:
//! - `ssid`: network name
//! - `frequency`: operating frequency of the scanned BSS, in MHz
//! - `psk`: passphrase (absent for open networks)
//! - `key_mgmt`: `NONE` for open networks, otherwise the caller's override
//! - `scan_ssid`: `1` to probe for hidden networks
//! - `priority`: selection priority

use log::warn;
use std::collections::HashMap;
use zvariant::Value;

use crate::api::models::NetworkOptions;
use crate::types::constants::network_config;

/// Argument dictionary for `AddNetwork`.
pub type NetworkConfig = HashMap<String, Value<'static>>;

/// Builds the `AddNetwork` dictionary for a scanned network.
///
/// When `opts` carries no pre-shared key the network is forced open with
/// `key_mgmt=NONE`, overriding any `key_mgmt` the caller set. Extra options
/// named `ssid`, `frequency`, `psk` or `key_mgmt` are ignored.
pub fn build_network_config(ssid: &str, frequency: u32, opts: &NetworkOptions) -> NetworkConfig {
    let mut config = NetworkConfig::new();

    for (key, value) in &opts.extra {
        if network_config::RESERVED.contains(&key.as_str()) {
            warn!("Ignoring extra network option '{key}'; it is set from the network and options");
            continue;
        }
        config.insert(key.clone(), Value::from(value.clone()));
    }

    config.insert(network_config::SSID.into(), Value::from(ssid.to_string()));
    config.insert(
        network_config::FREQUENCY.into(),
        Value::from(i32::try_from(frequency).unwrap_or(i32::MAX)),
    );

    match &opts.psk {
        Some(psk) => {
            config.insert(network_config::PSK.into(), Value::from(psk.clone()));
            if let Some(key_mgmt) = &opts.key_mgmt {
                config.insert(network_config::KEY_MGMT.into(), Value::from(key_mgmt.clone()));
            }
        }
        None => {
            config.insert(
                network_config::KEY_MGMT.into(),
                Value::from(network_config::KEY_MGMT_NONE),
            );
        }
    }

    if opts.scan_ssid {
        config.insert(network_config::SCAN_SSID.into(), Value::from(1i32));
    }
    if let Some(priority) = opts.priority {
        config.insert(network_config::PRIORITY.into(), Value::from(priority));
    }

    config
}
