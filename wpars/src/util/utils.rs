//! Utility functions for Wi-Fi data conversion.
//!
//! Provides helpers for converting between Wi-Fi data representations:
//! frequency to channel, SSID bytes to strings, and interface name lookup.

use log::{debug, warn};
use std::fs;

use crate::types::constants::{frequency, ifname};

/// Macro to convert Result to Option with error logging.
/// Usage: `try_log!(result, "context message")`
#[macro_export]
macro_rules! try_log {
    ($result:expr, $context:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{}: {:?}", $context, e);
                return None;
            }
        }
    };
}

/// Converts a Wi-Fi frequency in MHz to a channel number.
///
/// Supports 2.4GHz (channels 1-14), 5GHz, and 6GHz bands.
/// Returns `None` for frequencies outside known Wi-Fi bands.
pub(crate) fn channel_from_freq(mhz: u32) -> Option<u16> {
    match mhz {
        frequency::BAND_2_4_START..=frequency::BAND_2_4_END => {
            Some(((mhz - frequency::BAND_2_4_START) / frequency::CHANNEL_SPACING + 1) as u16)
        }
        frequency::BAND_2_4_CH14 => Some(14),
        frequency::BAND_5_START..=frequency::BAND_5_END => {
            Some(((mhz - 5000) / frequency::CHANNEL_SPACING) as u16)
        }
        frequency::BAND_6_START..=frequency::BAND_6_END => {
            Some(((mhz - frequency::BAND_6_START) / frequency::CHANNEL_SPACING + 1) as u16)
        }
        _ => None,
    }
}

/// Decodes raw SSID bytes into a string.
///
/// Leading and trailing NUL padding is stripped first. Invalid UTF-8 is
/// replaced rather than rejected, since the SSID is only used for display
/// and ordering.
pub(crate) fn decode_ssid(bytes: &[u8]) -> String {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| *b != 0).map_or(start, |i| i + 1);
    let trimmed = &bytes[start..end];

    match std::str::from_utf8(trimmed) {
        Ok(s) => s.to_owned(),
        Err(e) => {
            warn!("Invalid UTF-8 in SSID, decoding lossily: {e}");
            String::from_utf8_lossy(trimmed).into_owned()
        }
    }
}

/// Returns the first network interface whose name looks wireless.
pub(crate) fn wireless_ifname() -> Option<String> {
    let entries = try_log!(
        fs::read_dir(ifname::SYS_CLASS_NET),
        "Failed to list network interfaces"
    );

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(ifname::WIRELESS_PREFIX))
        .collect();
    names.sort();
    names.into_iter().next()
}

/// Returns the interface to manage when none was configured.
///
/// Falls back to `wlan0` when no wireless-looking interface exists.
pub fn default_ifname() -> String {
    match wireless_ifname() {
        Some(name) => name,
        None => {
            debug!("No wireless interface found, using {}", ifname::FALLBACK);
            ifname::FALLBACK.to_string()
        }
    }
}
