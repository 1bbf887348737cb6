//! Session configuration.

use std::time::Duration;

use crate::types::constants::defaults;
use crate::util::utils::default_ifname;

/// Configuration for an [`Interface`](crate::Interface) session.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use wpars::SessionConfig;
///
/// let config = SessionConfig::new()
///     .with_ifname("wlp3s0")
///     .with_event_capacity(128)
///     .with_scan_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.ifname(), "wlp3s0");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interface to manage; `None` picks the first wireless interface.
    pub ifname: Option<String>,
    /// Events buffered per subscriber.
    pub event_capacity: usize,
    /// How long [`Interface::scan_and_wait`](crate::Interface::scan_and_wait)
    /// waits for scan results.
    pub scan_timeout: Duration,
}

impl SessionConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interface to manage.
    #[must_use]
    pub fn with_ifname(mut self, ifname: impl Into<String>) -> Self {
        self.ifname = Some(ifname.into());
        self
    }

    /// Sets how many events each subscriber buffers before lagging.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Sets the scan result timeout.
    #[must_use]
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    /// Returns the configured interface name, or the detected default.
    pub fn ifname(&self) -> String {
        self.ifname.clone().unwrap_or_else(default_ifname)
    }
}

impl Default for SessionConfig {
    /// Returns the default configuration.
    ///
    /// Defaults:
    /// - `ifname`: `None` (first `/sys/class/net` entry starting with `w`, else `wlan0`)
    /// - `event_capacity`: 64
    /// - `scan_timeout`: 30 seconds
    fn default() -> Self {
        Self {
            ifname: None,
            event_capacity: defaults::EVENT_CAPACITY,
            scan_timeout: defaults::scan_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.ifname, None);
        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.scan_timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let config = SessionConfig::new()
            .with_ifname("wlan1")
            .with_event_capacity(0)
            .with_scan_timeout(Duration::from_millis(500));
        assert_eq!(config.ifname(), "wlan1");
        assert_eq!(config.event_capacity, 1);
        assert_eq!(config.scan_timeout, Duration::from_millis(500));
    }
}
