//! Session lifecycle tests: initialization, events, and signal handling.

mod common;

use common::*;
use std::time::Duration;
use wpars::{InterfaceEvent, InterfaceSignal, InterfaceState, PropertyChanges, ScanKind, WifiError};

#[tokio::test]
async fn initialize_loads_initial_state() {
    let fake = two_networks();
    fake.set_current_bss(home());
    fake.set_state("completed");
    let wifi = interface(&fake);

    assert!(!wifi.is_initialized());
    wifi.initialize().await.unwrap();

    assert!(wifi.is_initialized());
    assert_eq!(wifi.path(), Some(path(IFACE)));
    assert_eq!(wifi.driver().as_deref(), Some("nl80211"));
    assert_eq!(wifi.state(), InterfaceState::Completed);
    assert!(!wifi.is_scanning());
    assert_eq!(wifi.networks().len(), 2);
    assert_eq!(wifi.current_network().unwrap().ssid(), "Home");
    assert_eq!(fake.calls(), vec![Call::CreateInterface("wlan0".into())]);
}

#[tokio::test]
async fn existing_interface_is_looked_up() {
    let fake = two_networks();
    fake.set_registered(true);
    let wifi = interface(&fake);

    wifi.initialize().await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![
            Call::CreateInterface("wlan0".into()),
            Call::GetInterface("wlan0".into()),
        ]
    );
    assert_eq!(wifi.path(), Some(path(IFACE)));
}

#[tokio::test]
async fn no_events_before_initialization() {
    let fake = two_networks();
    let wifi = interface(&fake);
    let mut events = wifi.subscribe();

    assert!(drain(&mut events).is_empty());
    assert!(wifi.networks().is_empty());
    assert!(wifi.current_network().is_none());

    wifi.initialize().await.unwrap();

    let seen = drain(&mut events);
    assert!(matches!(seen[0], InterfaceEvent::Ready));
    assert!(matches!(seen[1], InterfaceEvent::Update));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ready_precedes_signals_received_during_load() {
    for _ in 0..50 {
        let fake = two_networks();
        fake.queue_on_subscribe(InterfaceSignal::PropertiesChanged(PropertyChanges {
            scanning: Some(true),
            ..Default::default()
        }));
        fake.queue_on_subscribe(InterfaceSignal::ScanDone { success: true });
        let wifi = interface(&fake);
        let mut events = wifi.subscribe();

        wifi.initialize().await.unwrap();

        let first = wait_for(&mut events, |_| true).await;
        assert!(matches!(first, InterfaceEvent::Ready), "got {first:?}");
        let second = wait_for(&mut events, |_| true).await;
        assert!(matches!(second, InterfaceEvent::Update), "got {second:?}");
        wait_for(&mut events, |e| matches!(e, InterfaceEvent::ScanDone)).await;
        assert!(wifi.is_scanning());
    }
}

#[tokio::test]
async fn failed_initialization_reports_error_and_retries() {
    let fake = two_networks();
    fake.set_create_fails(true);
    let wifi = interface(&fake);
    let mut events = wifi.subscribe();

    let err = wifi.initialize().await.unwrap_err();
    match err {
        WifiError::Initialization(cause) => {
            assert!(matches!(*cause, WifiError::InterfaceNotFound(ref name) if name == "wlan0"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!wifi.is_initialized());

    let seen = drain(&mut events);
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], InterfaceEvent::Error(_)));

    fake.set_create_fails(false);
    wifi.initialize().await.unwrap();
    assert!(wifi.is_initialized());
    assert_eq!(
        fake.count(|c| matches!(c, Call::CreateInterface(_))),
        2,
        "a failed attempt must not be cached"
    );
}

#[tokio::test]
async fn concurrent_initialize_runs_once() {
    let fake = two_networks();
    fake.set_create_delay(Duration::from_millis(20));
    let wifi = interface(&fake);
    let mut events = wifi.subscribe();

    let (a, b, c) = tokio::join!(wifi.initialize(), wifi.initialize(), wifi.initialize());
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(fake.count(|c| matches!(c, Call::CreateInterface(_))), 1);
    let ready = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, InterfaceEvent::Ready))
        .count();
    assert_eq!(ready, 1);

    wifi.initialize().await.unwrap();
    assert_eq!(fake.count(|c| matches!(c, Call::CreateInterface(_))), 1);
}

#[tokio::test]
async fn concurrent_failure_is_shared() {
    let fake = two_networks();
    fake.set_create_fails(true);
    fake.set_create_delay(Duration::from_millis(20));
    let wifi = interface(&fake);

    let (a, b) = tokio::join!(wifi.initialize(), wifi.initialize());

    assert!(matches!(a, Err(WifiError::Initialization(_))));
    assert!(matches!(b, Err(WifiError::Initialization(_))));
    assert_eq!(fake.count(|c| matches!(c, Call::CreateInterface(_))), 1);
}

#[tokio::test]
async fn scanning_change_touches_only_scanning() {
    let fake = two_networks();
    fake.set_current_bss(home());
    fake.set_state("completed");
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();
    let mut events = wifi.subscribe();

    fake.emit_changes(PropertyChanges {
        scanning: Some(true),
        ..Default::default()
    });
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::Update)).await;

    assert!(wifi.is_scanning());
    assert_eq!(wifi.state(), InterfaceState::Completed);
    assert_eq!(wifi.driver().as_deref(), Some("nl80211"));
    assert_eq!(wifi.current_network().unwrap().path(), &home());
}

#[tokio::test]
async fn current_network_follows_current_bss() {
    let fake = two_networks();
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();
    let mut events = wifi.subscribe();
    assert!(wifi.current_network().is_none());

    fake.emit_changes(PropertyChanges {
        current_bss: Some(cafe()),
        state: Some(InterfaceState::Completed),
        ..Default::default()
    });
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::Update)).await;
    assert_eq!(wifi.current_network().unwrap().ssid(), "Cafe");
    assert!(wifi.state().is_connected());

    fake.emit_changes(PropertyChanges {
        current_bss: Some(bss_path(42)),
        ..Default::default()
    });
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::Update)).await;
    assert!(wifi.current_network().is_none());

    fake.emit_changes(PropertyChanges {
        current_bss: Some(path("/")),
        ..Default::default()
    });
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::Update)).await;
    assert!(wifi.current_network().is_none());
}

#[tokio::test]
async fn current_network_resolves_after_rescan() {
    let fake = two_networks();
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();
    let mut events = wifi.subscribe();

    let office = bss_path(7);
    fake.emit_changes(PropertyChanges {
        current_bss: Some(office.clone()),
        ..Default::default()
    });
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::Update)).await;
    assert!(wifi.current_network().is_none());

    fake.add_bss(office.clone(), common::FakeBss::secured("Office", 2437, -50));
    fake.emit_scan_done();
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::ScanDone)).await;

    assert_eq!(wifi.current_network().unwrap().path(), &office);
}

#[tokio::test]
async fn failed_rescan_emits_warning_and_keeps_state() {
    let fake = two_networks();
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();
    let mut events = wifi.subscribe();
    let before = wifi.networks();

    fake.set_signal(&home(), -30);
    fake.fail_bss(cafe());
    fake.emit_scan_done();

    let event = wait_for(&mut events, |e| {
        matches!(e, InterfaceEvent::Warning(_) | InterfaceEvent::ScanDone)
    })
    .await;
    assert!(matches!(event, InterfaceEvent::Warning(_)));

    let after = wifi.networks();
    assert_eq!(after.len(), 2);
    for (old, new) in before.iter().zip(&after) {
        assert!(wpars::Network::ptr_eq(old, new));
    }
    assert_eq!(wifi.network(home().as_str()).unwrap().signal(), -60);

    fake.heal_bss();
    fake.emit_scan_done();
    wait_for(&mut events, |e| matches!(e, InterfaceEvent::ScanDone)).await;
    assert_eq!(wifi.network(home().as_str()).unwrap().signal(), -30);
}

#[tokio::test]
async fn request_scan_is_skipped_while_scanning() {
    let fake = two_networks();
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();

    fake.set_scanning(true);
    wifi.request_scan(ScanKind::Active).await.unwrap();
    assert_eq!(fake.count(|c| matches!(c, Call::Scan(_))), 0);

    fake.set_scanning(false);
    wifi.request_scan(ScanKind::Passive).await.unwrap();
    assert_eq!(
        fake.count(|c| *c == Call::Scan(ScanKind::Passive)),
        1
    );
}

#[tokio::test]
async fn request_scan_initializes_first() {
    let fake = two_networks();
    let wifi = interface(&fake);

    wifi.request_scan(ScanKind::Active).await.unwrap();

    assert!(wifi.is_initialized());
    assert_eq!(
        fake.calls(),
        vec![
            Call::CreateInterface("wlan0".into()),
            Call::Scan(ScanKind::Active),
        ]
    );
}

#[tokio::test]
async fn scan_and_wait_returns_reconciled_networks() {
    let fake = two_networks();
    fake.set_scan_done_on_scan(true);
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();

    fake.add_bss(bss_path(2), common::FakeBss::open("Airport", 2462, -80));
    let networks = wifi.scan_and_wait(ScanKind::Active).await.unwrap();

    assert_eq!(ssids(&networks), vec!["Airport", "Cafe", "Home"]);
}

#[tokio::test]
async fn scan_and_wait_times_out() {
    let fake = two_networks();
    let bus: std::sync::Arc<dyn wpars::SupplicantBus> = fake.clone();
    let wifi = wpars::Interface::with_bus(
        bus,
        wpars::SessionConfig::new()
            .with_ifname("wlan0")
            .with_scan_timeout(Duration::from_millis(50)),
    );

    let err = wifi.scan_and_wait(ScanKind::Active).await.unwrap_err();
    assert!(matches!(err, WifiError::Timeout));
}

#[tokio::test]
async fn scan_and_wait_reports_reconciliation_failure() {
    let fake = two_networks();
    fake.set_scan_done_on_scan(true);
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();

    fake.fail_bss(home());
    let err = wifi.scan_and_wait(ScanKind::Active).await.unwrap_err();
    assert!(matches!(err, WifiError::Scan(_)));
}

#[tokio::test]
async fn close_stops_signal_handling() {
    let fake = two_networks();
    let wifi = interface(&fake);
    wifi.initialize().await.unwrap();
    let mut events = wifi.subscribe();

    wifi.close();
    wifi.close();
    tokio::task::yield_now().await;

    fake.emit_changes(PropertyChanges {
        scanning: Some(true),
        ..Default::default()
    });
    let next = tokio::time::timeout(Duration::from_millis(100), events.recv()).await;
    assert!(next.is_err(), "no event expected after close");
    assert!(!wifi.is_scanning());

    // Commands keep working.
    wifi.disconnect().await.unwrap();
    assert_eq!(fake.count(|c| *c == Call::Disconnect), 1);
}
