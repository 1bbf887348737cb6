use std::time::Duration;
use wpars::{Interface, InterfaceEvent, ScanKind};

#[tokio::main]
async fn main() -> wpars::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(ssid) = args.next() else {
        eprintln!("usage: wifi_connect <ssid> [passphrase]");
        return Ok(());
    };
    let psk = args.next();

    let wifi = Interface::open(wpars::default_ifname()).await?;
    wifi.clear_all_networks().await?;
    wifi.scan_and_wait(ScanKind::Active).await?;

    let mut events = wifi.subscribe();
    let network = match psk {
        Some(psk) => wifi.connect(&ssid, psk).await?,
        None => wifi.connect(&ssid, wpars::NetworkOptions::default()).await?,
    };
    println!("Connecting to {} ({})", network.ssid(), network.bssid());

    let connected = tokio::time::timeout(Duration::from_secs(30), async {
        while let Ok(event) = events.recv().await {
            if let InterfaceEvent::Update = event {
                println!("State: {}", wifi.state());
                if wifi.state().is_connected() {
                    return true;
                }
            }
        }
        false
    })
    .await
    .unwrap_or(false);

    if connected {
        println!("Connected to {}", ssid);
    } else {
        println!("Not connected yet, last state: {}", wifi.state());
    }

    Ok(())
}
