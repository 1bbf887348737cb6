use wpars::{Interface, ScanKind};

#[tokio::main]
async fn main() -> wpars::Result<()> {
    env_logger::init();

    let ifname = std::env::args().nth(1).unwrap_or_else(wpars::default_ifname);
    let wifi = Interface::open(ifname).await?;

    println!("Scanning for WiFi networks on {}...", wifi.ifname());
    let networks = wifi.scan_and_wait(ScanKind::Active).await?;

    for net in networks {
        let channel = net.channel().map_or("-".to_string(), |c| c.to_string());
        let security = if net.is_secured() { "secured" } else { "open" };
        println!(
            "{:30} {} ch {:>3} {:>4} dBm  {}",
            net.ssid(),
            net.bssid(),
            channel,
            net.signal(),
            security
        );
    }

    Ok(())
}
