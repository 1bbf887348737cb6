use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use wpars::{Interface, InterfaceEvent, SessionConfig, ZbusSupplicant};

#[tokio::main]
async fn main() -> wpars::Result<()> {
    env_logger::init();

    let bus = ZbusSupplicant::system().await?;
    let wifi = Interface::with_bus(Arc::new(bus), SessionConfig::default());
    let mut events = wifi.subscribe();

    wifi.initialize().await?;
    println!("Watching {} (Ctrl+C to stop)", wifi.ifname());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(InterfaceEvent::Ready) => println!("ready"),
                Ok(InterfaceEvent::Update) => {
                    let current = wifi
                        .current_network()
                        .map(|n| n.ssid())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "state={} scanning={} current={}",
                        wifi.state(),
                        wifi.is_scanning(),
                        current
                    );
                }
                Ok(InterfaceEvent::ScanDone) => {
                    println!("scan done, {} networks", wifi.networks().len());
                }
                Ok(InterfaceEvent::Warning(e)) => eprintln!("warning: {e}"),
                Ok(InterfaceEvent::Error(e)) => eprintln!("error: {e}"),
                Err(RecvError::Lagged(skipped)) => eprintln!("missed {skipped} events"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    wifi.close();
    Ok(())
}
