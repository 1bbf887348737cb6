//! Signal monitor task for an interface session.

use futures::StreamExt;
use log::{debug, warn};
use std::sync::Weak;
use tokio::task::JoinHandle;

use crate::api::bus::SignalStream;
use crate::core::session::Session;

/// Spawns the task applying supplicant signals to `session`.
///
/// Signals are handled one at a time, in arrival order. The task holds only
/// a weak reference and exits once the session is dropped or the stream
/// ends.
pub(crate) fn spawn_monitor(session: Weak<Session>, mut signals: SignalStream) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(signal) = signals.next().await {
            let Some(session) = session.upgrade() else {
                debug!("Session dropped, stopping signal monitor");
                return;
            };
            debug!("Supplicant signal: {signal:?}");
            session.handle_signal(signal).await;
        }

        warn!("Supplicant signal stream ended unexpectedly");
    })
}
