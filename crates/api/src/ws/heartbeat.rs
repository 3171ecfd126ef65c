use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Ping every open socket on a fixed interval so idle proxies keep the
/// connection and dead peers surface as send errors. Aborted by `main` on
/// shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        loop {
            ticker.tick().await;
            let pinged = ws_manager.ping_all().await;
            if pinged > 0 {
                tracing::debug!(pinged, "WebSocket heartbeat");
            }
        }
    })
}
