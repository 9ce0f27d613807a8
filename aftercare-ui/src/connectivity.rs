//! Connectivity watching
//!
//! A background probe polls the backend health endpoint and publishes
//! online/offline transitions on a watch channel; a forwarder task
//! applies each transition to the manager. Tests drive the channel
//! directly instead of probing.

use crate::manager::TrackerManager;
use crate::sync::BackendClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Spawn the health probe; the receiver starts optimistically online
pub fn spawn_probe(client: BackendClient, interval: Duration) -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(true);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let online = client.health().await;
            let changed = tx.send_if_modified(|current| {
                if *current != online {
                    *current = online;
                    true
                } else {
                    false
                }
            });
            if changed {
                info!(online, "Connectivity changed");
            }
            if tx.is_closed() {
                break;
            }
        }
    });
    rx
}

/// Forward connectivity transitions to the manager until the sender drops
pub async fn forward_to_manager(mut rx: watch::Receiver<bool>, manager: Arc<TrackerManager>) {
    while rx.changed().await.is_ok() {
        let online = *rx.borrow_and_update();
        manager.handle_connectivity(online).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OFFLINE_MESSAGE;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn transitions_reach_the_manager() {
        let client = BackendClient::new("http://127.0.0.1:1", Duration::from_millis(200)).unwrap();
        let manager = Arc::new(TrackerManager::new(Arc::new(MemoryStore::new()), client));

        let (tx, rx) = watch::channel(true);
        let forwarder = tokio::spawn(forward_to_manager(rx, manager.clone()));

        tx.send(false).unwrap();
        // Let the forwarder drain the change
        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = manager.snapshot().await;
        assert!(!state.is_online);
        assert_eq!(state.error.as_deref(), Some(OFFLINE_MESSAGE));

        tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = manager.snapshot().await;
        assert!(state.is_online);
        assert_eq!(state.error, None);

        drop(tx);
        forwarder.await.unwrap();
    }
}
