//! Append-only log of fired emergency events.

use std::sync::Arc;

use raksha_core::{EmergencyEvent, Namespace, Persistence};
use tokio::sync::RwLock;
use tracing::info;

use crate::collection::{load_json, save_json};

/// Most-recent-first record of fired alerts.
///
/// Consumers read [`HistoryLog::list`] in order; no sorting is needed.
pub struct HistoryLog {
    persistence: Arc<dyn Persistence>,
    events: RwLock<Vec<EmergencyEvent>>,
}

impl HistoryLog {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            events: RwLock::new(Vec::new()),
        }
    }

    /// Create a log and load any persisted events.
    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        let log = Self::new(persistence);
        let loaded: Vec<EmergencyEvent> =
            load_json(&log.persistence, Namespace::History).await.unwrap_or_default();
        info!(count = loaded.len(), "Loaded emergency history");
        *log.events.write().await = loaded;
        log
    }

    /// Insert an event at the front and persist.
    pub async fn record(&self, event: EmergencyEvent) {
        let mut events = self.events.write().await;
        info!(
            id = %event.id,
            contacts_notified = event.contacts_notified,
            "Recording emergency event"
        );
        events.insert(0, event);
        save_json(&self.persistence, Namespace::History, events.as_slice()).await;
    }

    /// Remove every event and persist the empty log.
    pub async fn clear(&self) {
        let mut events = self.events.write().await;
        events.clear();
        info!("Cleared emergency history");
        save_json(&self.persistence, Namespace::History, events.as_slice()).await;
    }

    pub async fn list(&self) -> Vec<EmergencyEvent> {
        self.events.read().await.clone()
    }

    /// The most recent event, if any.
    pub async fn latest(&self) -> Option<EmergencyEvent> {
        self.events.read().await.first().cloned()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPersistence;
    use chrono::{Duration, Utc};
    use raksha_core::Location;

    #[tokio::test]
    async fn test_most_recent_first() {
        let log = HistoryLog::new(Arc::new(MemoryPersistence::new()));
        let t0 = Utc::now();

        let first = EmergencyEvent::new(t0, None, 1);
        let second = EmergencyEvent::new(t0 + Duration::seconds(5), None, 2);
        log.record(first.clone()).await;
        log.record(second.clone()).await;

        let events = log.list().await;
        assert_eq!(events, vec![second.clone(), first]);
        assert_eq!(log.latest().await, Some(second));
    }

    #[tokio::test]
    async fn test_persists_and_reloads() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let log = HistoryLog::open(persistence.clone()).await;
        let event = EmergencyEvent::new(Utc::now(), Some(Location::new(12.97, 77.59)), 3);
        log.record(event.clone()).await;

        let reloaded = HistoryLog::open(persistence).await;
        assert_eq!(reloaded.list().await, vec![event]);
    }

    #[tokio::test]
    async fn test_clear_persists() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let log = HistoryLog::open(persistence.clone()).await;
        log.record(EmergencyEvent::new(Utc::now(), None, 0)).await;
        log.clear().await;
        assert!(log.is_empty().await);

        let reloaded = HistoryLog::open(persistence).await;
        assert!(reloaded.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_history_loads_empty() {
        let memory = Arc::new(MemoryPersistence::new());
        memory.put(Namespace::History, b"\xff\xfe".to_vec());
        let log = HistoryLog::open(memory).await;
        assert_eq!(log.len().await, 0);
    }
}
