//! Record of composed messages.

use std::sync::Arc;

use raksha_core::{MessageHistoryEntry, Namespace, Persistence};
use tokio::sync::RwLock;

use crate::collection::{load_json, save_json};

/// Most-recent-first log of compose attempts.
pub struct MessageLog {
    persistence: Arc<dyn Persistence>,
    entries: RwLock<Vec<MessageHistoryEntry>>,
}

impl MessageLog {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        let log = Self::new(persistence);
        let loaded: Vec<MessageHistoryEntry> = load_json(&log.persistence, Namespace::Messages)
            .await
            .unwrap_or_default();
        *log.entries.write().await = loaded;
        log
    }

    pub async fn record(&self, entry: MessageHistoryEntry) {
        let mut entries = self.entries.write().await;
        entries.insert(0, entry);
        save_json(&self.persistence, Namespace::Messages, entries.as_slice()).await;
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        save_json(&self.persistence, Namespace::Messages, entries.as_slice()).await;
    }

    pub async fn list(&self) -> Vec<MessageHistoryEntry> {
        self.entries.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPersistence;
    use raksha_core::MessageKind;

    #[tokio::test]
    async fn test_record_order_and_clear() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let log = MessageLog::open(persistence.clone()).await;

        log.record(MessageHistoryEntry::new(MessageKind::Safe, "I'm safe.", 2)).await;
        log.record(MessageHistoryEntry::new(MessageKind::Sos, "SOS! I need help.", 3)).await;

        let reloaded = MessageLog::open(persistence.clone()).await;
        let kinds: Vec<_> = reloaded.list().await.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![MessageKind::Sos, MessageKind::Safe]);

        log.clear().await;
        assert!(MessageLog::open(persistence).await.list().await.is_empty());
    }
}
