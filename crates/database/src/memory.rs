//! In-memory persistence backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use raksha_core::{CoreError, Namespace, Persistence};

/// A [`Persistence`] backend that keeps blobs in a map.
///
/// Used by tests and by hosts that do not need data to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blobs: Mutex<HashMap<Namespace, Vec<u8>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob currently stored for a namespace.
    pub fn get(&self, namespace: Namespace) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .ok()
            .and_then(|blobs| blobs.get(&namespace).cloned())
    }

    /// Store raw bytes directly, bypassing any store.
    pub fn put(&self, namespace: Namespace, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(namespace, bytes.into());
        }
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn save(&self, namespace: Namespace, bytes: &[u8]) -> Result<(), CoreError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| CoreError::Persistence("memory store poisoned".to_string()))?;
        blobs.insert(namespace, bytes.to_vec());
        Ok(())
    }

    async fn load(&self, namespace: Namespace) -> Option<Vec<u8>> {
        self.get(namespace)
    }
}
