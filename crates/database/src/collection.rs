//! Shared encode/decode plumbing for persisted collections.

use std::sync::Arc;

use raksha_core::{Namespace, Persistence};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Decode a namespace, treating absent or corrupt data as `None`.
pub(crate) async fn load_json<T: DeserializeOwned>(
    persistence: &Arc<dyn Persistence>,
    namespace: Namespace,
) -> Option<T> {
    let bytes = persistence.load(namespace).await?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = namespace.key(), "Discarding unreadable stored data: {}", e);
            None
        }
    }
}

/// Encode and store a value. Failures are logged and absorbed so the
/// in-memory state stays authoritative for the session.
pub(crate) async fn save_json<T: Serialize + ?Sized>(
    persistence: &Arc<dyn Persistence>,
    namespace: Namespace,
    value: &T,
) {
    let bytes = match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(key = namespace.key(), "Failed to encode data: {}", e);
            return;
        }
    };

    match persistence.save(namespace, &bytes).await {
        Ok(()) => debug!(key = namespace.key(), bytes = bytes.len(), "Persisted"),
        Err(e) => warn!(key = namespace.key(), "Failed to persist: {}", e),
    }
}
