//! Emergency contact storage.

use std::sync::Arc;

use raksha_core::{EmergencyContact, Namespace, Persistence};
use tokio::sync::RwLock;
use tracing::info;

use crate::collection::{load_json, save_json};
use crate::error::{DatabaseError, Result};

/// Ordered collection of emergency contacts.
///
/// Contacts keep insertion order. Ids are unique within the store.
pub struct ContactStore {
    persistence: Arc<dyn Persistence>,
    contacts: RwLock<Vec<EmergencyContact>>,
}

impl ContactStore {
    /// Create an empty store without reading persisted data.
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            contacts: RwLock::new(Vec::new()),
        }
    }

    /// Create a store and load any persisted contacts.
    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        let store = Self::new(persistence);
        store.reload().await;
        store
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Absent or corrupt data leaves the store empty.
    pub async fn reload(&self) {
        let loaded: Vec<EmergencyContact> =
            load_json(&self.persistence, Namespace::Contacts).await.unwrap_or_default();
        info!(count = loaded.len(), "Loaded emergency contacts");
        *self.contacts.write().await = loaded;
    }

    /// Append a contact and persist.
    pub async fn add(&self, contact: EmergencyContact) -> Result<()> {
        let mut contacts = self.contacts.write().await;
        if contacts.iter().any(|c| c.id == contact.id) {
            return Err(DatabaseError::AlreadyExists {
                entity: "Contact",
                id: contact.id.to_string(),
            });
        }
        info!(name = %contact.name, "Adding emergency contact");
        contacts.push(contact);
        save_json(&self.persistence, Namespace::Contacts, contacts.as_slice()).await;
        Ok(())
    }

    /// Replace the contact with the same id, keeping its position.
    pub async fn replace(&self, contact: EmergencyContact) -> Result<()> {
        let mut contacts = self.contacts.write().await;
        let slot = contacts
            .iter_mut()
            .find(|c| c.id == contact.id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "Contact",
                id: contact.id.to_string(),
            })?;
        *slot = contact;
        save_json(&self.persistence, Namespace::Contacts, contacts.as_slice()).await;
        Ok(())
    }

    /// Remove the contact at `index` and persist.
    ///
    /// Out-of-range indexes are a no-op and return `None`.
    pub async fn remove_at(&self, index: usize) -> Option<EmergencyContact> {
        let mut contacts = self.contacts.write().await;
        if index >= contacts.len() {
            return None;
        }
        let removed = contacts.remove(index);
        info!(name = %removed.name, "Removed emergency contact");
        save_json(&self.persistence, Namespace::Contacts, contacts.as_slice()).await;
        Some(removed)
    }

    /// Snapshot of the contacts in insertion order.
    pub async fn list(&self) -> Vec<EmergencyContact> {
        self.contacts.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.contacts.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPersistence;

    fn contact(name: &str, phone: &str) -> EmergencyContact {
        EmergencyContact::new(name, phone, "Friend").unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order_and_fields() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let store = ContactStore::open(persistence.clone()).await;

        let added = vec![
            contact("Asha", "+15550000001"),
            contact("Ben", "+15550000002"),
            contact("Chitra", "+15550000003"),
        ];
        for c in &added {
            store.add(c.clone()).await.unwrap();
        }

        let fresh = ContactStore::open(persistence).await;
        assert_eq!(fresh.list().await, added);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_noop() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let store = ContactStore::open(persistence).await;
        store.add(contact("Asha", "1")).await.unwrap();
        store.add(contact("Ben", "2")).await.unwrap();

        let before = store.list().await;
        assert!(store.remove_at(2).await.is_none());
        assert!(store.remove_at(usize::MAX).await.is_none());
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_remove_at_persists() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let store = ContactStore::open(persistence.clone()).await;
        store.add(contact("Asha", "1")).await.unwrap();
        store.add(contact("Ben", "2")).await.unwrap();

        let removed = store.remove_at(0).await.unwrap();
        assert_eq!(removed.name, "Asha");

        let fresh = ContactStore::open(persistence).await;
        let names: Vec<_> = fresh.list().await.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Ben"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = ContactStore::new(Arc::new(MemoryPersistence::new()));
        let c = contact("Asha", "1");
        store.add(c.clone()).await.unwrap();
        let err = store.add(c).await.unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_position() {
        let store = ContactStore::new(Arc::new(MemoryPersistence::new()));
        let a = contact("Asha", "1");
        let b = contact("Ben", "2");
        store.add(a.clone()).await.unwrap();
        store.add(b).await.unwrap();

        let updated = EmergencyContact {
            phone_number: "+15559999999".to_string(),
            ..a
        };
        store.replace(updated.clone()).await.unwrap();
        assert_eq!(store.list().await[0], updated);

        let stranger = contact("Zed", "9");
        assert!(matches!(
            store.replace(stranger).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_data_loads_empty() {
        let memory = Arc::new(MemoryPersistence::new());
        memory.put(Namespace::Contacts, b"{not json".to_vec());
        let store = ContactStore::open(memory).await;
        assert!(store.is_empty().await);
    }
}
