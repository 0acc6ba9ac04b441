//! Message template storage.

use std::sync::Arc;

use raksha_core::{MessageTemplate, Namespace, Persistence};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::collection::{load_json, save_json};
use crate::error::{DatabaseError, Result};

/// User-defined reusable message bodies, in creation order.
pub struct TemplateStore {
    persistence: Arc<dyn Persistence>,
    templates: RwLock<Vec<MessageTemplate>>,
}

impl TemplateStore {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            persistence,
            templates: RwLock::new(Vec::new()),
        }
    }

    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        let store = Self::new(persistence);
        let loaded: Vec<MessageTemplate> = load_json(&store.persistence, Namespace::Templates)
            .await
            .unwrap_or_default();
        *store.templates.write().await = loaded;
        store
    }

    pub async fn add(&self, template: MessageTemplate) -> Result<()> {
        let mut templates = self.templates.write().await;
        if templates.iter().any(|t| t.id == template.id) {
            return Err(DatabaseError::AlreadyExists {
                entity: "Template",
                id: template.id.to_string(),
            });
        }
        info!(name = %template.name, "Adding message template");
        templates.push(template);
        save_json(&self.persistence, Namespace::Templates, templates.as_slice()).await;
        Ok(())
    }

    /// Remove a template by id.
    pub async fn remove(&self, id: Uuid) -> Result<MessageTemplate> {
        let mut templates = self.templates.write().await;
        let index = templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "Template",
                id: id.to_string(),
            })?;
        let removed = templates.remove(index);
        save_json(&self.persistence, Namespace::Templates, templates.as_slice()).await;
        Ok(removed)
    }

    pub async fn get(&self, id: Uuid) -> Option<MessageTemplate> {
        self.templates.read().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn list(&self) -> Vec<MessageTemplate> {
        self.templates.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPersistence;

    #[tokio::test]
    async fn test_add_remove_and_reload() {
        let persistence: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let store = TemplateStore::open(persistence.clone()).await;

        let home = MessageTemplate::new("Home", "🏠", "Reached home safely", false).unwrap();
        let cab = MessageTemplate::new("Cab", "🚗", "In a cab, tracking me", true).unwrap();
        store.add(home.clone()).await.unwrap();
        store.add(cab.clone()).await.unwrap();

        assert_eq!(store.remove(home.id).await.unwrap(), home);
        assert!(matches!(
            store.remove(home.id).await,
            Err(DatabaseError::NotFound { .. })
        ));

        let reloaded = TemplateStore::open(persistence).await;
        assert_eq!(reloaded.list().await, vec![cab.clone()]);
        assert_eq!(reloaded.get(cab.id).await, Some(cab));
    }
}
