//! Persistence backends and owned stores for Raksha.
//!
//! This crate provides the two [`Persistence`] backends (SQLite via SQLx and an
//! in-memory map) and the stores that own each persisted collection:
//!
//! - [`ContactStore`] - emergency contacts, insertion order
//! - [`HistoryLog`] - fired emergency events, most recent first
//! - [`ProfileStore`] - the user profile
//! - [`TemplateStore`] / [`MessageLog`] - messaging templates and compose history
//!
//! Every store encodes on each mutation and decodes once when opened. Absent or
//! corrupt blobs fall back to an empty (or default) collection.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use database::{Database, Stores};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:raksha.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let stores = Stores::open(Arc::new(db)).await;
//!     println!("{} contacts", stores.contacts.len().await);
//!     Ok(())
//! }
//! ```

mod collection;
pub mod contacts;
pub mod error;
pub mod history;
pub mod memory;
pub mod messages;
pub mod profile;
pub mod templates;

pub use contacts::ContactStore;
pub use error::{DatabaseError, Result};
pub use history::HistoryLog;
pub use memory::MemoryPersistence;
pub use messages::MessageLog;
pub use profile::{ProfileField, ProfileStore};
pub use templates::TemplateStore;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use raksha_core::{CoreError, Namespace, Persistence};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::warn;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Open a migrated in-memory database.
    ///
    /// Each SQLite in-memory connection is its own database, so the pool is
    /// limited to a single connection.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_blob(&self, namespace: Namespace) -> Result<Option<Vec<u8>>> {
        let value = sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT value
            FROM blobs
            WHERE key = ?
            "#,
        )
        .bind(namespace.key())
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn upsert_blob(&self, namespace: Namespace, bytes: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blobs (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
        )
        .bind(namespace.key())
        .bind(bytes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Persistence for Database {
    async fn save(&self, namespace: Namespace, bytes: &[u8]) -> std::result::Result<(), CoreError> {
        self.upsert_blob(namespace, bytes)
            .await
            .map_err(|e| CoreError::Persistence(e.to_string()))
    }

    async fn load(&self, namespace: Namespace) -> Option<Vec<u8>> {
        match self.fetch_blob(namespace).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = namespace.key(), "Failed to read blob: {}", e);
                None
            }
        }
    }
}

/// Every persisted store, opened against one backend.
#[derive(Clone)]
pub struct Stores {
    pub contacts: Arc<ContactStore>,
    pub history: Arc<HistoryLog>,
    pub profile: Arc<ProfileStore>,
    pub templates: Arc<TemplateStore>,
    pub messages: Arc<MessageLog>,
}

impl Stores {
    /// Open each namespace independently.
    ///
    /// A missing or unreadable namespace only affects its own store.
    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        Self {
            contacts: Arc::new(ContactStore::open(persistence.clone()).await),
            history: Arc::new(HistoryLog::open(persistence.clone()).await),
            profile: Arc::new(ProfileStore::open(persistence.clone()).await),
            templates: Arc::new(TemplateStore::open(persistence.clone()).await),
            messages: Arc::new(MessageLog::open(persistence).await),
        }
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use raksha_core::EmergencyContact;

    #[tokio::test]
    async fn test_blob_round_trip() {
        let db = Database::in_memory().await.unwrap();

        assert!(db.load(Namespace::Contacts).await.is_none());

        db.save(Namespace::Contacts, b"[1,2,3]").await.unwrap();
        assert_eq!(db.load(Namespace::Contacts).await.unwrap(), b"[1,2,3]");

        // Overwrite replaces the value
        db.save(Namespace::Contacts, b"[]").await.unwrap();
        assert_eq!(db.load(Namespace::Contacts).await.unwrap(), b"[]");

        // Other namespaces are untouched
        assert!(db.load(Namespace::History).await.is_none());
    }

    #[tokio::test]
    async fn test_stores_share_sqlite_backend() {
        let db = Arc::new(Database::in_memory().await.unwrap());

        let stores = Stores::open(db.clone()).await;
        stores
            .contacts
            .add(EmergencyContact::new("Asha", "+15551230001", "Sister").unwrap())
            .await
            .unwrap();

        let reopened = Stores::open(db).await;
        let contacts = reopened.contacts.list().await;
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Asha");
        assert!(reopened.history.list().await.is_empty());
    }
}
