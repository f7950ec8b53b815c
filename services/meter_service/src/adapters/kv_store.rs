//! services/meter_service/src/adapters/kv_store.rs
//!
//! The durable key-value store, the concrete implementation of the
//! `KeyValueStore` port from the `core` crate. Values live in a single SQLite
//! table accessed through `sqlx`.

use async_trait::async_trait;
use chrono::Utc;
use meter_capture_core::ports::{KeyValueStore, PortError, PortResult};
use sqlx::{FromRow, SqlitePool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements the `KeyValueStore` port.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Creates a new `SqliteKeyValueStore`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[derive(FromRow)]
struct EntryRecord {
    value: String,
}

//=========================================================================================
// `KeyValueStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let record = sqlx::query_as::<_, EntryRecord>("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> SqliteKeyValueStore {
        // A single connection, since every connection to `:memory:` is its own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory sqlite");
        let store = SqliteKeyValueStore::new(pool);
        store.run_migrations().await.expect("run migrations");
        store
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = memory_store().await;
        assert_eq!(store.get("offlineData").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_and_remove_deletes() {
        let store = memory_store().await;

        store.set("user", r#"{"id":"1"}"#).await.unwrap();
        store.set("user", r#"{"id":"2"}"#).await.unwrap();
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some(r#"{"id":"2"}"#));

        store.remove("user").await.unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn removing_a_missing_key_is_fine() {
        let store = memory_store().await;
        store.remove("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn keys_do_not_interfere() {
        let store = memory_store().await;
        store.set("user", "u").await.unwrap();
        store.set("offlineData", "o").await.unwrap();
        store.remove("user").await.unwrap();
        assert_eq!(store.get("offlineData").await.unwrap().as_deref(), Some("o"));
    }
}
