//! crates/meter_capture_core/src/persistence.rs
//!
//! JSON blobs in the durable key-value store. Two slots are used: the
//! registered user and the session saved after a failed delivery.

use crate::domain::{SessionData, User};
use crate::ports::{KeyValueStore, PortResult};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const USER_KEY: &str = "user";
pub const OFFLINE_DATA_KEY: &str = "offlineData";

#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl SessionPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads and deserializes the value under `key`. A blob that no longer
    /// matches the current schema is an error, not `None`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> PortResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PortResult<()> {
        let raw = serde_json::to_string(value)?;
        debug!(key, bytes = raw.len(), "Saving blob");
        self.store.set(key, &raw).await
    }

    pub async fn clear(&self, key: &str) -> PortResult<()> {
        debug!(key, "Clearing blob");
        self.store.remove(key).await
    }

    pub async fn load_user(&self) -> PortResult<Option<User>> {
        self.load(USER_KEY).await
    }

    pub async fn save_user(&self, user: &User) -> PortResult<()> {
        self.save(USER_KEY, user).await
    }

    pub async fn clear_user(&self) -> PortResult<()> {
        self.clear(USER_KEY).await
    }

    pub async fn load_offline(&self) -> PortResult<Option<SessionData>> {
        self.load(OFFLINE_DATA_KEY).await
    }

    pub async fn save_offline(&self, data: &SessionData) -> PortResult<()> {
        self.save(OFFLINE_DATA_KEY, data).await
    }

    pub async fn clear_offline(&self) -> PortResult<()> {
        self.clear(OFFLINE_DATA_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnergyType, MeterReading, NewUser};
    use crate::ports::PortError;
    use crate::test_support::MemoryStore;

    fn sample_data() -> SessionData {
        let mut data = SessionData::default();
        data.company_info.name = "Müller GmbH".to_string();
        data.company_info.zip_code = "80331".to_string();
        data.contact_info.email = "kontakt@mueller.de".to_string();
        data.meters.push(MeterReading {
            count: 1,
            location: Some("48.1, 11.5".to_string()),
            timestamp: Some("2024-05-01T08:00:00.000Z".to_string()),
            scanned_code: Some("M123".to_string()),
            energy_type: EnergyType::Heat,
            ..Default::default()
        });
        data
    }

    #[tokio::test]
    async fn offline_session_round_trips() {
        let persistence = SessionPersistence::new(Arc::new(MemoryStore::default()));
        let data = sample_data();

        persistence.save_offline(&data).await.unwrap();
        let loaded = persistence.load_offline().await.unwrap();

        assert_eq!(loaded, Some(data));
    }

    #[tokio::test]
    async fn saving_twice_gives_the_same_blob() {
        let store = Arc::new(MemoryStore::default());
        let persistence = SessionPersistence::new(store.clone());
        let data = sample_data();

        persistence.save_offline(&data).await.unwrap();
        let first = store.raw(OFFLINE_DATA_KEY);
        let reloaded = persistence.load_offline().await.unwrap().unwrap();
        persistence.save_offline(&reloaded).await.unwrap();

        assert_eq!(store.raw(OFFLINE_DATA_KEY), first);
    }

    #[tokio::test]
    async fn missing_keys_load_as_none() {
        let persistence = SessionPersistence::new(Arc::new(MemoryStore::default()));
        assert!(persistence.load_user().await.unwrap().is_none());
        assert!(persistence.load_offline().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn user_and_offline_slots_are_independent() {
        let store = Arc::new(MemoryStore::default());
        let persistence = SessionPersistence::new(store.clone());
        let user = User::register(NewUser::default());

        persistence.save_user(&user).await.unwrap();
        persistence.save_offline(&sample_data()).await.unwrap();
        persistence.clear_user().await.unwrap();

        assert!(persistence.load_user().await.unwrap().is_none());
        assert!(store.raw(OFFLINE_DATA_KEY).is_some());
    }

    #[tokio::test]
    async fn unreadable_blob_is_a_serialization_error() {
        let store = Arc::new(MemoryStore::default());
        store.set(USER_KEY, "{not json").await.unwrap();
        let persistence = SessionPersistence::new(store);

        let err = persistence.load_user().await.unwrap_err();
        assert!(matches!(err, PortError::Serialization(_)));
    }
}
