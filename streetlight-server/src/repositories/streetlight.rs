use std::sync::Arc;

use serde_json::{Map, Value};
use streetlight_api::models::{StreetlightRecord, records_from_collection};

use crate::configs::Storage;
use crate::errors::StoreError;

/// Device collection access; one path per device under `collection`.
pub struct StreetlightRepository {
    storage: Arc<dyn Storage>,
    collection: String,
}

impl StreetlightRepository {
    pub fn new(storage: Arc<dyn Storage>, collection: impl Into<String>) -> Self {
        Self {
            storage,
            collection: collection.into(),
        }
    }

    pub fn get_storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn record_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }
}

impl StreetlightRepository {
    pub async fn find_all(&self) -> Result<Vec<StreetlightRecord>, StoreError> {
        let collection = self.storage.get(&self.collection).await?;

        Ok(records_from_collection(&collection))
    }

    pub async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        self.storage.exists(&self.record_path(id)).await
    }

    /// Writes `fields` to one existing device in a single update.
    pub async fn update(&self, id: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.storage.update(&self.record_path(id), fields).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use streetlight_api::models::LightStatus;

    use super::*;
    use crate::configs::MemoryStorage;

    #[tokio::test]
    async fn test_find_all_and_exists() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .seed(
                "streetlights",
                json!({
                    "lamp-01": { "status": "on", "online": true },
                    "lamp-02": {}
                }),
            )
            .await;
        let repository = StreetlightRepository::new(storage, "streetlights");

        let records = repository.find_all().await.unwrap();
        assert_eq!(records.len(), 2);

        let lamp = records.iter().find(|record| record.id == "lamp-01").unwrap();
        assert_eq!(lamp.status, LightStatus::On);
        assert!(lamp.online);

        assert!(repository.exists("lamp-02").await.unwrap());
        assert!(!repository.exists("lamp-03").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let repository = StreetlightRepository::new(Arc::new(MemoryStorage::new()), "streetlights");

        assert!(repository.find_all().await.unwrap().is_empty());
    }
}
