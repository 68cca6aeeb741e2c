use std::sync::Arc;
use std::time::Duration;

use streetlight_api::models::StreetlightRecord;

use crate::errors::StoreError;
use crate::repositories::StreetlightRepository;
use crate::services::CacheService;

/// Reads the whole device collection, reusing a fetch for `ttl`.
pub struct SnapshotService {
    repository: Arc<StreetlightRepository>,
    cache: CacheService<Arc<Vec<StreetlightRecord>>>,
    ttl: Duration,
}

impl SnapshotService {
    pub fn new(repository: Arc<StreetlightRepository>, ttl: Duration) -> Self {
        Self {
            repository,
            cache: CacheService::new(ttl),
            ttl,
        }
    }

    /// All devices, normalized. An empty collection is `Ok` with no records.
    pub async fn fetch_all(&self) -> Result<Arc<Vec<StreetlightRecord>>, StoreError> {
        let key = self.repository.collection();

        if !self.ttl.is_zero() {
            if let Some(records) = self.cache.get(key).await {
                tracing::trace!("serving {} from cache", key);
                return Ok(records);
            }
        }

        self.fetch_fresh().await
    }

    /// Reads the store regardless of the cache and replaces the cached copy.
    pub async fn fetch_fresh(&self) -> Result<Arc<Vec<StreetlightRecord>>, StoreError> {
        let key = self.repository.collection();

        let records = Arc::new(self.repository.find_all().await?);
        tracing::debug!("fetched {} streetlights from {}", records.len(), key);

        if !self.ttl.is_zero() {
            self.cache.set(key, records.clone()).await;
        }

        Ok(records)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
