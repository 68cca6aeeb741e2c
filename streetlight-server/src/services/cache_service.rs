use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: OffsetDateTime,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }
}

/// Keyed values that expire `ttl` after they were set.
pub struct CacheService<V> {
    cache: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<V> CacheService<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let service = Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        service.start_cleanup_task();

        service
    }

    pub async fn set(&self, key: &str, value: V) {
        let expires_at =
            OffsetDateTime::now_utc() + time::Duration::milliseconds(self.ttl.as_millis() as i64);

        let mut cache = self.cache.write().await;
        cache.insert(key.to_string(), CacheEntry { value, expires_at });
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.cache.write().await;

        let expired = cache.get(key)?.is_expired(OffsetDateTime::now_utc());
        if expired {
            cache.remove(key);
            return None;
        }

        cache.get(key).map(|entry| entry.value.clone())
    }

    fn start_cleanup_task(&self) {
        let cache = Arc::downgrade(&self.cache);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;

                let Some(cache) = cache.upgrade() else {
                    break;
                };

                let now = OffsetDateTime::now_utc();
                let mut cache_guard = cache.write().await;
                cache_guard.retain(|_, entry| !entry.is_expired(now));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn test_set_get() {
        let cache = CacheService::new(Duration::from_secs(60));

        cache.set("key1", "value1".to_string()).await;

        assert_eq!(cache.get("key1").await, Some("value1".to_string()));
        assert_eq!(cache.get("non_existent").await, None);
    }

    #[tokio::test]
    async fn test_expiration() {
        let cache = CacheService::new(Duration::from_millis(100));

        cache.set("key2", 2u32).await;
        assert_eq!(cache.get("key2").await, Some(2));

        sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get("key2").await, None);
        assert!(cache.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let cache = CacheService::new(Duration::from_secs(60));

        cache.set("key3", vec![1, 2, 3]).await;
        cache.set("key3", vec![4]).await;

        assert_eq!(cache.get("key3").await, Some(vec![4]));
    }
}
