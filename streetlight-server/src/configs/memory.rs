use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::configs::storage::Storage;
use crate::errors::StoreError;

/// In-process stand-in for the realtime database.
///
/// Unlike the hosted database it refuses updates to paths that hold no
/// value, and it can be switched offline to exercise connectivity failures.
pub struct MemoryStorage {
    root: RwLock<Value>,
    offline: AtomicBool,
    writes: RwLock<Vec<(String, Map<String, Value>)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Object(Map::new())),
            offline: AtomicBool::new(false),
            writes: RwLock::new(Vec::new()),
        }
    }

    /// Replaces whatever is stored at `path`.
    pub async fn seed(&self, path: &str, value: Value) {
        let mut root = self.root.write().await;
        let mut node = &mut *root;

        for key in segments(path) {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else { unreachable!() };
            node = map.entry(key.to_string()).or_insert(Value::Null);
        }

        *node = value;
    }

    pub async fn value_at(&self, path: &str) -> Value {
        let root = self.root.read().await;
        lookup(&root, path).cloned().unwrap_or(Value::Null)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every accepted update, in order.
    pub async fn writes(&self) -> Vec<(String, Map<String, Value>)> {
        self.writes.read().await.clone()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connectivity("memory storage is offline".to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(root, |node, key| node.get(key))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.ensure_online()?;

        Ok(self.value_at(path).await)
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        self.ensure_online()?;

        Ok(!self.value_at(path).await.is_null())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        self.ensure_online()?;

        let mut root = self.root.write().await;
        let node = segments(path)
            .try_fold(&mut *root, |node, key| node.get_mut(key))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;

        for (key, value) in &fields {
            node.insert(key.clone(), value.clone());
        }
        drop(root);

        self.writes.write().await.push((path.to_string(), fields));

        Ok(())
    }

    fn endpoint(&self) -> &str {
        "memory://"
    }
}
