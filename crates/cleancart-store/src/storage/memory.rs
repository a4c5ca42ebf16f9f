//! In-memory storage backend.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::CartStorage;
use crate::error::StoreResult;

/// Process-local key-value store.
///
/// Nothing survives a restart. Wrap in an `Arc` to share.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), blob.into());
        MemoryStorage {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Checks if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, blob: &str) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.load("cart").await.unwrap().is_none());

        storage.save("cart", "{}").await.unwrap();
        storage.save("cart", "{\"items\":[]}").await.unwrap();
        assert_eq!(
            storage.load("cart").await.unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
        assert_eq!(storage.len().await, 1);

        storage.remove("cart").await.unwrap();
        storage.remove("cart").await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_with_entry() {
        let storage = MemoryStorage::with_entry("cart", "blob");
        assert_eq!(storage.load("cart").await.unwrap().as_deref(), Some("blob"));
    }
}
