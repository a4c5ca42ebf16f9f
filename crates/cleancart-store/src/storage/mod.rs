//! # Storage Backends
//!
//! Key-value backends that hold the persisted cart blob.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CartStorage implementations                        │
//! │                                                                         │
//! │  trait CartStorage                                                     │
//! │    load(key)         → Option<String>                                  │
//! │    save(key, blob)   → upsert                                          │
//! │    remove(key)       → delete, absent key is fine                      │
//! │        │                                                                │
//! │        ├── MemoryStorage  (RwLock<HashMap>)   tests, kiosk demos       │
//! │        └── SqliteStorage  (sqlx pool)         default, survives restart│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::{SqliteConfig, SqliteStorage};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::{CartStoreConfig, StorageBackend};
use crate::error::StoreResult;

/// Async key-value storage for opaque string blobs.
///
/// Implementations must be shareable across tasks: the background writer
/// owns one `Arc<dyn CartStorage>` while tooling may hold another.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Reads the blob stored under `key`.
    async fn load(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `blob` under `key`, replacing any previous value.
    async fn save(&self, key: &str, blob: &str) -> StoreResult<()>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Opens the backend selected by `config`.
pub async fn open_storage(config: &CartStoreConfig) -> StoreResult<Arc<dyn CartStorage>> {
    match config.backend() {
        StorageBackend::Memory => {
            info!("Using in-memory cart storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Sqlite => {
            let sqlite = SqliteConfig::new(config.database_path())
                .max_connections(config.storage.max_connections);
            Ok(Arc::new(SqliteStorage::new(sqlite).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_backend() {
        let storage = open_storage(&CartStoreConfig::in_memory()).await.unwrap();
        assert_eq!(storage.name(), "memory");

        storage.save("k", "v").await.unwrap();
        assert_eq!(storage.load("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_open_sqlite_backend_from_config() {
        let path = std::env::temp_dir().join(format!("cleancart-open-{}.db", std::process::id()));
        let mut config = CartStoreConfig::default();
        config.storage.database_path = Some(path.clone());

        let storage = open_storage(&config).await.unwrap();
        assert_eq!(storage.name(), "sqlite");
        assert!(storage.load("missing").await.unwrap().is_none());

        drop(storage);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
