//! # cleancart-store: Cart Persistence
//!
//! Keeps the storefront cart across restarts. [`PersistentCart`] wraps the
//! pure [`cleancart_core::Cart`], loads it once when opened, and hands a
//! snapshot to a background writer after every mutation.
//!
//! ## Module Structure
//! ```text
//! cleancart-store/
//! ├── config.rs      ← cart.toml + CLEANCART_* environment overrides
//! ├── error.rs       ← StoreError, StoreResult
//! ├── migrations.rs  ← Embedded sqlx migrations (kv_store table)
//! ├── persist.rs     ← PersistentCart, writer task
//! └── storage/
//!     ├── mod.rs     ← CartStorage trait, open_storage()
//!     ├── memory.rs  ← MemoryStorage
//!     └── sqlite.rs  ← SqliteStorage, SqliteConfig
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use cleancart_store::{CartStoreConfig, PersistentCart};
//!
//! let config = CartStoreConfig::load_or_default(None);
//! let mut cart = PersistentCart::from_config(&config).await;
//!
//! cart.add_item(descriptor);
//! let badge = cart.badge_label();
//!
//! cart.shutdown().await;
//! ```

pub mod config;
pub mod error;
pub mod migrations;
pub mod persist;
pub mod storage;

pub use config::{CartStoreConfig, StorageBackend, StorageSettings};
pub use error::{StoreError, StoreResult};
pub use persist::{PersistOptions, PersistentCart};
pub use storage::{open_storage, CartStorage, MemoryStorage, SqliteConfig, SqliteStorage};
