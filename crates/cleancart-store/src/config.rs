//! # Cart Store Configuration
//!
//! Where and how the persisted cart is stored.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CLEANCART_STORAGE_BACKEND=memory                                   │
//! │     CLEANCART_DB_PATH=/tmp/cart.db                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cleancart/cart.toml (Linux)                              │
//! │     ~/Library/Application Support/com.cleancart.storefront/cart.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     SQLite in the platform data dir, key "smart-cleaners-cart"         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [storage]
//! backend = "sqlite"  # sqlite | memory
//! database_path = "/var/lib/cleancart/cart.db"
//! max_connections = 2
//! key = "smart-cleaners-cart"
//! ```

use cleancart_core::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Storage Backend
// =============================================================================

/// Which backend holds the persisted cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// SQLite file, survives restarts.
    #[default]
    Sqlite,

    /// Process memory only. Used by tests and kiosk demos.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" | "file" => Ok(StorageBackend::Sqlite),
            "memory" | "mem" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Pool size for the SQLite backend.
    /// Default: 2 (one writer task, one reader for tooling)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Key the cart blob is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_max_connections() -> u32 {
    2
}

fn default_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            database_path: None,
            max_connections: default_max_connections(),
            key: default_key(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete cart store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartStoreConfig {
    #[serde(default)]
    pub storage: StorageSettings,
}

impl CartStoreConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory config, for tests and demos.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Cart store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.storage.key.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "storage key must not be empty".into(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(StoreError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = var("CLEANCART_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!(backend = %backend, error = %e, "Ignoring storage backend override"),
            }
        }

        if let Some(path) = var("CLEANCART_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = var("CLEANCART_STORAGE_KEY") {
            self.storage.key = key;
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "cleancart", "storefront")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// SQLite file to open: the configured path, else the platform data
    /// directory, else `./cleancart.db`.
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("cart.db")))
            .unwrap_or_else(|| PathBuf::from("./cleancart.db"))
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.storage.key
    }

    /// Returns the backend.
    pub fn backend(&self) -> StorageBackend {
        self.storage.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("sqlite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!("MEMORY".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("redis".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_default_config() {
        let config = CartStoreConfig::default();
        assert_eq!(config.backend(), StorageBackend::Sqlite);
        assert_eq!(config.key(), "smart-cleaners-cart");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartStoreConfig::default();

        config.storage.key = "  ".to_string();
        assert!(config.validate().is_err());

        config.storage.key = "cart".to_string();
        assert!(config.validate().is_ok());

        config.storage.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CLEANCART_STORAGE_BACKEND", "memory"),
            ("CLEANCART_DB_PATH", "/tmp/override.db"),
            ("CLEANCART_STORAGE_KEY", "kiosk-cart"),
        ]
        .into_iter()
        .collect();

        let mut config = CartStoreConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.backend(), StorageBackend::Memory);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/override.db"));
        assert_eq!(config.key(), "kiosk-cart");
    }

    #[test]
    fn test_bad_backend_override_is_ignored() {
        let mut config = CartStoreConfig::default();
        config.apply_overrides(|name| {
            (name == "CLEANCART_STORAGE_BACKEND").then(|| "postgres".to_string())
        });
        assert_eq!(config.backend(), StorageBackend::Sqlite);
    }

    #[test]
    fn test_toml_sections() {
        let toml_str = r#"
            [storage]
            backend = "memory"
            key = "custom"
        "#;

        let config: CartStoreConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend(), StorageBackend::Memory);
        assert_eq!(config.key(), "custom");
        assert_eq!(config.storage.max_connections, 2);

        let written = toml::to_string_pretty(&config).unwrap();
        assert!(written.contains("backend = \"memory\""));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = std::env::temp_dir().join(format!("cleancart-config-{}", std::process::id()));
        let path = dir.join("cart.toml");

        let mut config = CartStoreConfig::in_memory();
        config.storage.key = "from-file".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = CartStoreConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.key(), "from-file");
        assert_eq!(loaded.backend(), StorageBackend::Memory);

        let _ = std::fs::remove_dir_all(dir);
    }
}
