//! Cached access to `config.toml`.

use crate::paths::GlossaPaths;
use crate::storage::AtomicTomlFile;
use glossa_core::{GlossaError, Result};
use glossa_core::config::RootConfig;
use std::sync::{Arc, PoisonError, RwLock};

/// Loads [`RootConfig`] once and serves it from memory until invalidated.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<RootConfig>>,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &GlossaPaths) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(paths.config_file())),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Loads the configuration, failing on unreadable or invalid files.
    ///
    /// A missing file yields the defaults.
    pub fn try_get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self
            .file
            .load()
            .map_err(|e| GlossaError::config(format!("{}: {e}", self.file.path().display())))?
            .unwrap_or_default();
        tracing::debug!(path = %self.file.path().display(), "Loaded config");

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Gets the configuration, falling back to defaults when it cannot be read.
    pub fn get_config(&self) -> RootConfig {
        self.try_get_config().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            RootConfig::default()
        })
    }

    /// Writes `config` to disk and refreshes the cache.
    pub fn save_config(&self, config: &RootConfig) -> Result<()> {
        self.file.save(config)?;
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Drops the cached value; the next read goes to disk.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }
}
