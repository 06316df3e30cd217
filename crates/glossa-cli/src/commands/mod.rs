pub mod models;
pub mod settings;
pub mod translate;

use anyhow::{Context, Result};
use glossa_core::translation::TranslationSettingsStore;
use glossa_infrastructure::{GlossaPaths, TomlTranslationSettingsRepository};
use std::path::PathBuf;
use std::sync::Arc;

pub fn resolve_paths(config_dir: Option<PathBuf>) -> Result<GlossaPaths> {
    match config_dir {
        Some(dir) => Ok(GlossaPaths::with_base(dir)),
        None => GlossaPaths::new().context("Failed to locate the configuration directory"),
    }
}

pub fn open_settings_store(paths: &GlossaPaths) -> Result<Arc<TranslationSettingsStore>> {
    let repository = Arc::new(TomlTranslationSettingsRepository::new(paths));
    let store = TranslationSettingsStore::load(repository).with_context(|| {
        format!(
            "Failed to load {}",
            paths.translation_settings_file().display()
        )
    })?;
    Ok(Arc::new(store))
}
