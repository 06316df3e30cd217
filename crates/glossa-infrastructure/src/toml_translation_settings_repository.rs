//! TOML-backed TranslationSettingsRepository.

use crate::paths::GlossaPaths;
use crate::storage::AtomicTomlFile;
use glossa_core::Result;
use glossa_core::translation::{TranslationSettings, TranslationSettingsRepository};
use std::path::PathBuf;

/// Stores translation settings in `translation-settings.toml`.
///
/// The file holds API keys, so it is always written owner-only.
pub struct TomlTranslationSettingsRepository {
    file: AtomicTomlFile<TranslationSettings>,
}

impl TomlTranslationSettingsRepository {
    pub fn new(paths: &GlossaPaths) -> Self {
        Self::with_path(paths.translation_settings_file())
    }

    /// Creates a repository with a custom file path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::private(path),
        }
    }
}

impl TranslationSettingsRepository for TomlTranslationSettingsRepository {
    fn load(&self) -> Result<Option<TranslationSettings>> {
        Ok(self.file.load()?)
    }

    fn save(&self, settings: &TranslationSettings) -> Result<()> {
        Ok(self.file.save(settings)?)
    }
}
