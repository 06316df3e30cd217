//! Editable draft of the translation settings.

use glossa_core::Result;
use glossa_core::translation::{TranslationSettings, TranslationSettingsStore};

/// Settings dialog state: open/closed plus a local copy being edited.
///
/// Edits stay local until [`save`](Self::save); reopening the dialog discards
/// them and re-reads the store.
#[derive(Debug, Clone, Default)]
pub struct TranslationSettingsDialog {
    open: bool,
    draft: TranslationSettings,
}

impl TranslationSettingsDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the dialog seeded from the current stored settings.
    pub fn open(&mut self, store: &TranslationSettingsStore) {
        self.draft = store.settings();
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &TranslationSettings {
        &self.draft
    }

    pub fn set_api_key(&mut self, value: impl Into<String>) {
        self.draft.api_key = value.into();
    }

    pub fn set_language_model(&mut self, value: impl Into<String>) {
        self.draft.language_model = value.into();
    }

    pub fn set_source_lang(&mut self, value: impl Into<String>) {
        self.draft.source_lang = value.into();
    }

    pub fn set_target_lang(&mut self, value: impl Into<String>) {
        self.draft.target_lang = value.into();
    }

    pub fn set_system_prompt(&mut self, value: impl Into<String>) {
        self.draft.system_prompt = value.into();
    }

    /// Writes the draft to the store and closes the dialog.
    ///
    /// On a persistence error the dialog stays open; the store has still
    /// taken the new values in memory.
    pub fn save(&mut self, store: &TranslationSettingsStore) -> Result<TranslationSettings> {
        let saved = store.set_translation_settings(self.draft.clone().into())?;
        self.open = false;
        Ok(saved)
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }
}
