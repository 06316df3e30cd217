//! Translation settings and their store.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

pub const DEFAULT_LANGUAGE_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_SOURCE_LANG: &str = "English";
pub const DEFAULT_TARGET_LANG: &str = "Russian";
pub const DEFAULT_SYSTEM_PROMPT: &str = "Translate from {sourceLang} to {targetLang}:\n{text}";

/// Persisted settings for ad-hoc message translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// One or more API keys, comma-separated.
    pub api_key: String,
    pub language_model: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Prompt template with `{sourceLang}`, `{targetLang}` and `{text}` placeholders.
    pub system_prompt: String,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language_model: DEFAULT_LANGUAGE_MODEL.to_string(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl TranslationSettings {
    /// Merges the fields present in `patch` into these settings.
    pub fn merge(&mut self, patch: TranslationSettingsPatch) {
        let TranslationSettingsPatch {
            api_key,
            language_model,
            source_lang,
            target_lang,
            system_prompt,
        } = patch;
        if let Some(value) = api_key {
            self.api_key = value;
        }
        if let Some(value) = language_model {
            self.language_model = value;
        }
        if let Some(value) = source_lang {
            self.source_lang = value;
        }
        if let Some(value) = target_lang {
            self.target_lang = value;
        }
        if let Some(value) = system_prompt {
            self.system_prompt = value;
        }
    }
}

impl std::fmt::Display for TranslationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key_count = self.api_key.split(',').filter(|k| !k.is_empty()).count();
        writeln!(f, "api keys:       {key_count} configured")?;
        writeln!(f, "language model: {}", self.language_model)?;
        writeln!(f, "source lang:    {}", self.source_lang)?;
        writeln!(f, "target lang:    {}", self.target_lang)?;
        write!(f, "system prompt:  {:?}", self.system_prompt)
    }
}

/// A partial update of [`TranslationSettings`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl From<TranslationSettings> for TranslationSettingsPatch {
    fn from(settings: TranslationSettings) -> Self {
        Self {
            api_key: Some(settings.api_key),
            language_model: Some(settings.language_model),
            source_lang: Some(settings.source_lang),
            target_lang: Some(settings.target_lang),
            system_prompt: Some(settings.system_prompt),
        }
    }
}

/// Durable storage for translation settings.
///
/// The record is read once at startup and overwritten wholesale on save.
pub trait TranslationSettingsRepository: Send + Sync {
    /// Loads the stored settings, `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<TranslationSettings>>;

    /// Replaces the stored settings.
    fn save(&self, settings: &TranslationSettings) -> Result<()>;
}

/// In-memory view of the translation settings, persisted on every change.
///
/// Constructed once at startup and shared through `Arc` with every component
/// that translates or edits settings.
pub struct TranslationSettingsStore {
    settings: RwLock<TranslationSettings>,
    repository: Arc<dyn TranslationSettingsRepository>,
}

impl TranslationSettingsStore {
    /// Loads the settings from `repository`, falling back to defaults.
    pub fn load(repository: Arc<dyn TranslationSettingsRepository>) -> Result<Self> {
        let settings = repository.load()?.unwrap_or_default();
        tracing::debug!(
            model = %settings.language_model,
            source = %settings.source_lang,
            target = %settings.target_lang,
            "Loaded translation settings"
        );
        Ok(Self {
            settings: RwLock::new(settings),
            repository,
        })
    }

    /// Returns a snapshot of the current settings.
    pub fn settings(&self) -> TranslationSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merges `patch` into the current settings and persists the result.
    ///
    /// The in-memory settings are updated even when persisting fails; the
    /// persistence error is still returned.
    pub fn set_translation_settings(
        &self,
        patch: TranslationSettingsPatch,
    ) -> Result<TranslationSettings> {
        let merged = {
            let mut guard = self
                .settings
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            guard.merge(patch);
            guard.clone()
        };

        if let Err(e) = self.repository.save(&merged) {
            tracing::warn!("Failed to persist translation settings: {}", e);
            return Err(e);
        }
        Ok(merged)
    }
}
