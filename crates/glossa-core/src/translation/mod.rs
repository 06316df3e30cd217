//! Translation domain module.
//!
//! # Module Structure
//!
//! - `settings`: persisted settings, partial updates, the settings store
//! - `credential`: random API key selection
//! - `prompt`: prompt template substitution
//! - `fan_out`: the translator trait and concurrent per-fragment translation

mod credential;
mod fan_out;
mod prompt;
mod settings;

pub use credential::select_api_key;
pub use fan_out::{
    FanOutPolicy, FragmentFailure, TextTranslator, TranslatedFragments, translate_fragments,
};
pub use prompt::{SOURCE_LANG_PLACEHOLDER, TARGET_LANG_PLACEHOLDER, TEXT_PLACEHOLDER, format_prompt};
pub use settings::{
    DEFAULT_LANGUAGE_MODEL, DEFAULT_SOURCE_LANG, DEFAULT_SYSTEM_PROMPT, DEFAULT_TARGET_LANG,
    TranslationSettings, TranslationSettingsPatch, TranslationSettingsRepository,
    TranslationSettingsStore,
};
