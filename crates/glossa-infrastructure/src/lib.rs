pub mod config_service;
pub mod paths;
pub mod storage;
pub mod toml_translation_settings_repository;

pub use crate::config_service::ConfigService;
pub use crate::paths::GlossaPaths;
pub use crate::toml_translation_settings_repository::TomlTranslationSettingsRepository;
