//! Path management for glossa configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/glossa/                  # Config directory
//! ├── config.toml                    # Application configuration
//! └── translation-settings.toml      # Translation settings (holds API keys)
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "glossa";
const CONFIG_FILE: &str = "config.toml";
const TRANSLATION_SETTINGS_FILE: &str = "translation-settings.toml";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

/// Resolves glossa file locations, optionally under a custom base directory.
#[derive(Debug, Clone)]
pub struct GlossaPaths {
    config_dir: PathBuf,
}

impl GlossaPaths {
    /// Uses the platform config directory (e.g. `~/.config/glossa`).
    pub fn new() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(APP_DIR);
        Ok(Self { config_dir })
    }

    /// Roots every path at `base` (for tests and `--config-dir`).
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        Self {
            config_dir: base.as_ref().to_path_buf(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Path to the translation settings file.
    ///
    /// This file contains API keys and is written with mode 600 on Unix.
    pub fn translation_settings_file(&self) -> PathBuf {
        self.config_dir.join(TRANSLATION_SETTINGS_FILE)
    }
}
