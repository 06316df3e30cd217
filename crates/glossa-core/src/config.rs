//! Application configuration (`config.toml`).

use crate::safety::HarmBlockThreshold;
use crate::translation::FanOutPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// API host; also used as the base of translation requests.
    #[serde(default = "default_gemini_host")]
    pub host: String,
    /// Threshold sent with model listing requests.
    #[serde(default)]
    pub min_safety_level: HarmBlockThreshold,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            host: default_gemini_host(),
            min_safety_level: HarmBlockThreshold::default(),
        }
    }
}

fn default_gemini_host() -> String {
    DEFAULT_GEMINI_HOST.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationConfig {
    #[serde(default)]
    pub fan_out_policy: FanOutPolicy,
}
