//! Gemini safety settings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Harm categories the vendor filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategorySexuallyExplicit,
    HarmCategoryHateSpeech,
    HarmCategoryHarassment,
    HarmCategoryDangerousContent,
}

impl HarmCategory {
    /// The four categories configured on every request.
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryDangerousContent,
    ];
}

/// How aggressively a category is blocked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    HarmBlockThresholdUnspecified,
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    #[default]
    BlockNone,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// One setting per category, all sharing `threshold`.
pub fn uniform_safety_settings(threshold: HarmBlockThreshold) -> Vec<SafetySetting> {
    HarmCategory::ALL
        .iter()
        .map(|&category| SafetySetting {
            category,
            threshold,
        })
        .collect()
}
