//! Prompt template substitution.

pub const SOURCE_LANG_PLACEHOLDER: &str = "{sourceLang}";
pub const TARGET_LANG_PLACEHOLDER: &str = "{targetLang}";
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Fills the translation prompt template.
///
/// Placeholders are substituted in order (source language, target language,
/// text) and only their first occurrence is replaced.
pub fn format_prompt(template: &str, source_lang: &str, target_lang: &str, text: &str) -> String {
    template
        .replacen(SOURCE_LANG_PLACEHOLDER, source_lang, 1)
        .replacen(TARGET_LANG_PLACEHOLDER, target_lang, 1)
        .replacen(TEXT_PLACEHOLDER, text, 1)
}
