use super::open_settings_store;
use anyhow::{Context, Result};
use glossa_core::translation::TranslationSettingsPatch;
use glossa_infrastructure::GlossaPaths;

pub fn show(paths: &GlossaPaths) -> Result<()> {
    let store = open_settings_store(paths)?;
    println!("{}", store.settings());
    println!("\nfile: {}", paths.translation_settings_file().display());
    Ok(())
}

pub fn set(
    paths: &GlossaPaths,
    api_key: Option<String>,
    language_model: Option<String>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    system_prompt: Option<String>,
) -> Result<()> {
    let patch = TranslationSettingsPatch {
        api_key,
        language_model,
        source_lang,
        target_lang,
        system_prompt,
    };
    if patch == TranslationSettingsPatch::default() {
        println!("Nothing to change.");
        return Ok(());
    }

    let store = open_settings_store(paths)?;
    let saved = store
        .set_translation_settings(patch)
        .context("Failed to save translation settings")?;

    println!("✓ Translation settings saved");
    println!("{saved}");
    Ok(())
}
