use super::open_settings_store;
use anyhow::{Context, Result};
use async_trait::async_trait;
use glossa_application::message_panel::{HostCapabilities, MessageHost, MessagePanel};
use glossa_core::message::{Fragment, Message};
use glossa_infrastructure::{ConfigService, GlossaPaths};
use glossa_interaction::GeminiTranslator;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Host backed by an in-memory copy of a message file.
struct FileMessageHost {
    message: Mutex<Message>,
}

impl FileMessageHost {
    fn message(&self) -> Message {
        self.message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl MessageHost for FileMessageHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            replace_fragments: true,
            ..Default::default()
        }
    }

    async fn replace_fragments(
        &self,
        message_id: &str,
        fragments: Vec<Fragment>,
    ) -> glossa_core::Result<()> {
        let mut message = self.message.lock().unwrap_or_else(PoisonError::into_inner);
        if message.id != message_id {
            return Err(glossa_core::GlossaError::not_found("message", message_id));
        }
        message.fragments = fragments;
        message.updated = Some(chrono::Utc::now().timestamp_millis());
        Ok(())
    }
}

fn read_message(path: &Path) -> Result<Message> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as a message", path.display()))
}

pub async fn run(paths: &GlossaPaths, path: &Path, write: bool) -> Result<()> {
    let message = read_message(path)?;
    let config = ConfigService::new(paths).get_config();
    let settings = open_settings_store(paths)?;

    let translator =
        GeminiTranslator::new(settings.clone()).with_base_url(config.gemini.host.clone());
    let host = Arc::new(FileMessageHost {
        message: Mutex::new(message.clone()),
    });
    let panel = MessagePanel::new(message, host.clone(), Arc::new(translator), settings)
        .with_fan_out_policy(config.translation.fan_out_policy);

    let report = panel
        .translate()
        .await
        .context("Translation failed")?;

    for failure in &report.failures {
        tracing::warn!(
            fragment_id = %failure.fragment_id,
            error = %failure.error,
            "Fragment kept its original text"
        );
    }
    if !report.applied {
        tracing::warn!("Translation was not applied to the message");
    }

    let translated = host.message();
    let json = serde_json::to_string_pretty(&translated)?;
    if write {
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "✓ Translated {} fragment(s), written to {}",
            report.translated,
            path.display()
        );
    } else {
        println!("{json}");
    }
    Ok(())
}
