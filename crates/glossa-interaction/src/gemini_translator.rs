//! GeminiTranslator - translates text through the Gemini `generateContent` endpoint.
//!
//! Settings are read from the shared store on every call, so edits made in the
//! settings dialog apply to the next fragment translated.

use glossa_core::config::DEFAULT_GEMINI_HOST;
use glossa_core::safety::{HarmBlockThreshold, SafetySetting, uniform_safety_settings};
use glossa_core::translation::{
    TextTranslator, TranslationSettingsStore, format_prompt, select_api_key,
};
use glossa_core::{GlossaError, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_CONTENT_PATH: &str = "/v1beta/models";

/// Translator backed by the Gemini HTTP API.
///
/// No timeout or retry is applied; a slow upstream blocks the call until the
/// transport gives up.
#[derive(Clone)]
pub struct GeminiTranslator {
    client: Client,
    base_url: String,
    settings: Arc<TranslationSettingsStore>,
}

impl GeminiTranslator {
    pub fn new(settings: Arc<TranslationSettingsStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_GEMINI_HOST.to_string(),
            settings,
        }
    }

    /// Overrides the API host (e.g. a proxy or a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Reuses an existing HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}{}/{model}:generateContent",
            self.base_url, GENERATE_CONTENT_PATH
        )
    }

    async fn send_request(
        &self,
        api_key: &str,
        model: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<Value> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| GlossaError::transport(format!("Gemini API request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            // The body is still read below; an error payload has no candidates.
            tracing::warn!(%status, model, "Gemini API returned a non-success status");
        }

        let body_text = response.text().await.map_err(|err| {
            GlossaError::transport(format!("Failed to read Gemini response: {err}"))
        })?;

        Ok(serde_json::from_str(&body_text)?)
    }
}

#[async_trait::async_trait]
impl TextTranslator for GeminiTranslator {
    async fn translate_text(&self, text: &str) -> Result<Option<String>> {
        let settings = self.settings.settings();

        let api_key = select_api_key(&settings.api_key, &mut rand::thread_rng())
            .map(str::to_owned)
            .ok_or(GlossaError::MissingCredential)?;

        let prompt = format_prompt(
            &settings.system_prompt,
            &settings.source_lang,
            &settings.target_lang,
            text,
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &prompt }],
            }],
            safety_settings: uniform_safety_settings(HarmBlockThreshold::BlockNone),
        };

        tracing::debug!(
            model = %settings.language_model,
            chars = text.len(),
            "Translating text fragment"
        );

        let response = self
            .send_request(&api_key, &settings.language_model, &request)
            .await?;

        let translated = extract_first_text(&response);
        if translated.is_none() {
            tracing::debug!("Gemini response had no candidate text, keeping original");
        }
        Ok(translated)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Reads `candidates[0].content.parts[0].text`; empty text counts as absent.
fn extract_first_text(response: &Value) -> Option<String> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
