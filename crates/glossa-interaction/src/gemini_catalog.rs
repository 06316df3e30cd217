//! Gemini model catalog proxy.
//!
//! Forwards a model-listing request to the vendor with the caller's access
//! settings and reshapes the answer into [`ListModelsResponse`].

use crate::gemini_models::{
    WireModelsListResponse, gemini_filter_models, gemini_model_to_model_description,
    gemini_sort_models,
};
use crate::gemini_translator::API_KEY_HEADER;
use crate::rpc::{RpcError, RpcErrorCode};
use glossa_core::config::DEFAULT_GEMINI_HOST;
use glossa_core::model::{ListModelsResponse, ModelDescription};
use glossa_core::safety::{HarmBlockThreshold, SafetySetting, uniform_safety_settings};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

pub const MODELS_LIST_PATH: &str = "/v1beta/models";
pub const MODEL_GET_PATH: &str = "/v1beta/{model=models/*}";
const MODEL_REF_PLACEHOLDER: &str = "{model=models/*}";
const API_CLIENT_HEADER: &str = "x-goog-api-client";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeminiDialect {
    #[default]
    Gemini,
}

/// Caller-supplied access settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiAccess {
    pub dialect: GeminiDialect,
    /// Empty means "use the server's `GEMINI_API_KEY`".
    pub gemini_key: String,
    /// Empty means the public endpoint.
    pub gemini_host: String,
    pub min_safety_level: HarmBlockThreshold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessOnlyInput {
    pub access: GeminiAccess,
}

/// A resolved outbound request target.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    pub headers: HeaderMap,
    pub url: String,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetyBody<'a> {
    safety_settings: &'a [SafetySetting],
}

/// Normalizes a user-supplied host for use with `api_path`.
///
/// Adds `https://` when no scheme is given, drops trailing slashes, and drops
/// a trailing path segment that `api_path` already starts with.
pub fn fixup_host(host: &str, api_path: &str) -> String {
    let mut host = host.trim().to_string();
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("https://{host}");
    }
    while host.ends_with('/') {
        host.pop();
    }
    if let Some(segment) = api_path.split('/').find(|s| !s.is_empty()) {
        let suffix = format!("/{segment}");
        if host.ends_with(&suffix) {
            host.truncate(host.len() - suffix.len());
        }
    }
    host
}

/// Proxy for the vendor's model-listing endpoint.
#[derive(Clone)]
pub struct GeminiModelCatalog {
    client: Client,
    server_api_key: Option<String>,
    client_id: String,
}

impl Default for GeminiModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiModelCatalog {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            server_api_key: None,
            client_id: format!("glossa/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Uses `GEMINI_API_KEY` from the environment when callers send no key.
    pub fn from_env() -> Self {
        let server_api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self {
            server_api_key,
            ..Self::new()
        }
    }

    pub fn with_server_api_key(mut self, key: impl Into<String>) -> Self {
        self.server_api_key = Some(key.into());
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Resolves URL, headers and safety settings for `api_path`.
    ///
    /// Paths containing `{model=models/*}` need `model_ref_id`.
    pub fn gemini_access(
        &self,
        access: &GeminiAccess,
        model_ref_id: Option<&str>,
        api_path: &str,
    ) -> Result<AccessRequest, RpcError> {
        let key = if access.gemini_key.is_empty() {
            self.server_api_key.clone().unwrap_or_default()
        } else {
            access.gemini_key.clone()
        };
        let host = if access.gemini_host.is_empty() {
            DEFAULT_GEMINI_HOST
        } else {
            access.gemini_host.as_str()
        };
        let host = fixup_host(host, api_path);

        let mut path = api_path.to_string();
        if path.contains(MODEL_REF_PLACEHOLDER) {
            let model_ref = model_ref_id.ok_or_else(|| {
                RpcError::internal(format!("geminiAccess: modelRefId is required for {api_path}"))
            })?;
            path = path.replace(MODEL_REF_PLACEHOLDER, model_ref);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            API_CLIENT_HEADER,
            HeaderValue::from_str(&self.client_id)
                .map_err(|e| RpcError::internal(format!("Invalid client id header: {e}")))?,
        );
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&key)
                .map_err(|_| RpcError::bad_request("Gemini API key contains invalid characters"))?,
        );

        Ok(AccessRequest {
            headers,
            url: format!("{host}{path}"),
            safety_settings: uniform_safety_settings(access.min_safety_level),
        })
    }

    async fn gemini_post<T: serde::de::DeserializeOwned>(
        &self,
        access: &GeminiAccess,
        model_ref_id: Option<&str>,
        api_path: &str,
    ) -> Result<T, RpcError> {
        let request = self.gemini_access(access, model_ref_id, api_path)?;
        tracing::debug!(url = %request.url, "Gemini catalog request");

        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .json(&SafetyBody {
                safety_settings: &request.safety_settings,
            })
            .send()
            .await
            .map_err(|err| RpcError::internal(format!("[Gemini Network Issue] {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RpcError::internal(format!("[Gemini Network Issue] {err}")))?;

        if !status.is_success() {
            tracing::warn!(%status, "Gemini catalog request failed");
            let excerpt: String = body.chars().take(512).collect();
            return Err(RpcError::new(
                RpcErrorCode::from_status(status),
                format!("[Gemini Issue] {status}: {excerpt}"),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|err| RpcError::internal(format!("[Gemini Issue] unexpected response: {err}")))
    }

    /// Lists the models the application supports, in preferred order.
    pub async fn list_models(&self, input: &AccessOnlyInput) -> Result<ListModelsResponse, RpcError> {
        let wire: WireModelsListResponse = self
            .gemini_post(&input.access, None, MODELS_LIST_PATH)
            .await?;

        let mut models: Vec<ModelDescription> = wire
            .models
            .iter()
            .filter(|model| gemini_filter_models(model))
            .filter_map(gemini_model_to_model_description)
            .collect();
        models.sort_by(gemini_sort_models);

        tracing::info!(
            received = wire.models.len(),
            listed = models.len(),
            "Listed Gemini models"
        );
        Ok(ListModelsResponse { models })
    }
}
