//! Model descriptions returned by the model catalog.

use serde::{Deserialize, Serialize};

/// Capabilities a model exposes to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelInterface {
    #[serde(rename = "oai-chat")]
    Chat,
    #[serde(rename = "oai-chat-vision")]
    Vision,
    #[serde(rename = "oai-chat-json")]
    Json,
    #[serde(rename = "oai-chat-fn")]
    Fn,
}

/// The application's description of one selectable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescription {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    pub interfaces: Vec<ModelInterface>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

/// Response of the model listing procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListModelsResponse {
    pub models: Vec<ModelDescription>,
}
