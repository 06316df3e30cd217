//! Gemini model list: wire schema, filtering, mapping and ordering.

use glossa_core::model::{ModelDescription, ModelInterface};
use serde::Deserialize;
use std::cmp::Ordering;

/// One entry of the vendor's `models.list` response.
///
/// Required fields are enforced: a response missing any of them fails to parse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModel {
    pub name: String,
    #[serde(default)]
    pub base_model_id: Option<String>,
    pub version: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub input_token_limit: u32,
    pub output_token_limit: u32,
    pub supported_generation_methods: Vec<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModelsListResponse {
    pub models: Vec<WireModel>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Models the application never offers, matched as substrings of the name.
const DENIED_MODELS: &[&str] = &[
    "models/aqa",
    "models/gemini-1.0-pro-vision",
    "models/gemini-pro-vision",
    "models/learnlm-",
    "-tts",
];

/// Family prefixes in preferred display order; unknown families sort last.
const FAMILY_ORDER: &[&str] = &[
    "models/gemini-3",
    "models/gemini-2.5-pro",
    "models/gemini-2.5-flash",
    "models/gemini-2.0-pro",
    "models/gemini-2.0-flash",
    "models/gemini-1.5-pro",
    "models/gemini-1.5-flash",
    "models/gemini-1.0",
    "models/gemma",
];

const FULL_INTERFACES: &[ModelInterface] = &[
    ModelInterface::Chat,
    ModelInterface::Vision,
    ModelInterface::Json,
    ModelInterface::Fn,
];
const CHAT_ONLY: &[ModelInterface] = &[ModelInterface::Chat];

/// Per-family presentation hints.
struct KnownFamily {
    prefix: &'static str,
    interfaces: &'static [ModelInterface],
    /// Pinned point releases are hidden in favour of the rolling alias.
    hide_versioned: bool,
}

const KNOWN_FAMILIES: &[KnownFamily] = &[
    KnownFamily {
        prefix: "models/gemini-3",
        interfaces: FULL_INTERFACES,
        hide_versioned: false,
    },
    KnownFamily {
        prefix: "models/gemini-2.",
        interfaces: FULL_INTERFACES,
        hide_versioned: false,
    },
    KnownFamily {
        prefix: "models/gemini-1.5-",
        interfaces: FULL_INTERFACES,
        hide_versioned: true,
    },
    KnownFamily {
        prefix: "models/gemini-1.0-",
        interfaces: CHAT_ONLY,
        hide_versioned: true,
    },
    KnownFamily {
        prefix: "models/gemma",
        interfaces: CHAT_ONLY,
        hide_versioned: false,
    },
];

/// Keeps models that can generate content and are not on the deny-list.
pub fn gemini_filter_models(model: &WireModel) -> bool {
    let generates = model
        .supported_generation_methods
        .iter()
        .any(|method| method == GENERATE_CONTENT_METHOD);
    generates && !DENIED_MODELS.iter().any(|denied| model.name.contains(denied))
}

/// Maps a wire model to the application's description.
///
/// Returns `None` for names outside the `models/` namespace.
pub fn gemini_model_to_model_description(model: &WireModel) -> Option<ModelDescription> {
    if !model.name.starts_with("models/") {
        return None;
    }

    let family = KNOWN_FAMILIES
        .iter()
        .find(|family| model.name.starts_with(family.prefix));

    let interfaces = family
        .map(|f| f.interfaces.to_vec())
        .unwrap_or_else(|| CHAT_ONLY.to_vec());

    let is_pinned = model
        .name
        .rsplit('-')
        .next()
        .is_some_and(|suffix| suffix.len() == 3 && suffix.chars().all(|c| c.is_ascii_digit()));
    let hidden = family.is_some_and(|f| f.hide_versioned) && is_pinned;

    let mut description = model.description.clone().unwrap_or_default();
    if description.is_empty() {
        description = format!("{} (version {})", model.display_name, model.version);
    }

    Some(ModelDescription {
        id: model.name.clone(),
        label: model.display_name.clone(),
        created: None,
        description,
        context_window: model.input_token_limit.checked_add(model.output_token_limit),
        max_completion_tokens: Some(model.output_token_limit),
        interfaces,
        hidden,
    })
}

fn family_rank(id: &str) -> usize {
    FAMILY_ORDER
        .iter()
        .position(|prefix| id.starts_with(prefix))
        .unwrap_or(FAMILY_ORDER.len())
}

/// Preferred ordering: by family, visible before hidden, then newest id first.
pub fn gemini_sort_models(a: &ModelDescription, b: &ModelDescription) -> Ordering {
    family_rank(&a.id)
        .cmp(&family_rank(&b.id))
        .then_with(|| a.hidden.cmp(&b.hidden))
        .then_with(|| b.id.cmp(&a.id))
}
