//! Message content fragments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a fragment, unique within its message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(pub String);

impl FragmentId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FragmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FragmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The payload of a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FragmentPart {
    /// Plain text content. The only kind that gets translated.
    Text { text: String },
    /// Image attachment referenced by URI.
    Image {
        mime_type: String,
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt_text: Option<String>,
    },
    /// Document attachment with inline text data.
    Document {
        title: String,
        mime_type: String,
        text: String,
    },
    /// Error produced while generating the message.
    Error { error: String },
    /// Transient placeholder shown while content is pending.
    Placeholder { text: String },
}

/// One independently addressable unit of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: FragmentId,
    #[serde(flatten)]
    pub part: FragmentPart,
}

impl Fragment {
    pub fn new(id: impl Into<FragmentId>, part: FragmentPart) -> Self {
        Self {
            id: id.into(),
            part,
        }
    }

    /// Returns the text of a `Text` fragment.
    pub fn text(&self) -> Option<&str> {
        match &self.part {
            FragmentPart::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.part, FragmentPart::Text { .. })
    }

    /// Returns a copy of this fragment with its text replaced, keeping the id.
    ///
    /// Non-text fragments are returned unchanged.
    pub fn with_text(&self, new_text: impl Into<String>) -> Self {
        match &self.part {
            FragmentPart::Text { .. } => Self {
                id: self.id.clone(),
                part: FragmentPart::Text {
                    text: new_text.into(),
                },
            },
            _ => self.clone(),
        }
    }
}

/// Creates a new text content fragment with a fresh id.
pub fn create_text_content_fragment(text: impl Into<String>) -> Fragment {
    Fragment {
        id: FragmentId::generate(),
        part: FragmentPart::Text { text: text.into() },
    }
}

/// Applies edited text to a fragment, if the fragment kind is editable.
///
/// Text and document fragments are editable; the fragment keeps its id.
pub fn update_fragment_with_edited_text(fragment: &Fragment, edited_text: &str) -> Option<Fragment> {
    let part = match &fragment.part {
        FragmentPart::Text { .. } => FragmentPart::Text {
            text: edited_text.to_string(),
        },
        FragmentPart::Document {
            title, mime_type, ..
        } => FragmentPart::Document {
            title: title.clone(),
            mime_type: mime_type.clone(),
            text: edited_text.to_string(),
        },
        _ => return None,
    };
    Some(Fragment {
        id: fragment.id.clone(),
        part,
    })
}

/// Flattens the text-bearing content fragments of a message into one string.
pub fn fragments_reduce_text(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .filter_map(|fragment| match &fragment.part {
            FragmentPart::Text { text } => Some(text.as_str()),
            FragmentPart::Error { error } => Some(error.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
