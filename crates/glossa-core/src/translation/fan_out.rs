//! Concurrent per-fragment translation.

use crate::error::{GlossaError, Result};
use crate::message::{Fragment, FragmentId};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

/// Translates a single piece of text.
///
/// `Ok(None)` means the backend answered without usable text; callers keep the
/// original text in that case.
#[async_trait::async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate_text(&self, text: &str) -> Result<Option<String>>;
}

/// What to do when some fragments fail to translate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutPolicy {
    /// Any failure fails the whole batch and nothing is replaced.
    #[default]
    AbortOnError,
    /// Failed fragments keep their original text; the rest are replaced.
    KeepOriginalOnError,
}

/// A fragment that could not be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    pub index: usize,
    pub fragment_id: FragmentId,
    pub error: GlossaError,
}

/// Result of a fan-out: the full replacement sequence plus any tolerated failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedFragments {
    pub fragments: Vec<Fragment>,
    /// Number of text fragments whose text was replaced.
    pub translated: usize,
    pub failures: Vec<FragmentFailure>,
}

enum Outcome {
    PassThrough,
    Translated(String),
    Unchanged,
    Failed(GlossaError),
}

/// Translates every text fragment concurrently and reassembles the sequence.
///
/// All calls are driven to completion before the policy is applied, so no
/// request is left running after this returns. Output position `i` always
/// corresponds to input position `i`; non-text fragments pass through as-is.
pub async fn translate_fragments(
    translator: &dyn TextTranslator,
    fragments: &[Fragment],
    policy: FanOutPolicy,
) -> Result<TranslatedFragments> {
    let outcomes = join_all(fragments.iter().map(|fragment| async move {
        match fragment.text() {
            None => Outcome::PassThrough,
            Some(text) => match translator.translate_text(text).await {
                Ok(Some(translated)) => Outcome::Translated(translated),
                Ok(None) => Outcome::Unchanged,
                Err(e) => Outcome::Failed(e),
            },
        }
    }))
    .await;

    let mut output = Vec::with_capacity(fragments.len());
    let mut failures = Vec::new();
    let mut translated = 0;

    for (index, (fragment, outcome)) in fragments.iter().zip(outcomes).enumerate() {
        match outcome {
            Outcome::Translated(text) => {
                translated += 1;
                output.push(fragment.with_text(text));
            }
            Outcome::PassThrough | Outcome::Unchanged => output.push(fragment.clone()),
            Outcome::Failed(error) => {
                tracing::warn!(
                    index,
                    fragment_id = %fragment.id,
                    "Fragment translation failed: {}",
                    error
                );
                failures.push(FragmentFailure {
                    index,
                    fragment_id: fragment.id.clone(),
                    error,
                });
                output.push(fragment.clone());
            }
        }
    }

    if policy == FanOutPolicy::AbortOnError {
        if let Some(first) = failures.into_iter().next() {
            return Err(first.error);
        }
        failures = Vec::new();
    }

    Ok(TranslatedFragments {
        fragments: output,
        translated,
        failures,
    })
}
