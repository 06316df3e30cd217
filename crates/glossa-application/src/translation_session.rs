//! Per-panel translation state: the in-flight guard and the one-level undo.

use crate::message_panel::MessageHost;
use glossa_core::message::Fragment;
use glossa_core::translation::{FanOutPolicy, FragmentFailure, TextTranslator, translate_fragments};
use glossa_core::{GlossaError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Outcome of a completed message translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationReport {
    /// Text fragments that received new text.
    pub translated: usize,
    /// Failures tolerated under [`FanOutPolicy::KeepOriginalOnError`].
    pub failures: Vec<FragmentFailure>,
    /// Whether the host accepted the replacement sequence.
    pub applied: bool,
}

/// Translation state of a single message panel.
///
/// At most one translation runs at a time; a second request while one is
/// running fails with [`GlossaError::TranslationInProgress`].
#[derive(Debug, Default)]
pub struct TranslationSession {
    in_progress: AtomicBool,
    snapshot: Mutex<Option<Vec<Fragment>>>,
}

/// Clears the busy flag when dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, message_id: &str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GlossaError::TranslationInProgress(message_id.to_string()))?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl TranslationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub fn has_snapshot(&self) -> bool {
        self.lock_snapshot().is_some()
    }

    /// The fragments captured before the most recent translation, if any.
    pub fn snapshot(&self) -> Option<Vec<Fragment>> {
        self.lock_snapshot().clone()
    }

    fn lock_snapshot(&self) -> std::sync::MutexGuard<'_, Option<Vec<Fragment>>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Translates every text fragment of a message and hands the result to
    /// the host in a single replace-fragments call.
    ///
    /// The current fragments are captured first, overwriting any earlier
    /// snapshot. Under [`FanOutPolicy::AbortOnError`] a failed fragment fails
    /// the whole call; the message is left untouched but the snapshot stays.
    /// When the host has no replace-fragments handler the translated
    /// sequence is dropped and the report says so.
    pub async fn translate_message(
        &self,
        message_id: &str,
        fragments: &[Fragment],
        translator: &dyn TextTranslator,
        host: &dyn MessageHost,
        policy: FanOutPolicy,
    ) -> Result<TranslationReport> {
        let _guard = InFlightGuard::acquire(&self.in_progress, message_id)?;

        *self.lock_snapshot() = Some(fragments.to_vec());

        tracing::info!(
            message_id,
            fragments = fragments.len(),
            text_fragments = fragments.iter().filter(|f| f.is_text()).count(),
            ?policy,
            "Translating message"
        );

        let result = translate_fragments(translator, fragments, policy).await?;

        let applied = if host.capabilities().replace_fragments {
            host.replace_fragments(message_id, result.fragments).await?;
            true
        } else {
            tracing::debug!(message_id, "Host has no replace-fragments handler, discarding translation");
            false
        };

        tracing::info!(
            message_id,
            translated = result.translated,
            failed = result.failures.len(),
            applied,
            "Message translation finished"
        );

        Ok(TranslationReport {
            translated: result.translated,
            failures: result.failures,
            applied,
        })
    }

    /// Restores the captured fragments and clears the snapshot.
    ///
    /// Returns `Ok(false)` when there is nothing to revert. If the host
    /// rejects the replacement the snapshot is kept. Reverting while a
    /// translation runs fails with [`GlossaError::TranslationInProgress`].
    pub async fn revert(&self, message_id: &str, host: &dyn MessageHost) -> Result<bool> {
        let _guard = InFlightGuard::acquire(&self.in_progress, message_id)?;

        let Some(original) = self.snapshot() else {
            return Ok(false);
        };

        if host.capabilities().replace_fragments {
            host.replace_fragments(message_id, original).await?;
        }
        *self.lock_snapshot() = None;

        tracing::info!(message_id, "Reverted message to its original fragments");
        Ok(true)
    }
}
