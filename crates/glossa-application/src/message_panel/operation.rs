//! Operations offered by the message menu.

use crate::translation_session::TranslationReport;
use strum::Display;

/// A user-initiated operation on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MessageOperation {
    /// Starts editing, or discards edits when already editing.
    ToggleEdit,
    Copy,
    ToggleStarred,
    ToggleNotifyComplete,
    ToggleAntCacheUser,
    ToggleSkip,
    Branch,
    Delete,
    Truncate,
    Diagram,
    Imagine,
    Speak,
    /// Restart (user message) or retry (assistant message) from here.
    AssistantFrom,
    Beam,
    Continue,
    RevertOriginal,
    Translate,
    TranslationSettings,
}

/// A menu line: the operation and whether it can be chosen right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub operation: MessageOperation,
    pub enabled: bool,
}

impl MenuEntry {
    pub(crate) fn new(operation: MessageOperation, enabled: bool) -> Self {
        Self { operation, enabled }
    }
}

/// What a dispatched operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Done,
    /// The operation was not offered or was disabled.
    Skipped,
    Translated(TranslationReport),
    /// Revert found no snapshot.
    NothingToRevert,
}
