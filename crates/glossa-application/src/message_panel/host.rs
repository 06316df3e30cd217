//! Handlers the embedding application supplies to a message panel.

use async_trait::async_trait;
use glossa_core::message::{Fragment, FragmentId, UserFlag};
use glossa_core::{GlossaError, Result};

/// Which [`MessageHost`] handlers are wired up.
///
/// The panel only offers operations whose handler is present, and never
/// calls a handler whose flag is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub append_fragment: bool,
    pub delete_fragment: bool,
    pub replace_fragment: bool,
    pub replace_fragments: bool,
    pub toggle_user_flag: bool,
    pub delete_message: bool,
    pub branch_message: bool,
    pub truncate_message: bool,
    pub continue_message: bool,
    pub assistant_from: bool,
    pub beam: bool,
    pub diagram: bool,
    pub imagine: bool,
    pub speak: bool,
    pub copy_to_clipboard: bool,
}

impl HostCapabilities {
    /// Every handler present.
    pub fn all() -> Self {
        Self {
            append_fragment: true,
            delete_fragment: true,
            replace_fragment: true,
            replace_fragments: true,
            toggle_user_flag: true,
            delete_message: true,
            branch_message: true,
            truncate_message: true,
            continue_message: true,
            assistant_from: true,
            beam: true,
            diagram: true,
            imagine: true,
            speak: true,
            copy_to_clipboard: true,
        }
    }
}

fn unsupported(handler: &str) -> GlossaError {
    GlossaError::host(format!("{handler} handler is not available"))
}

/// Message mutations and side effects owned by the host.
///
/// The panel never edits a message itself; it asks the host through these
/// handlers and is handed the updated message afterwards. Handlers the host
/// does not implement keep the default body and must be reported as absent in
/// [`MessageHost::capabilities`].
#[async_trait]
pub trait MessageHost: Send + Sync {
    fn capabilities(&self) -> HostCapabilities;

    async fn append_fragment(&self, _message_id: &str, _fragment: Fragment) -> Result<()> {
        Err(unsupported("append-fragment"))
    }

    async fn delete_fragment(&self, _message_id: &str, _fragment_id: &FragmentId) -> Result<()> {
        Err(unsupported("delete-fragment"))
    }

    async fn replace_fragment(
        &self,
        _message_id: &str,
        _fragment_id: &FragmentId,
        _fragment: Fragment,
    ) -> Result<()> {
        Err(unsupported("replace-fragment"))
    }

    /// Replaces the whole fragment sequence in one step.
    async fn replace_fragments(&self, _message_id: &str, _fragments: Vec<Fragment>) -> Result<()> {
        Err(unsupported("replace-fragments"))
    }

    async fn toggle_user_flag(
        &self,
        _message_id: &str,
        _flag: UserFlag,
        _max_per_conversation: Option<usize>,
    ) -> Result<()> {
        Err(unsupported("toggle-user-flag"))
    }

    async fn delete_message(&self, _message_id: &str) -> Result<()> {
        Err(unsupported("delete-message"))
    }

    async fn branch_message(&self, _message_id: &str) -> Result<()> {
        Err(unsupported("branch-message"))
    }

    async fn truncate_message(&self, _message_id: &str) -> Result<()> {
        Err(unsupported("truncate-message"))
    }

    async fn continue_message(&self, _message_id: &str) -> Result<()> {
        Err(unsupported("continue-message"))
    }

    /// Regenerates the conversation from a message; `offset` is relative to it.
    async fn assistant_from(&self, _message_id: &str, _offset: i32) -> Result<()> {
        Err(unsupported("assistant-from"))
    }

    async fn beam(&self, _message_id: &str) -> Result<()> {
        Err(unsupported("beam"))
    }

    async fn diagram(&self, _message_id: &str, _text: &str) -> Result<()> {
        Err(unsupported("diagram"))
    }

    async fn imagine(&self, _text: &str) -> Result<()> {
        Err(unsupported("imagine"))
    }

    async fn speak(&self, _text: &str) -> Result<()> {
        Err(unsupported("speak"))
    }

    async fn copy_to_clipboard(&self, _text: &str) -> Result<()> {
        Err(unsupported("copy-to-clipboard"))
    }
}
