//! View-model of a single chat message: menus, edits, and translation.

use super::host::MessageHost;
use super::operation::{MenuEntry, MessageOperation, OperationOutcome};
use super::state::{BUBBLE_MIN_TEXT_LENGTH, MessageFlags, PanelMenu, PanelProps, TextAbilities};
use crate::settings_dialog::TranslationSettingsDialog;
use crate::translation_session::{TranslationReport, TranslationSession};
use glossa_core::Result;
use glossa_core::message::{
    Fragment, FragmentId, Message, UserFlag, create_text_content_fragment, fragments_reduce_text,
    update_fragment_with_edited_text,
};
use glossa_core::translation::{FanOutPolicy, TextTranslator, TranslationSettingsStore};
use std::sync::Arc;

/// Messages that may carry the user cache breakpoint at once.
const ANT_CACHE_USER_MAX_PER_CONVERSATION: usize = 4;

/// View-model of one chat message.
///
/// The panel keeps only transient UI state; every change to the message goes
/// through the host, which hands the new message back via
/// [`set_message`](Self::set_message).
pub struct MessagePanel {
    message: Message,
    props: PanelProps,
    host: Arc<dyn MessageHost>,
    translator: Arc<dyn TextTranslator>,
    settings: Arc<TranslationSettingsStore>,
    fan_out_policy: FanOutPolicy,
    translation: Arc<TranslationSession>,
    settings_dialog: TranslationSettingsDialog,
    hovering: bool,
    selected_text: Option<String>,
    open_menu: Option<PanelMenu>,
    /// Pending edits in insertion order; `None` when not editing.
    edits: Option<Vec<(FragmentId, String)>>,
}

impl MessagePanel {
    pub fn new(
        message: Message,
        host: Arc<dyn MessageHost>,
        translator: Arc<dyn TextTranslator>,
        settings: Arc<TranslationSettingsStore>,
    ) -> Self {
        Self {
            message,
            props: PanelProps::default(),
            host,
            translator,
            settings,
            fan_out_policy: FanOutPolicy::default(),
            translation: Arc::new(TranslationSession::new()),
            settings_dialog: TranslationSettingsDialog::new(),
            hovering: false,
            selected_text: None,
            open_menu: None,
            edits: None,
        }
    }

    pub fn with_props(mut self, props: PanelProps) -> Self {
        self.props = props;
        self
    }

    pub fn with_fan_out_policy(mut self, policy: FanOutPolicy) -> Self {
        self.fan_out_policy = policy;
        self
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Receives the host's current version of the message.
    pub fn set_message(&mut self, message: Message) {
        self.message = message;
    }

    pub fn props(&self) -> PanelProps {
        self.props
    }

    pub fn set_props(&mut self, props: PanelProps) {
        self.props = props;
    }

    pub fn flags(&self) -> MessageFlags {
        MessageFlags::derive(&self.message, &self.props)
    }

    pub fn translation(&self) -> &Arc<TranslationSession> {
        &self.translation
    }

    pub fn settings_dialog(&self) -> &TranslationSettingsDialog {
        &self.settings_dialog
    }

    pub fn settings_dialog_mut(&mut self) -> &mut TranslationSettingsDialog {
        &mut self.settings_dialog
    }

    /// Saves the open settings dialog into the shared store.
    pub fn save_settings_dialog(&mut self) -> Result<()> {
        self.settings_dialog.save(&self.settings).map(|_| ())
    }

    // ------------------------------------------------------------------
    // Transient UI state
    // ------------------------------------------------------------------

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Hover tracking is disabled on mobile.
    pub fn set_hovering(&mut self, hovering: bool) {
        if !self.props.is_mobile {
            self.hovering = hovering;
        }
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }

    /// Updates the selection; clearing it also closes the selection bubble.
    pub fn set_selection(&mut self, text: Option<String>) {
        self.selected_text = text.filter(|t| !t.is_empty());
        if self.selected_text.is_none() && self.open_menu == Some(PanelMenu::SelectionBubble) {
            self.open_menu = None;
        }
    }

    pub fn open_menu(&self) -> Option<PanelMenu> {
        self.open_menu
    }

    pub fn toggle_operations_menu(&mut self) {
        self.open_menu = match self.open_menu {
            Some(PanelMenu::Operations) => None,
            _ => Some(PanelMenu::Operations),
        };
    }

    /// Opens the context menu when the message is editable.
    pub fn open_context_menu(&mut self) -> bool {
        if !self.host.capabilities().replace_fragment {
            return false;
        }
        self.open_menu = Some(PanelMenu::Context);
        true
    }

    /// Opens the bubble over the current selection, if it is long enough.
    pub fn open_selection_bubble(&mut self) -> bool {
        let long_enough = self
            .selected_text
            .as_deref()
            .is_some_and(|t| t.chars().count() >= BUBBLE_MIN_TEXT_LENGTH);
        if !long_enough || self.flags().from_system {
            return false;
        }
        self.open_menu = Some(PanelMenu::SelectionBubble);
        true
    }

    pub fn close_menu(&mut self) {
        self.open_menu = None;
    }

    // ------------------------------------------------------------------
    // Text subject
    // ------------------------------------------------------------------

    /// The selection if there is one, else all text-bearing content.
    pub fn text_subject(&self) -> String {
        match &self.selected_text {
            Some(selection) => selection.clone(),
            None => fragments_reduce_text(&self.message.fragments),
        }
    }

    pub fn text_abilities(&self) -> TextAbilities {
        TextAbilities::of(&self.text_subject())
    }

    // ------------------------------------------------------------------
    // Fragment editing
    // ------------------------------------------------------------------

    pub fn is_editing(&self) -> bool {
        self.edits.is_some()
    }

    fn can_edit(&self) -> bool {
        self.host.capabilities().replace_fragment && !self.message.pending_incomplete
    }

    pub fn start_editing(&mut self) -> bool {
        if !self.can_edit() {
            return false;
        }
        self.edits.get_or_insert_with(Vec::new);
        true
    }

    /// Buffers edited text for a fragment, starting an edit if needed.
    pub fn set_edited_text(&mut self, fragment_id: FragmentId, text: impl Into<String>) -> bool {
        if !self.can_edit() {
            return false;
        }
        let text = text.into();
        let edits = self.edits.get_or_insert_with(Vec::new);
        match edits.iter_mut().find(|(id, _)| *id == fragment_id) {
            Some(entry) => entry.1 = text,
            None => edits.push((fragment_id, text)),
        }
        true
    }

    pub fn edited_text(&self, fragment_id: &FragmentId) -> Option<&str> {
        self.edits
            .as_ref()?
            .iter()
            .find(|(id, _)| id == fragment_id)
            .map(|(_, text)| text.as_str())
    }

    pub fn cancel_edits(&mut self) {
        self.edits = None;
    }

    /// Applies every buffered edit, then optionally regenerates from here.
    ///
    /// Empty text deletes the fragment. Edits for fragments that no longer
    /// exist, or cannot hold text, are skipped. A failing edit does not stop
    /// the others; the first error is returned once all were attempted, and
    /// regeneration is then not requested.
    pub async fn apply_all_edits(&mut self, with_control: bool) -> Result<()> {
        let edits = self.edits.take().unwrap_or_default();
        let mut first_error = None;
        for (fragment_id, text) in edits {
            if let Err(err) = self.apply_edit(&fragment_id, &text).await {
                tracing::warn!(%fragment_id, error = %err, "Failed to apply edit");
                first_error.get_or_insert(err);
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }
        if with_control && self.host.capabilities().assistant_from {
            self.host.assistant_from(&self.message.id, 0).await?;
        }
        Ok(())
    }

    async fn apply_edit(&self, fragment_id: &FragmentId, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.delete_fragment(fragment_id).await;
        }
        let Some(old) = self.message.fragment(fragment_id) else {
            tracing::debug!(%fragment_id, "Edited fragment no longer exists");
            return Ok(());
        };
        match update_fragment_with_edited_text(old, text) {
            Some(updated) => self.replace_fragment(fragment_id, updated).await,
            None => Ok(()),
        }
    }

    /// Appends an empty text fragment.
    pub async fn append_blank_fragment(&self) -> Result<()> {
        if !self.host.capabilities().append_fragment {
            return Ok(());
        }
        self.host
            .append_fragment(&self.message.id, create_text_content_fragment(""))
            .await
    }

    pub async fn delete_fragment(&self, fragment_id: &FragmentId) -> Result<()> {
        if !self.host.capabilities().delete_fragment {
            return Ok(());
        }
        self.host.delete_fragment(&self.message.id, fragment_id).await
    }

    pub async fn replace_fragment(&self, fragment_id: &FragmentId, fragment: Fragment) -> Result<()> {
        if !self.host.capabilities().replace_fragment {
            return Ok(());
        }
        self.host
            .replace_fragment(&self.message.id, fragment_id, fragment)
            .await
    }

    // ------------------------------------------------------------------
    // Translation
    // ------------------------------------------------------------------

    /// Translates the message's text fragments in place.
    pub async fn translate(&self) -> Result<TranslationReport> {
        self.translation
            .translate_message(
                &self.message.id,
                &self.message.fragments,
                self.translator.as_ref(),
                self.host.as_ref(),
                self.fan_out_policy,
            )
            .await
    }

    /// Restores the fragments captured before the last translation.
    pub async fn revert_original(&self) -> Result<bool> {
        self.translation
            .revert(&self.message.id, self.host.as_ref())
            .await
    }

    // ------------------------------------------------------------------
    // Operations menu
    // ------------------------------------------------------------------

    /// The operations the menu offers right now, in display order.
    pub fn available_operations(&self) -> Vec<MenuEntry> {
        use MessageOperation as Op;

        let caps = self.host.capabilities();
        let flags = self.flags();
        let props = self.props;
        let pending = self.message.pending_incomplete;
        let text = self.text_abilities();
        let mut entries = Vec::new();

        if caps.replace_fragment {
            entries.push(MenuEntry::new(Op::ToggleEdit, !pending));
        }
        if caps.copy_to_clipboard {
            entries.push(MenuEntry::new(Op::Copy, true));
        }
        if caps.toggle_user_flag {
            entries.push(MenuEntry::new(Op::ToggleStarred, true));
            if pending {
                entries.push(MenuEntry::new(Op::ToggleNotifyComplete, true));
            }
        }
        if !pending && caps.toggle_user_flag {
            if !flags.user_skipped && props.show_ant_prompt_caching {
                entries.push(MenuEntry::new(Op::ToggleAntCacheUser, true));
            }
            entries.push(MenuEntry::new(Op::ToggleSkip, true));
        }
        if caps.branch_message {
            entries.push(MenuEntry::new(Op::Branch, !flags.from_system));
        }
        if caps.delete_message {
            entries.push(MenuEntry::new(Op::Delete, true));
        }
        if caps.truncate_message {
            entries.push(MenuEntry::new(Op::Truncate, !props.is_bottom));
        }
        if caps.diagram {
            entries.push(MenuEntry::new(Op::Diagram, text.could_diagram));
        }
        if caps.imagine {
            entries.push(MenuEntry::new(
                Op::Imagine,
                text.could_imagine && !props.is_imagining,
            ));
        }
        if caps.speak {
            entries.push(MenuEntry::new(Op::Speak, text.could_speak && !props.is_speaking));
        }
        if caps.assistant_from {
            entries.push(MenuEntry::new(Op::AssistantFrom, !flags.from_system));
        }
        if caps.beam {
            entries.push(MenuEntry::new(Op::Beam, !flags.from_system));
        }
        if caps.continue_message && props.is_bottom && self.message.stopped_out_of_tokens() {
            entries.push(MenuEntry::new(Op::Continue, true));
        }
        if self.translation.has_snapshot() {
            entries.push(MenuEntry::new(
                Op::RevertOriginal,
                !self.translation.is_in_progress(),
            ));
        }
        entries.push(MenuEntry::new(
            Op::Translate,
            !self.translation.is_in_progress(),
        ));
        entries.push(MenuEntry::new(Op::TranslationSettings, true));

        entries
    }

    fn is_enabled(&self, operation: MessageOperation) -> bool {
        self.available_operations()
            .iter()
            .any(|entry| entry.operation == operation && entry.enabled)
    }

    /// Runs an operation chosen from the menu and closes the menu.
    ///
    /// Operations that are not currently offered, or are disabled, are
    /// skipped without calling the host.
    pub async fn dispatch(&mut self, operation: MessageOperation) -> Result<OperationOutcome> {
        use MessageOperation as Op;

        self.close_menu();
        if !self.is_enabled(operation) {
            tracing::debug!(%operation, message_id = %self.message.id, "Operation not available");
            return Ok(OperationOutcome::Skipped);
        }
        tracing::debug!(%operation, message_id = %self.message.id, "Dispatching operation");

        let id = self.message.id.clone();
        let flags = self.flags();
        match operation {
            Op::ToggleEdit => {
                if self.is_editing() {
                    self.cancel_edits();
                } else {
                    self.start_editing();
                }
            }
            Op::Copy => self.host.copy_to_clipboard(&self.text_subject()).await?,
            Op::ToggleStarred => self.host.toggle_user_flag(&id, UserFlag::Starred, None).await?,
            Op::ToggleNotifyComplete => {
                self.host
                    .toggle_user_flag(&id, UserFlag::NotifyComplete, None)
                    .await?
            }
            Op::ToggleAntCacheUser => {
                self.host
                    .toggle_user_flag(
                        &id,
                        UserFlag::VndAntCacheUser,
                        Some(ANT_CACHE_USER_MAX_PER_CONVERSATION),
                    )
                    .await?
            }
            Op::ToggleSkip => self.host.toggle_user_flag(&id, UserFlag::AixSkip, None).await?,
            Op::Branch => self.host.branch_message(&id).await?,
            Op::Delete => self.host.delete_message(&id).await?,
            Op::Truncate => self.host.truncate_message(&id).await?,
            Op::Diagram => self.host.diagram(&id, &self.text_subject()).await?,
            Op::Imagine => self.host.imagine(&self.text_subject()).await?,
            Op::Speak => self.host.speak(&self.text_subject()).await?,
            Op::AssistantFrom => {
                let offset = if flags.from_assistant { -1 } else { 0 };
                self.host.assistant_from(&id, offset).await?
            }
            Op::Beam => self.host.beam(&id).await?,
            Op::Continue => self.host.continue_message(&id).await?,
            Op::RevertOriginal => {
                if !self.revert_original().await? {
                    return Ok(OperationOutcome::NothingToRevert);
                }
            }
            Op::Translate => return self.translate().await.map(OperationOutcome::Translated),
            Op::TranslationSettings => self.settings_dialog.open(&self.settings),
        }
        Ok(OperationOutcome::Done)
    }
}
