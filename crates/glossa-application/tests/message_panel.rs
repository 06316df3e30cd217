use async_trait::async_trait;
use glossa_application::message_panel::{
    HostCapabilities, MessageHost, MessageOperation, MessagePanel, OperationOutcome, PanelMenu,
    PanelProps,
};
use glossa_core::message::{
    Fragment, FragmentId, FragmentPart, Message, MessageGenerator, MessageRole, TokenStopReason,
    UserFlag,
};
use glossa_core::translation::{
    TextTranslator, TranslationSettings, TranslationSettingsRepository, TranslationSettingsStore,
};
use glossa_core::{GlossaError, Result};
use glossa_interaction::GeminiTranslator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Append(String),
    DeleteFragment(FragmentId),
    ReplaceFragment(FragmentId, Fragment),
    ReplaceFragments(Vec<Fragment>),
    ToggleFlag(UserFlag, Option<usize>),
    AssistantFrom(i32),
    Diagram(String),
    Imagine(String),
    Copy(String),
    Truncate,
}

struct RecordingHost {
    caps: HostCapabilities,
    calls: Mutex<Vec<Call>>,
    /// Fragment whose replace-fragment call fails.
    rejected_fragment: Option<FragmentId>,
}

impl RecordingHost {
    fn new(caps: HostCapabilities) -> Arc<Self> {
        Arc::new(Self {
            caps,
            calls: Mutex::new(Vec::new()),
            rejected_fragment: None,
        })
    }

    fn rejecting(fragment_id: &str) -> Arc<Self> {
        Arc::new(Self {
            caps: HostCapabilities::all(),
            calls: Mutex::new(Vec::new()),
            rejected_fragment: Some(fragment_id.into()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl MessageHost for RecordingHost {
    fn capabilities(&self) -> HostCapabilities {
        self.caps
    }

    async fn append_fragment(&self, _message_id: &str, fragment: Fragment) -> Result<()> {
        self.record(Call::Append(fragment.text().unwrap_or_default().to_string()))
    }

    async fn delete_fragment(&self, _message_id: &str, fragment_id: &FragmentId) -> Result<()> {
        self.record(Call::DeleteFragment(fragment_id.clone()))
    }

    async fn replace_fragment(
        &self,
        _message_id: &str,
        fragment_id: &FragmentId,
        fragment: Fragment,
    ) -> Result<()> {
        if self.rejected_fragment.as_ref() == Some(fragment_id) {
            return Err(GlossaError::host(format!("fragment {fragment_id} is locked")));
        }
        self.record(Call::ReplaceFragment(fragment_id.clone(), fragment))
    }

    async fn replace_fragments(&self, _message_id: &str, fragments: Vec<Fragment>) -> Result<()> {
        self.record(Call::ReplaceFragments(fragments))
    }

    async fn toggle_user_flag(
        &self,
        _message_id: &str,
        flag: UserFlag,
        max_per_conversation: Option<usize>,
    ) -> Result<()> {
        self.record(Call::ToggleFlag(flag, max_per_conversation))
    }

    async fn truncate_message(&self, _message_id: &str) -> Result<()> {
        self.record(Call::Truncate)
    }

    async fn assistant_from(&self, _message_id: &str, offset: i32) -> Result<()> {
        self.record(Call::AssistantFrom(offset))
    }

    async fn diagram(&self, _message_id: &str, text: &str) -> Result<()> {
        self.record(Call::Diagram(text.to_string()))
    }

    async fn imagine(&self, text: &str) -> Result<()> {
        self.record(Call::Imagine(text.to_string()))
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        self.record(Call::Copy(text.to_string()))
    }
}

/// Prefixes text with the target language; "boom" fails.
struct TagTranslator;

#[async_trait]
impl TextTranslator for TagTranslator {
    async fn translate_text(&self, text: &str) -> Result<Option<String>> {
        if text == "boom" {
            return Err(GlossaError::transport("reset"));
        }
        Ok(Some(format!("[ru] {text}")))
    }
}

/// Upper-cases text after a delay.
struct SlowTranslator;

#[async_trait]
impl TextTranslator for SlowTranslator {
    async fn translate_text(&self, text: &str) -> Result<Option<String>> {
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok(Some(text.to_uppercase()))
    }
}

struct NoKeyTranslator;

#[async_trait]
impl TextTranslator for NoKeyTranslator {
    async fn translate_text(&self, _text: &str) -> Result<Option<String>> {
        Err(GlossaError::MissingCredential)
    }
}

#[derive(Default)]
struct MemoryRepository(Mutex<Option<TranslationSettings>>);

impl TranslationSettingsRepository for MemoryRepository {
    fn load(&self) -> Result<Option<TranslationSettings>> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save(&self, settings: &TranslationSettings) -> Result<()> {
        *self.0.lock().unwrap() = Some(settings.clone());
        Ok(())
    }
}

fn store() -> Arc<TranslationSettingsStore> {
    Arc::new(TranslationSettingsStore::load(Arc::new(MemoryRepository::default())).unwrap())
}

fn text(id: &str, text: &str) -> Fragment {
    Fragment::new(id, FragmentPart::Text { text: text.into() })
}

fn message(role: MessageRole) -> Message {
    Message::new(
        "m1",
        role,
        vec![
            text("f1", "Hello there"),
            Fragment::new(
                "f2",
                FragmentPart::Image {
                    mime_type: "image/png".into(),
                    uri: "https://example.com/cat.png".into(),
                    alt_text: None,
                },
            ),
            text("f3", "General Kenobi"),
        ],
    )
}

fn panel(role: MessageRole, host: Arc<RecordingHost>) -> MessagePanel {
    MessagePanel::new(message(role), host, Arc::new(TagTranslator), store())
}

fn operations(panel: &MessagePanel) -> Vec<(MessageOperation, bool)> {
    panel
        .available_operations()
        .into_iter()
        .map(|e| (e.operation, e.enabled))
        .collect()
}

fn enabled(panel: &MessagePanel, operation: MessageOperation) -> Option<bool> {
    operations(panel)
        .into_iter()
        .find(|(op, _)| *op == operation)
        .map(|(_, enabled)| enabled)
}

#[tokio::test]
async fn test_translate_and_revert_through_menu() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::Assistant, host.clone());
    let original = panel.message().fragments.clone();

    assert_eq!(enabled(&panel, MessageOperation::RevertOriginal), None);
    assert_eq!(enabled(&panel, MessageOperation::Translate), Some(true));

    panel.toggle_operations_menu();
    let outcome = panel.dispatch(MessageOperation::Translate).await.unwrap();
    assert_eq!(panel.open_menu(), None);
    let report = match outcome {
        OperationOutcome::Translated(report) => report,
        other => panic!("expected a translation report, got {other:?}"),
    };
    assert_eq!(report.translated, 2);

    let calls = host.calls();
    let Call::ReplaceFragments(translated) = &calls[0] else {
        panic!("expected replace-fragments, got {calls:?}");
    };
    let ids: Vec<_> = translated.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2", "f3"]);
    assert_eq!(translated[0].text(), Some("[ru] Hello there"));
    assert_eq!(translated[1], original[1]);

    // The host applies the change and hands the message back.
    let mut updated = panel.message().clone();
    updated.fragments = translated.clone();
    panel.set_message(updated);

    assert_eq!(enabled(&panel, MessageOperation::RevertOriginal), Some(true));
    assert_eq!(
        panel.dispatch(MessageOperation::RevertOriginal).await.unwrap(),
        OperationOutcome::Done
    );
    assert_eq!(host.calls()[1], Call::ReplaceFragments(original));
    assert_eq!(enabled(&panel, MessageOperation::RevertOriginal), None);
    assert!(!panel.revert_original().await.unwrap());
}

#[tokio::test]
async fn test_missing_credential_leaves_panel_idle() {
    let host = RecordingHost::new(HostCapabilities::all());
    let panel = MessagePanel::new(
        message(MessageRole::User),
        host.clone(),
        Arc::new(NoKeyTranslator),
        store(),
    );

    let err = panel.translate().await.unwrap_err();
    assert!(err.is_missing_credential());
    assert!(!panel.translation().is_in_progress());
    assert!(host.calls().is_empty());
    assert_eq!(enabled(&panel, MessageOperation::Translate), Some(true));
}

#[tokio::test]
async fn test_empty_key_never_reaches_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let host = RecordingHost::new(HostCapabilities::all());
    let settings = store();
    let translator = GeminiTranslator::new(settings.clone()).with_base_url(server.uri());
    let panel = MessagePanel::new(
        message(MessageRole::User),
        host.clone(),
        Arc::new(translator),
        settings,
    );

    let err = panel.translate().await.unwrap_err();
    assert_eq!(err, GlossaError::MissingCredential);
    assert!(!panel.translation().is_in_progress());
    assert!(host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_revert_disabled_while_translating() {
    let host = RecordingHost::new(HostCapabilities::all());
    let panel = MessagePanel::new(
        message(MessageRole::User),
        host.clone(),
        Arc::new(SlowTranslator),
        store(),
    );

    let running = panel.translate();
    let check = async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        let during = (
            enabled(&panel, MessageOperation::RevertOriginal),
            enabled(&panel, MessageOperation::Translate),
        );
        (during, panel.revert_original().await)
    };
    let (report, (during, revert)) = tokio::join!(running, check);

    assert_eq!(report.unwrap().translated, 2);
    assert_eq!(during, (Some(false), Some(false)));
    assert_eq!(revert.unwrap_err(), GlossaError::TranslationInProgress("m1".into()));
    assert_eq!(host.calls().len(), 1);
    assert_eq!(enabled(&panel, MessageOperation::RevertOriginal), Some(true));
}

#[tokio::test]
async fn test_keep_original_policy_through_panel() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut msg = message(MessageRole::User);
    msg.fragments.push(text("f4", "boom"));
    let panel = MessagePanel::new(msg, host.clone(), Arc::new(TagTranslator), store())
        .with_fan_out_policy(glossa_core::translation::FanOutPolicy::KeepOriginalOnError);

    let report = panel.translate().await.unwrap();
    assert_eq!(report.failures.len(), 1);
    let Call::ReplaceFragments(fragments) = &host.calls()[0] else {
        panic!("expected replace-fragments");
    };
    assert_eq!(fragments[3].text(), Some("boom"));
}

#[tokio::test]
async fn test_assistant_from_offsets() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut assistant = panel(MessageRole::Assistant, host.clone());
    assistant.dispatch(MessageOperation::AssistantFrom).await.unwrap();

    let mut user = panel(MessageRole::User, host.clone());
    user.dispatch(MessageOperation::AssistantFrom).await.unwrap();

    let mut system = panel(MessageRole::System, host.clone());
    assert_eq!(enabled(&system, MessageOperation::AssistantFrom), Some(false));
    assert_eq!(
        system.dispatch(MessageOperation::AssistantFrom).await.unwrap(),
        OperationOutcome::Skipped
    );

    assert_eq!(host.calls(), vec![Call::AssistantFrom(-1), Call::AssistantFrom(0)]);
}

#[tokio::test]
async fn test_flag_toggles() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::User, host.clone()).with_props(PanelProps {
        show_ant_prompt_caching: true,
        ..Default::default()
    });

    panel.dispatch(MessageOperation::ToggleStarred).await.unwrap();
    panel.dispatch(MessageOperation::ToggleAntCacheUser).await.unwrap();
    panel.dispatch(MessageOperation::ToggleSkip).await.unwrap();
    // Only offered while the message is still generating.
    assert_eq!(
        panel.dispatch(MessageOperation::ToggleNotifyComplete).await.unwrap(),
        OperationOutcome::Skipped
    );

    assert_eq!(
        host.calls(),
        vec![
            Call::ToggleFlag(UserFlag::Starred, None),
            Call::ToggleFlag(UserFlag::VndAntCacheUser, Some(4)),
            Call::ToggleFlag(UserFlag::AixSkip, None),
        ]
    );

    let mut skipped = panel.message().clone();
    skipped.user_flags.insert(UserFlag::AixSkip);
    panel.set_message(skipped);
    assert_eq!(enabled(&panel, MessageOperation::ToggleAntCacheUser), None);

    let mut pending = panel.message().clone();
    pending.pending_incomplete = true;
    panel.set_message(pending);
    assert_eq!(enabled(&panel, MessageOperation::ToggleNotifyComplete), Some(true));
    assert_eq!(enabled(&panel, MessageOperation::ToggleSkip), None);
    assert_eq!(enabled(&panel, MessageOperation::ToggleEdit), Some(false));
}

#[tokio::test]
async fn test_apply_all_edits() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::User, host.clone());

    assert!(panel.set_edited_text("f1".into(), "Hi"));
    assert!(panel.set_edited_text("f3".into(), ""));
    assert!(panel.set_edited_text("gone".into(), "orphan"));
    assert!(panel.set_edited_text("f2".into(), "not text"));
    assert!(panel.set_edited_text("f1".into(), "Hi again"));
    assert!(panel.is_editing());
    assert_eq!(panel.edited_text(&"f1".into()), Some("Hi again"));

    panel.apply_all_edits(true).await.unwrap();
    assert!(!panel.is_editing());
    assert_eq!(
        host.calls(),
        vec![
            Call::ReplaceFragment("f1".into(), text("f1", "Hi again")),
            Call::DeleteFragment("f3".into()),
            Call::AssistantFrom(0),
        ]
    );
}

#[tokio::test]
async fn test_failed_edit_does_not_drop_the_rest() {
    let host = RecordingHost::rejecting("f1");
    let mut panel = panel(MessageRole::User, host.clone());

    panel.set_edited_text("f1".into(), "Hi");
    panel.set_edited_text("f3".into(), "Bye");
    panel.set_edited_text("f2".into(), "");

    let err = panel.apply_all_edits(true).await.unwrap_err();
    assert_eq!(err, GlossaError::host("fragment f1 is locked"));
    assert!(!panel.is_editing());
    assert_eq!(
        host.calls(),
        vec![
            Call::ReplaceFragment("f3".into(), text("f3", "Bye")),
            Call::DeleteFragment("f2".into()),
        ]
    );
}

#[tokio::test]
async fn test_edits_need_replace_handler_and_settled_message() {
    let host = RecordingHost::new(HostCapabilities::default());
    let mut panel = panel(MessageRole::User, host.clone());
    assert!(!panel.set_edited_text("f1".into(), "x"));
    assert_eq!(enabled(&panel, MessageOperation::ToggleEdit), None);

    let host = RecordingHost::new(HostCapabilities::all());
    let mut msg = message(MessageRole::Assistant);
    msg.pending_incomplete = true;
    let mut pending = MessagePanel::new(msg, host, Arc::new(TagTranslator), store());
    assert!(!pending.set_edited_text("f1".into(), "x"));
}

#[tokio::test]
async fn test_toggle_edit_and_cancel() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::User, host.clone());

    panel.dispatch(MessageOperation::ToggleEdit).await.unwrap();
    assert!(panel.is_editing());
    panel.set_edited_text("f1".into(), "draft");
    panel.dispatch(MessageOperation::ToggleEdit).await.unwrap();
    assert!(!panel.is_editing());
    panel.apply_all_edits(false).await.unwrap();
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_append_blank_fragment() {
    let host = RecordingHost::new(HostCapabilities::all());
    let panel = panel(MessageRole::User, host.clone());
    panel.append_blank_fragment().await.unwrap();
    assert_eq!(host.calls(), vec![Call::Append(String::new())]);
}

#[tokio::test]
async fn test_text_operations_use_selection() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::Assistant, host.clone());

    // Flattened text is long enough to imagine but too short to diagram.
    assert_eq!(panel.text_subject(), "Hello there\n\nGeneral Kenobi");
    assert_eq!(enabled(&panel, MessageOperation::Diagram), Some(false));
    assert_eq!(
        panel.dispatch(MessageOperation::Diagram).await.unwrap(),
        OperationOutcome::Skipped
    );

    panel.set_selection(Some("Kenobi".to_string()));
    assert!(panel.open_selection_bubble());
    assert_eq!(panel.open_menu(), Some(PanelMenu::SelectionBubble));
    panel.dispatch(MessageOperation::Imagine).await.unwrap();
    panel.dispatch(MessageOperation::Copy).await.unwrap();

    panel.set_selection(Some("x".repeat(120)));
    panel.dispatch(MessageOperation::Diagram).await.unwrap();

    panel.set_selection(Some("/imagine a cat".to_string()));
    assert_eq!(enabled(&panel, MessageOperation::Imagine), Some(false));

    panel.set_props(PanelProps {
        is_imagining: true,
        ..Default::default()
    });
    panel.set_selection(None);
    assert_eq!(enabled(&panel, MessageOperation::Imagine), Some(false));

    assert_eq!(
        host.calls(),
        vec![
            Call::Imagine("Kenobi".into()),
            Call::Copy("Kenobi".into()),
            Call::Diagram("x".repeat(120)),
        ]
    );
}

#[tokio::test]
async fn test_selection_bubble_rules() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::User, host.clone());

    panel.set_selection(Some("ab".to_string()));
    assert!(!panel.open_selection_bubble());

    panel.set_selection(Some("abc".to_string()));
    assert!(panel.open_selection_bubble());
    panel.set_selection(None);
    assert_eq!(panel.open_menu(), None);

    let mut system = self::panel(MessageRole::System, host);
    system.set_selection(Some("abcdef".to_string()));
    assert!(!system.open_selection_bubble());
}

#[tokio::test]
async fn test_truncate_and_continue_depend_on_position() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut msg = message(MessageRole::Assistant);
    msg.generator = Some(MessageGenerator {
        name: "gemini-2.5-pro".into(),
        token_stop_reason: Some(TokenStopReason::OutOfTokens),
    });
    let mut panel = MessagePanel::new(msg, host.clone(), Arc::new(TagTranslator), store());

    assert_eq!(enabled(&panel, MessageOperation::Truncate), Some(true));
    assert_eq!(enabled(&panel, MessageOperation::Continue), None);

    panel.set_props(PanelProps {
        is_bottom: true,
        ..Default::default()
    });
    assert_eq!(enabled(&panel, MessageOperation::Truncate), Some(false));
    assert_eq!(enabled(&panel, MessageOperation::Continue), Some(true));

    panel.set_props(PanelProps::default());
    panel.dispatch(MessageOperation::Truncate).await.unwrap();
    assert_eq!(host.calls(), vec![Call::Truncate]);
}

#[tokio::test]
async fn test_menu_without_host_handlers() {
    let host = RecordingHost::new(HostCapabilities::default());
    let panel = panel(MessageRole::User, host);
    assert_eq!(
        operations(&panel),
        vec![
            (MessageOperation::Translate, true),
            (MessageOperation::TranslationSettings, true),
        ]
    );
}

#[tokio::test]
async fn test_hover_and_menus() {
    let host = RecordingHost::new(HostCapabilities::all());
    let mut panel = panel(MessageRole::User, host).with_props(PanelProps {
        is_mobile: true,
        ..Default::default()
    });

    panel.set_hovering(true);
    assert!(!panel.is_hovering());

    panel.toggle_operations_menu();
    assert_eq!(panel.open_menu(), Some(PanelMenu::Operations));
    assert!(panel.open_context_menu());
    assert_eq!(panel.open_menu(), Some(PanelMenu::Context));
    panel.close_menu();
    assert_eq!(panel.open_menu(), None);
}

#[tokio::test]
async fn test_settings_dialog_from_menu() {
    let host = RecordingHost::new(HostCapabilities::all());
    let settings = store();
    let mut panel = MessagePanel::new(
        message(MessageRole::User),
        host,
        Arc::new(TagTranslator),
        settings.clone(),
    );

    panel.dispatch(MessageOperation::TranslationSettings).await.unwrap();
    assert!(panel.settings_dialog().is_open());
    panel.settings_dialog_mut().set_target_lang("Ukrainian");
    panel.save_settings_dialog().unwrap();

    assert!(!panel.settings_dialog().is_open());
    assert_eq!(settings.settings().target_lang, "Ukrainian");
}
