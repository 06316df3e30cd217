//! Panel inputs and values derived from the message.

use glossa_core::message::{Message, MessageRole, UserFlag};

/// Text-to-image shortcuts; subjects starting with these are not re-processed.
const SPECIAL_T2I_PREFIXES: &[&str] = &["https://images.prodia.xyz/", "/draw ", "/imagine ", "/img "];
const DIAGRAM_MIN_CHARS: usize = 100;
const IMAGINE_MIN_CHARS: usize = 3;
pub(crate) const BUBBLE_MIN_TEXT_LENGTH: usize = 3;

/// Host-provided display context of a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelProps {
    pub is_mobile: bool,
    /// The message is the last one in the conversation.
    pub is_bottom: bool,
    pub is_imagining: bool,
    pub is_speaking: bool,
    pub show_ant_prompt_caching: bool,
}

/// The single popup a panel can show at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMenu {
    Operations,
    Context,
    /// Floating toolbar over a text selection.
    SelectionBubble,
}

/// Flags derived from a message for display and menu decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFlags {
    pub from_assistant: bool,
    pub from_system: bool,
    pub from_user: bool,
    pub has_been_edited: bool,
    pub user_skipped: bool,
    pub starred: bool,
    pub notify_complete: bool,
    pub ant_cache_auto: bool,
    pub ant_cache_user: bool,
}

impl MessageFlags {
    pub fn derive(message: &Message, props: &PanelProps) -> Self {
        let caching = props.show_ant_prompt_caching;
        Self {
            from_assistant: message.role == MessageRole::Assistant,
            from_system: message.role == MessageRole::System,
            from_user: message.role == MessageRole::User,
            has_been_edited: message.updated.is_some(),
            user_skipped: message.has_user_flag(UserFlag::AixSkip),
            starred: message.has_user_flag(UserFlag::Starred),
            notify_complete: message.has_user_flag(UserFlag::NotifyComplete),
            ant_cache_auto: caching && message.has_user_flag(UserFlag::VndAntCacheAuto),
            ant_cache_user: caching && message.has_user_flag(UserFlag::VndAntCacheUser),
        }
    }
}

/// What the text-based operations may do with a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAbilities {
    pub could_diagram: bool,
    pub could_imagine: bool,
    pub could_speak: bool,
}

impl TextAbilities {
    pub fn of(subject: &str) -> Self {
        let special = SPECIAL_T2I_PREFIXES.iter().any(|p| subject.starts_with(p));
        let chars = subject.chars().count();
        let could_imagine = chars >= IMAGINE_MIN_CHARS && !special;
        Self {
            could_diagram: chars >= DIAGRAM_MIN_CHARS && !special,
            could_imagine,
            could_speak: could_imagine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::message::create_text_content_fragment;

    #[test]
    fn test_cache_flags_need_prompt_caching_enabled() {
        let mut message = Message::new("m", MessageRole::User, vec![]);
        message.user_flags.insert(UserFlag::VndAntCacheUser);
        message.user_flags.insert(UserFlag::Starred);

        let hidden = MessageFlags::derive(&message, &PanelProps::default());
        assert!(!hidden.ant_cache_user);
        assert!(hidden.starred);
        assert!(hidden.from_user);

        let shown = MessageFlags::derive(
            &message,
            &PanelProps {
                show_ant_prompt_caching: true,
                ..Default::default()
            },
        );
        assert!(shown.ant_cache_user);
        assert!(!shown.ant_cache_auto);
    }

    #[test]
    fn test_edited_flag() {
        let mut message = Message::new("m", MessageRole::System, vec![create_text_content_fragment("x")]);
        assert!(!MessageFlags::derive(&message, &PanelProps::default()).has_been_edited);
        message.updated = Some(message.created + 1);
        let flags = MessageFlags::derive(&message, &PanelProps::default());
        assert!(flags.has_been_edited);
        assert!(flags.from_system);
    }

    #[test]
    fn test_text_abilities() {
        let short = TextAbilities::of("hi");
        assert!(!short.could_imagine && !short.could_speak && !short.could_diagram);

        let medium = TextAbilities::of("a cat on a mat");
        assert!(medium.could_imagine && medium.could_speak);
        assert!(!medium.could_diagram);

        let long = "x".repeat(100);
        assert!(TextAbilities::of(&long).could_diagram);

        let special = TextAbilities::of(&format!("/imagine {long}"));
        assert!(!special.could_diagram && !special.could_imagine && !special.could_speak);
    }
}
