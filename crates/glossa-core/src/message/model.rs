//! Chat message model.

use super::fragment::{Fragment, FragmentId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};

/// Identifier of a message within a conversation.
pub type MessageId = String;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    /// Generated by a model.
    Assistant,
    /// Instructions for the model; editable but never generated.
    System,
}

/// User-settable flags on a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserFlag {
    Starred,
    /// Excluded from the context sent to the model.
    AixSkip,
    NotifyComplete,
    VndAntCacheAuto,
    VndAntCacheUser,
}

/// Why the generator stopped producing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenStopReason {
    Ok,
    OutOfTokens,
    Filter,
    ClientAbort,
}

/// Metadata about the model that generated a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGenerator {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_stop_reason: Option<TokenStopReason>,
}

/// A chat message as owned by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    #[serde(default)]
    pub fragments: Vec<Fragment>,
    #[serde(default)]
    pub user_flags: BTreeSet<UserFlag>,
    #[serde(default)]
    pub pending_incomplete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<MessageGenerator>,
    /// Creation time, epoch milliseconds.
    pub created: i64,
    /// Last edit time, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(id: impl Into<MessageId>, role: MessageRole, fragments: Vec<Fragment>) -> Self {
        Self {
            id: id.into(),
            role,
            fragments,
            user_flags: BTreeSet::new(),
            pending_incomplete: false,
            purpose_id: None,
            generator: None,
            created: chrono::Utc::now().timestamp_millis(),
            updated: None,
        }
    }

    pub fn has_user_flag(&self, flag: UserFlag) -> bool {
        self.user_flags.contains(&flag)
    }

    pub fn fragment(&self, fragment_id: &FragmentId) -> Option<&Fragment> {
        self.fragments.iter().find(|f| &f.id == fragment_id)
    }

    /// Whether the last generation stopped because it ran out of tokens.
    pub fn stopped_out_of_tokens(&self) -> bool {
        self.generator
            .as_ref()
            .and_then(|g| g.token_stop_reason)
            .is_some_and(|reason| reason == TokenStopReason::OutOfTokens)
    }
}
