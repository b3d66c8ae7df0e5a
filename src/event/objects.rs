//! Strongly-shaped records for every event kind.
//!
//! Except for `ping`, every event is an [`Event`] envelope around an object
//! that names the chat it happened in. Keys that a record does not declare are
//! ignored when decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::method::Method;

/// Objects scoped to a chat.
pub trait ChatScoped {
    fn chat(&self) -> &str;
}

/// Common envelope shared by every chat-scoped event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event<O> {
    pub method: Method,
    pub user_id: i64,
    pub object: O,
    #[serde(default)]
    pub message: Option<Message>,
}

impl<O: ChatScoped> Event<O> {
    pub fn chat(&self) -> &str {
        self.object.chat()
    }
}

/// Message that triggered an event, as seen by the bot owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub conversation_message_id: i64,
    pub from_id: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub peer_id: Option<i64>,
}

/// Liveness probe sent when the webhook is (re)registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub method: Method,
    pub user_id: i64,
}

macro_rules! chat_scoped {
    ($($object:ty),* $(,)?) => {
        $(
            impl ChatScoped for $object {
                fn chat(&self) -> &str {
                    &self.chat
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatObject {
    pub chat: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanExpiredObject {
    pub chat: String,
    pub user_id: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddUserObject {
    pub chat: String,
    pub user_id: i64,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreMessagesObject {
    pub chat: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub local_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeSignalsObject {
    pub chat: String,
    pub conversation_message_id: i64,
    pub text: String,
    pub from_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMessagesObject {
    pub chat: String,
    pub local_ids: Vec<i64>,
    #[serde(default)]
    pub is_spam: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMessagesFromUserObject {
    pub chat: String,
    pub local_ids: Vec<i64>,
    pub user_id: i64,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub is_spam: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintBookmarkObject {
    pub chat: String,
    pub conversation_message_id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenLinksObject {
    pub chat: String,
    pub local_ids: Vec<i64>,
}

/// Shared by `sendSignal` and `sendMySignal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalObject {
    pub chat: String,
    pub from_id: i64,
    pub value: String,
    pub conversation_message_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HireApiObject {
    pub chat: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanGetReasonObject {
    pub chat: String,
    pub local_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToGroupObject {
    pub chat: String,
    pub local_id: i64,
    pub group_id: i64,
}

chat_scoped!(
    ChatObject,
    BanExpiredObject,
    AddUserObject,
    IgnoreMessagesObject,
    SubscribeSignalsObject,
    DeleteMessagesObject,
    DeleteMessagesFromUserObject,
    PrintBookmarkObject,
    ForbiddenLinksObject,
    SignalObject,
    HireApiObject,
    BanGetReasonObject,
    ToGroupObject,
);

pub type BindChat = Event<ChatObject>;
pub type BanExpired = Event<BanExpiredObject>;
pub type AddUser = Event<AddUserObject>;
pub type IgnoreMessages = Event<IgnoreMessagesObject>;
pub type SubscribeSignals = Event<SubscribeSignalsObject>;
pub type DeleteMessages = Event<DeleteMessagesObject>;
pub type DeleteMessagesFromUser = Event<DeleteMessagesFromUserObject>;
pub type PrintBookmark = Event<PrintBookmarkObject>;
pub type ForbiddenLinks = Event<ForbiddenLinksObject>;
pub type SendSignal = Event<SignalObject>;
pub type HireApi = Event<HireApiObject>;
pub type BanGetReason = Event<BanGetReasonObject>;
pub type ToGroup = Event<ToGroupObject>;
