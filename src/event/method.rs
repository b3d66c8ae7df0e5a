use serde::{Deserialize, Serialize};

/// Kind of an incoming webhook event, identified by the `method` key.
///
/// The wire form is the camelCase variant name (`bindChat`, `sendMySignal`, ...)
/// and is matched exactly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Method {
    Ping,
    BindChat,
    BanExpired,
    AddUser,
    IgnoreMessages,
    SubscribeSignals,
    DeleteMessages,
    DeleteMessagesFromUser,
    PrintBookmark,
    ForbiddenLinks,
    SendSignal,
    SendMySignal,
    HireApi,
    BanGetReason,
    ToGroup,
}
