use iris_dispatch::{Method, RawEvent};
use serde_json::{json, Value};

pub fn raw(value: Value) -> RawEvent {
    match value {
        Value::Object(map) => map,
        _ => panic!("test payload must be an object"),
    }
}

/// Smallest well-formed payload for every method.
pub fn sample_event(method: Method, user_id: i64, chat: &str) -> RawEvent {
    let object = match method {
        Method::Ping => None,
        Method::BindChat => Some(json!({ "chat": chat })),
        Method::BanExpired => Some(json!({ "chat": chat, "user_id": 2 })),
        Method::AddUser => Some(json!({ "chat": chat, "user_id": 2, "source": "invite" })),
        Method::IgnoreMessages => Some(json!({ "chat": chat, "local_ids": [1, 2, 3] })),
        Method::SubscribeSignals => Some(json!({
            "chat": chat,
            "conversation_message_id": 4,
            "text": ".с подписаться",
            "from_id": 2,
        })),
        Method::DeleteMessages => Some(json!({ "chat": chat, "local_ids": [5], "is_spam": true })),
        Method::DeleteMessagesFromUser => Some(json!({
            "chat": chat,
            "local_ids": [5, 6],
            "user_id": 2,
            "amount": 2,
        })),
        Method::PrintBookmark => Some(json!({
            "chat": chat,
            "conversation_message_id": 7,
            "description": "rules",
        })),
        Method::ForbiddenLinks => Some(json!({ "chat": chat, "local_ids": [8] })),
        Method::SendSignal | Method::SendMySignal => Some(json!({
            "chat": chat,
            "from_id": 2,
            "value": "hello",
            "conversation_message_id": 9,
        })),
        Method::HireApi => Some(json!({ "chat": chat, "price": 100 })),
        Method::BanGetReason => Some(json!({ "chat": chat, "local_id": 10 })),
        Method::ToGroup => Some(json!({ "chat": chat, "local_id": 11, "group_id": 12 })),
    };

    let mut event = json!({
        "method": method.to_string(),
        "user_id": user_id,
        "secret": "secret",
    });
    if let Some(object) = object {
        event["object"] = object;
    }
    raw(event)
}
