//! # Event Catalog
//!
//! Turns an untyped webhook payload into a [`TypedEvent`]. The `method` key
//! selects a decoder from a fixed table; the decoder validates the shape for
//! that tag. Decoding is pure and keeps no state.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::trace;

use super::method::Method;
use super::objects::{self, Message};

/// Payload as received from the transport layer.
pub type RawEvent = Map<String, Value>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown event method: {}", .method.as_deref().unwrap_or("<missing>"))]
    UnknownMethod { method: Option<String> },
    #[error("Malformed {method} event: {source}")]
    MalformedEvent {
        method: Method,
        #[source]
        source: serde_json::Error,
    },
    #[error("Event payload must be a JSON object, got {kind}")]
    MalformedPayload { kind: &'static str },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Decoded event, one variant per [`Method`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypedEvent {
    Ping(objects::Ping),
    BindChat(objects::BindChat),
    BanExpired(objects::BanExpired),
    AddUser(objects::AddUser),
    IgnoreMessages(objects::IgnoreMessages),
    SubscribeSignals(objects::SubscribeSignals),
    DeleteMessages(objects::DeleteMessages),
    DeleteMessagesFromUser(objects::DeleteMessagesFromUser),
    PrintBookmark(objects::PrintBookmark),
    ForbiddenLinks(objects::ForbiddenLinks),
    SendSignal(objects::SendSignal),
    SendMySignal(objects::SendSignal),
    HireApi(objects::HireApi),
    BanGetReason(objects::BanGetReason),
    ToGroup(objects::ToGroup),
}

// Matches every variant, binding Ping to `$ping` and the chat-scoped
// envelope of every other variant to `$env`.
macro_rules! with_envelope {
    ($event:expr, $ping:ident => $on_ping:expr, $env:ident => $body:expr) => {
        match $event {
            TypedEvent::Ping($ping) => $on_ping,
            TypedEvent::BindChat($env) => $body,
            TypedEvent::BanExpired($env) => $body,
            TypedEvent::AddUser($env) => $body,
            TypedEvent::IgnoreMessages($env) => $body,
            TypedEvent::SubscribeSignals($env) => $body,
            TypedEvent::DeleteMessages($env) => $body,
            TypedEvent::DeleteMessagesFromUser($env) => $body,
            TypedEvent::PrintBookmark($env) => $body,
            TypedEvent::ForbiddenLinks($env) => $body,
            TypedEvent::SendSignal($env) => $body,
            TypedEvent::SendMySignal($env) => $body,
            TypedEvent::HireApi($env) => $body,
            TypedEvent::BanGetReason($env) => $body,
            TypedEvent::ToGroup($env) => $body,
        }
    };
}

impl TypedEvent {
    pub fn method(&self) -> Method {
        match self {
            TypedEvent::Ping(_) => Method::Ping,
            TypedEvent::BindChat(_) => Method::BindChat,
            TypedEvent::BanExpired(_) => Method::BanExpired,
            TypedEvent::AddUser(_) => Method::AddUser,
            TypedEvent::IgnoreMessages(_) => Method::IgnoreMessages,
            TypedEvent::SubscribeSignals(_) => Method::SubscribeSignals,
            TypedEvent::DeleteMessages(_) => Method::DeleteMessages,
            TypedEvent::DeleteMessagesFromUser(_) => Method::DeleteMessagesFromUser,
            TypedEvent::PrintBookmark(_) => Method::PrintBookmark,
            TypedEvent::ForbiddenLinks(_) => Method::ForbiddenLinks,
            TypedEvent::SendSignal(_) => Method::SendSignal,
            TypedEvent::SendMySignal(_) => Method::SendMySignal,
            TypedEvent::HireApi(_) => Method::HireApi,
            TypedEvent::BanGetReason(_) => Method::BanGetReason,
            TypedEvent::ToGroup(_) => Method::ToGroup,
        }
    }

    pub fn user_id(&self) -> i64 {
        with_envelope!(self, ping => ping.user_id, env => env.user_id)
    }

    /// Chat the event belongs to. `None` for `ping`, which is not chat-scoped.
    pub fn chat(&self) -> Option<&str> {
        with_envelope!(self, _ping => None, env => Some(env.chat()))
    }

    pub fn message(&self) -> Option<&Message> {
        with_envelope!(self, _ping => None, env => env.message.as_ref())
    }
}

type DecodeFn = fn(Value) -> serde_json::Result<TypedEvent>;

fn parse<T: DeserializeOwned>(value: Value) -> serde_json::Result<T> {
    serde_json::from_value(value)
}

/// Decoder table. Exhaustive over [`Method`], so a new tag does not compile
/// until it has an entry here.
fn decoder(method: Method) -> DecodeFn {
    match method {
        Method::Ping => |v| parse(v).map(TypedEvent::Ping),
        Method::BindChat => |v| parse(v).map(TypedEvent::BindChat),
        Method::BanExpired => |v| parse(v).map(TypedEvent::BanExpired),
        Method::AddUser => |v| parse(v).map(TypedEvent::AddUser),
        Method::IgnoreMessages => |v| parse(v).map(TypedEvent::IgnoreMessages),
        Method::SubscribeSignals => |v| parse(v).map(TypedEvent::SubscribeSignals),
        Method::DeleteMessages => |v| parse(v).map(TypedEvent::DeleteMessages),
        Method::DeleteMessagesFromUser => |v| parse(v).map(TypedEvent::DeleteMessagesFromUser),
        Method::PrintBookmark => |v| parse(v).map(TypedEvent::PrintBookmark),
        Method::ForbiddenLinks => |v| parse(v).map(TypedEvent::ForbiddenLinks),
        Method::SendSignal => |v| parse(v).map(TypedEvent::SendSignal),
        Method::SendMySignal => |v| parse(v).map(TypedEvent::SendMySignal),
        Method::HireApi => |v| parse(v).map(TypedEvent::HireApi),
        Method::BanGetReason => |v| parse(v).map(TypedEvent::BanGetReason),
        Method::ToGroup => |v| parse(v).map(TypedEvent::ToGroup),
    }
}

/// Resolves the tag of a raw event without decoding the rest of it.
pub fn method_of(raw: &RawEvent) -> CatalogResult<Method> {
    match raw.get("method") {
        Some(Value::String(name)) => name.parse().map_err(|_| CatalogError::UnknownMethod {
            method: Some(name.clone()),
        }),
        Some(other) => Err(CatalogError::UnknownMethod {
            method: Some(other.to_string()),
        }),
        None => Err(CatalogError::UnknownMethod { method: None }),
    }
}

pub fn decode(raw: RawEvent) -> CatalogResult<TypedEvent> {
    let method = method_of(&raw)?;
    trace!("Decoding {} event", method);
    decoder(method)(Value::Object(raw))
        .map_err(|source| CatalogError::MalformedEvent { method, source })
}

/// Like [`decode`], for payloads that have not been checked to be objects.
pub fn decode_value(value: Value) -> CatalogResult<TypedEvent> {
    match value {
        Value::Object(raw) => decode(raw),
        other => Err(CatalogError::MalformedPayload {
            kind: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
