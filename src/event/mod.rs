//! # Events
//!
//! Webhook events arrive as untyped JSON objects. Each one carries a `method`
//! key naming its kind; the catalog turns the payload into a [`TypedEvent`]
//! whose shape is fixed per kind.
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌────────────┐
//! │ RawEvent │────▶│  decode   │────▶│ TypedEvent │
//! └──────────┘     └─────┬─────┘     └────────────┘
//!                        │
//!                   ┌────▼────┐
//!                   │ Method  │
//!                   └─────────┘
//! ```
//!
//! ## Decoding an Event
//!
//! ```rust
//! # use iris_dispatch::event::{decode_value, Method};
//! let event = decode_value(serde_json::json!({
//!     "method": "bindChat",
//!     "user_id": 1,
//!     "object": { "chat": "abcd" },
//! }))
//! .unwrap();
//!
//! assert_eq!(event.method(), Method::BindChat);
//! assert_eq!(event.chat(), Some("abcd"));
//! ```

pub mod catalog;
pub mod method;
pub mod objects;

pub use catalog::{decode, decode_value, method_of, CatalogError, CatalogResult, RawEvent, TypedEvent};
pub use method::Method;
