//! Domain entities. Pure data structures for the core business.
//!
//! No transport/IO types here — raw payloads are mapped from adapters.

use serde::{Deserialize, Serialize};

/// A contact as resolved by the directory. The directory owns the canonical
/// record; this core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    /// Caller-assigned alias; participates in display-name mention matching.
    #[serde(default)]
    pub alias: Option<String>,
}

/// A room (group conversation) as resolved by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub topic: String,
    /// Contact ids of the current members, in roster order.
    pub member_ids: Vec<String>,
}

/// Message kind. Closed set; dispatch happens on kind at hydration time, not
/// via subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Media,
    App,
    Location,
    Recalled,
    Unknown,
}

/// Discriminator for structured-app payloads (kind == App only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    Link,
    MiniProgram,
    Card,
    Other,
}

/// Attachment metadata carried by media payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub filename: Option<String>,
    pub extension: String,
    pub mime_type: Option<String>,
}

/// The backend's raw representation of one message. Fetched by id from the
/// transport, or handed in whole when the backend pushes full payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Refines `kind` (e.g. a text payload carrying a location sub-payload).
    #[serde(default)]
    pub sub_kind: Option<MessageKind>,
    #[serde(default)]
    pub app_kind: Option<AppKind>,
    #[serde(default)]
    pub from_id: Option<String>,
    /// Direct-message peer. A payload names exactly one of `to_id`/`room_id`.
    #[serde(default)]
    pub to_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Explicit mention ids in payload order, when the backend supplies them.
    /// Empty when the backend only embeds in-band markers in `text`.
    #[serde(default)]
    pub mention_ids: Vec<String>,
    #[serde(default)]
    pub attachment: Option<AttachmentMeta>,
    /// Opaque structured payload for App-kind messages.
    #[serde(default)]
    pub app_payload: Option<serde_json::Value>,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Where an outbound send goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendTarget {
    Contact(Contact),
    Room(Room),
}

impl SendTarget {
    pub fn id(&self) -> &str {
        match self {
            SendTarget::Contact(c) => &c.id,
            SendTarget::Room(r) => &r.id,
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self, SendTarget::Room(_))
    }
}

/// What an outbound send carries: literal text, or a raw payload re-sent
/// unchanged (forwarding media keeps the attachment reference intact).
#[derive(Debug, Clone)]
pub enum OutboundContent {
    Text(String),
    Payload(RawPayload),
}

/// Query for the batch lookup helpers. Fields are AND-ed; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub id: Option<String>,
    pub text_contains: Option<String>,
    pub kind: Option<MessageKind>,
}
