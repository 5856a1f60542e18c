//! The polymorphic message entity. One type over all kinds; behavior
//! dispatches on the hydrated kind, not on subtypes.
//!
//! Lifecycle: constructed RAW from a bare id or a raw payload, `ready()`
//! hydrates it exactly once, accessors read the immutable snapshot.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use crate::domain::{
    AppKind, Contact, MessageError, MessageKind, OutboundContent, RawPayload, Room, SendTarget,
};
use crate::ports::AttachmentStream;
use crate::usecases::hydrator::{self, Hydrated};
use crate::usecases::{dispatcher, Services};

const STATE_RAW: u8 = 0;
const STATE_HYDRATING: u8 = 1;
const STATE_READY: u8 = 2;

/// Where an entity is in its lifecycle. Governs which accessors are safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationState {
    Raw,
    Hydrating,
    Ready,
}

/// What the entity was constructed from.
#[derive(Debug)]
pub(crate) enum Seed {
    /// Bare id; the payload is fetched from the transport on `ready()`.
    Id,
    /// Full payload pushed by the backend; `ready()` still resolves refs.
    Payload(RawPayload),
}

/// Content accepted by `say`: literal text or another hydrated message.
pub enum Reply<'a> {
    Text(String),
    Message(&'a Message),
}

impl From<&str> for Reply<'_> {
    fn from(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

impl From<String> for Reply<'_> {
    fn from(s: String) -> Self {
        Reply::Text(s)
    }
}

impl<'a> From<&'a Message> for Reply<'a> {
    fn from(m: &'a Message) -> Self {
        Reply::Message(m)
    }
}

pub struct Message {
    id: String,
    seed: Seed,
    services: Services,
    state: AtomicU8,
    hydrated: OnceCell<Hydrated>,
}

impl Message {
    /// RAW entity from a bare identifier. `ready()` fetches the payload.
    pub fn from_id(services: Services, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            seed: Seed::Id,
            services,
            state: AtomicU8::new(STATE_RAW),
            hydrated: OnceCell::new(),
        }
    }

    /// RAW entity from a pushed payload. `ready()` skips the fetch but still
    /// resolves sender/recipient/room and mentions.
    pub fn from_payload(services: Services, payload: RawPayload) -> Self {
        Self {
            id: payload.id.clone(),
            seed: Seed::Payload(payload),
            services,
            state: AtomicU8::new(STATE_RAW),
            hydrated: OnceCell::new(),
        }
    }

    /// Always available, even before hydration.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hydration_state(&self) -> HydrationState {
        match self.state.load(Ordering::SeqCst) {
            STATE_READY => HydrationState::Ready,
            STATE_HYDRATING => HydrationState::Hydrating,
            _ => HydrationState::Raw,
        }
    }

    /// Hydrate the entity. Idempotent and single-flight: concurrent callers
    /// converge on one underlying fetch and observe the same final state. A
    /// failed hydration leaves the entity RAW and may be retried.
    pub async fn ready(&self) -> Result<&Self, MessageError> {
        self.hydrated
            .get_or_try_init(|| async {
                self.state.store(STATE_HYDRATING, Ordering::SeqCst);
                let res = hydrator::hydrate(&self.services, &self.id, &self.seed).await;
                if res.is_err() {
                    self.state.store(STATE_RAW, Ordering::SeqCst);
                }
                res
            })
            .await?;
        self.state.store(STATE_READY, Ordering::SeqCst);
        Ok(self)
    }

    fn snapshot(&self, accessor: &'static str) -> Result<&Hydrated, MessageError> {
        self.hydrated.get().ok_or_else(|| MessageError::NotHydrated {
            id: self.id.clone(),
            accessor,
        })
    }

    /// Sender. Never null after hydration.
    pub fn from(&self) -> Result<&Contact, MessageError> {
        Ok(&self.snapshot("from")?.sender)
    }

    /// Direct-message peer. Null for room messages (and in the degraded case
    /// where the directory has dropped the record).
    pub fn to(&self) -> Result<Option<&Contact>, MessageError> {
        Ok(self.snapshot("to")?.recipient.as_ref())
    }

    /// Originating room. Null for direct messages.
    pub fn room(&self) -> Result<Option<&Room>, MessageError> {
        Ok(self.snapshot("room")?.room.as_ref())
    }

    /// Text content. Empty for pure media.
    pub fn text(&self) -> Result<&str, MessageError> {
        Ok(self.snapshot("text")?.text.as_str())
    }

    /// Known before hydration when the entity was seeded with a payload.
    pub fn kind(&self) -> Result<MessageKind, MessageError> {
        if let Some(h) = self.hydrated.get() {
            return Ok(h.kind);
        }
        if let Seed::Payload(p) = &self.seed {
            return Ok(p.kind);
        }
        Err(MessageError::NotHydrated {
            id: self.id.clone(),
            accessor: "kind",
        })
    }

    pub fn sub_kind(&self) -> Result<Option<MessageKind>, MessageError> {
        Ok(self.snapshot("sub_kind")?.sub_kind)
    }

    pub fn app_kind(&self) -> Result<Option<AppKind>, MessageError> {
        Ok(self.snapshot("app_kind")?.raw.app_kind)
    }

    /// Opaque structured payload of an App message.
    pub fn app_payload(&self) -> Result<Option<&serde_json::Value>, MessageError> {
        Ok(self.snapshot("app_payload")?.raw.app_payload.as_ref())
    }

    /// Mentioned contacts in payload order, duplicates preserved.
    pub fn mentions(&self) -> Result<&[Contact], MessageError> {
        Ok(&self.snapshot("mentions")?.mentions)
    }

    /// True when the local account appears in the mention list.
    pub fn mention_self(&self) -> Result<bool, MessageError> {
        let self_id = self.services.transport.self_id();
        Ok(self
            .snapshot("mention_self")?
            .mentions
            .iter()
            .any(|c| c.id == self_id))
    }

    /// True when the sender is the local account.
    pub fn is_self(&self) -> Result<bool, MessageError> {
        Ok(self.snapshot("is_self")?.is_self)
    }

    pub fn filename(&self) -> Result<Option<&str>, MessageError> {
        Ok(self
            .snapshot("filename")?
            .attachment
            .as_ref()
            .and_then(|a| a.filename.as_deref()))
    }

    pub fn extension(&self) -> Result<Option<&str>, MessageError> {
        Ok(self
            .snapshot("extension")?
            .attachment
            .as_ref()
            .map(|a| a.extension.as_str()))
    }

    pub fn mime_type(&self) -> Result<Option<&str>, MessageError> {
        Ok(self
            .snapshot("mime_type")?
            .attachment
            .as_ref()
            .and_then(|a| a.mime_type.as_deref()))
    }

    pub fn date(&self) -> Result<DateTime<Utc>, MessageError> {
        Ok(self.snapshot("date")?.timestamp)
    }

    /// Open a fresh single-pass stream over the attachment bytes. Media only;
    /// each call re-opens from the transport, nothing is cached.
    pub async fn ready_stream(&self) -> Result<AttachmentStream, MessageError> {
        let h = self.snapshot("ready_stream")?;
        if h.kind != MessageKind::Media {
            return Err(MessageError::Unsupported(format!(
                "ready_stream() on a {:?} message",
                h.kind
            )));
        }
        self.services.transport.open_attachment_stream(&self.id).await
    }

    /// Reply to this message. Room messages are answered into the room,
    /// direct messages to the sender.
    pub async fn say<'a>(&self, content: impl Into<Reply<'a>>) -> Result<(), MessageError> {
        self.say_with_mentions(content, &[]).await
    }

    /// Reply with a room-scoped mention list. Mentions are ignored (not an
    /// error) when the reply goes out as a direct message.
    pub async fn say_with_mentions<'a>(
        &self,
        content: impl Into<Reply<'a>>,
        mentions: &[Contact],
    ) -> Result<(), MessageError> {
        let h = self.snapshot("say")?;
        let content = match content.into() {
            Reply::Text(t) => OutboundContent::Text(t),
            Reply::Message(m) => m.outbound_content("say")?,
        };
        dispatcher::reply(&self.services, h, content, mentions).await
    }

    /// Re-send this message's hydrated content to another contact or room.
    /// The original entity is not touched.
    pub async fn forward(&self, target: &SendTarget) -> Result<(), MessageError> {
        let content = self.outbound_content("forward")?;
        dispatcher::forward(&self.services, &self.id, target, content).await
    }

    /// Text kinds go out as text; everything else re-sends the raw payload so
    /// attachment references survive unchanged.
    fn outbound_content(&self, accessor: &'static str) -> Result<OutboundContent, MessageError> {
        let h = self.snapshot(accessor)?;
        Ok(match h.kind {
            MessageKind::Text => OutboundContent::Text(h.text.clone()),
            _ => OutboundContent::Payload(h.raw.clone()),
        })
    }

    /// Retired legacy accessor. Kept as a hard dead end so stale callers
    /// migrate instead of silently reading the wrong field.
    #[deprecated(note = "use text()")]
    pub fn content(&self) -> Result<String, MessageError> {
        Err(MessageError::Unsupported(
            "content() is retired; use text()".to_string(),
        ))
    }

    /// Retired legacy setter. Hydrated messages are immutable.
    #[deprecated(note = "use text(); hydrated messages are immutable")]
    pub fn set_content(&self, _text: &str) -> Result<(), MessageError> {
        Err(MessageError::Unsupported(
            "content(text) is retired; hydrated messages are immutable".to_string(),
        ))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hydrated.get() {
            None => write!(f, "Message#{}[raw]", self.id),
            Some(h) if h.kind == MessageKind::Text => {
                write!(f, "Message#{}[Text] {}", self.id, h.text)
            }
            Some(h) => {
                let file = h
                    .attachment
                    .as_ref()
                    .and_then(|a| a.filename.as_deref())
                    .unwrap_or("<no file>");
                write!(f, "Message#{}[{:?}] {}", self.id, h.kind, file)
            }
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("state", &self.hydration_state())
            .finish()
    }
}
