//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    Contact, MessageError, MessageQuery, OutboundContent, RawPayload, Room, SendTarget,
};

/// Single-pass stream over attachment bytes. Non-restartable: a consumer that
/// needs the bytes again must open a fresh stream.
pub type AttachmentStream = Box<dyn tokio::io::AsyncRead + Send + Unpin>;

/// Directory lookup. Maps contact/room ids to resolved records.
///
/// `Ok(None)` means the directory has no such record (a dangling reference
/// from the caller's point of view); `Err` means the lookup itself failed.
#[async_trait::async_trait]
pub trait DirectoryPort: Send + Sync {
    async fn find_contact(&self, id: &str) -> Result<Option<Contact>, MessageError>;

    async fn find_room(&self, id: &str) -> Result<Option<Room>, MessageError>;
}

/// Chat backend session. Fetch payloads, open attachment streams, deliver
/// outbound sends.
#[async_trait::async_trait]
pub trait TransportPort: Send + Sync {
    /// Contact id of the account this session is logged in as.
    fn self_id(&self) -> String;

    /// Fetch the full raw payload for a message id.
    async fn fetch_payload(&self, id: &str) -> Result<RawPayload, MessageError>;

    /// Open a fresh byte stream over the attachment of the given message.
    /// Each call re-opens from the backend; the core never caches bytes.
    async fn open_attachment_stream(&self, id: &str) -> Result<AttachmentStream, MessageError>;

    /// Deliver content to a contact or room. `mentions` annotates room sends
    /// with an "@mention" list; adapters ignore it for direct targets.
    async fn send(
        &self,
        target: &SendTarget,
        content: OutboundContent,
        mentions: &[Contact],
    ) -> Result<(), MessageError>;

    /// Backend-side message search for the batch lookup helpers.
    async fn search_payloads(&self, query: &MessageQuery)
        -> Result<Vec<RawPayload>, MessageError>;
}
