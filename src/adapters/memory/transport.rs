//! In-memory transport. Records outbound traffic and counts fetches so
//! callers can assert routing and single-flight behavior. Simulated latency
//! and unreachability are configurable.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{
    Contact, MessageError, MessageQuery, OutboundContent, RawPayload, SendTarget,
};
use crate::ports::{AttachmentStream, TransportPort};

/// One recorded outbound send.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub target: SendTarget,
    pub content: OutboundContent,
    pub mentions: Vec<Contact>,
}

pub struct InMemoryTransport {
    self_id: String,
    payloads: Mutex<HashMap<String, RawPayload>>,
    attachments: Mutex<HashMap<String, Vec<u8>>>,
    sent: Mutex<Vec<SentRecord>>,
    fetch_count: AtomicUsize,
    fetch_delay_ms: AtomicU64,
    unreachable: AtomicBool,
}

impl InMemoryTransport {
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            payloads: Mutex::new(HashMap::new()),
            attachments: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            fetch_count: AtomicUsize::new(0),
            fetch_delay_ms: AtomicU64::new(0),
            unreachable: AtomicBool::new(false),
        }
    }

    /// Register a payload under its own id.
    pub fn insert_payload(&self, payload: RawPayload) {
        let key = payload.id.clone();
        self.insert_payload_under(&key, payload);
    }

    /// Register a payload under an arbitrary fetch key (lets callers stage a
    /// backend answering with a mismatched id).
    pub fn insert_payload_under(&self, key: &str, payload: RawPayload) {
        self.payloads
            .lock()
            .expect("lock poisoned")
            .insert(key.to_string(), payload);
    }

    pub fn insert_attachment(&self, message_id: &str, bytes: Vec<u8>) {
        self.attachments
            .lock()
            .expect("lock poisoned")
            .insert(message_id.to_string(), bytes);
    }

    /// Sleep this long inside each `fetch_payload` (simulated latency).
    pub fn set_fetch_delay_ms(&self, ms: u64) {
        self.fetch_delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Make every network operation fail until reset.
    pub fn set_unreachable(&self, down: bool) {
        self.unreachable.store(down, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    fn check_reachable(&self, what: &str) -> Result<(), MessageError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(MessageError::Unreachable(format!(
                "{what}: transport configured unreachable"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransportPort for InMemoryTransport {
    fn self_id(&self) -> String {
        self.self_id.clone()
    }

    async fn fetch_payload(&self, id: &str) -> Result<RawPayload, MessageError> {
        self.check_reachable("fetch_payload")?;
        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .expect("lock poisoned")
            .get(id)
            .cloned()
            // Not-found is a hydration failure, not a backend outage.
            .ok_or_else(|| MessageError::Hydration(format!("no payload staged for id {id}")))
    }

    async fn open_attachment_stream(&self, id: &str) -> Result<AttachmentStream, MessageError> {
        self.check_reachable("open_attachment_stream")?;
        let bytes = self
            .attachments
            .lock()
            .expect("lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| {
                MessageError::Unreachable(format!("no attachment staged for id {id}"))
            })?;
        // Fresh cursor per call: streams are single-pass and independent.
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }

    async fn send(
        &self,
        target: &SendTarget,
        content: OutboundContent,
        mentions: &[Contact],
    ) -> Result<(), MessageError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(MessageError::Send("transport configured unreachable".into()));
        }
        self.sent.lock().expect("lock poisoned").push(SentRecord {
            target: target.clone(),
            content,
            mentions: mentions.to_vec(),
        });
        Ok(())
    }

    async fn search_payloads(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<RawPayload>, MessageError> {
        self.check_reachable("search_payloads")?;
        let payloads = self.payloads.lock().expect("lock poisoned");
        let mut hits: Vec<RawPayload> = payloads
            .values()
            .filter(|p| {
                query.id.as_deref().is_none_or(|id| p.id == id)
                    && query
                        .kind
                        .is_none_or(|k| p.kind == k)
                    && query.text_contains.as_deref().is_none_or(|needle| {
                        p.text.as_deref().is_some_and(|t| t.contains(needle))
                    })
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_payload_is_not_found_not_outage() {
        let tx = InMemoryTransport::new("me");
        assert!(matches!(
            tx.fetch_payload("nope").await,
            Err(MessageError::Hydration(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_is_reported_as_outage() {
        let tx = InMemoryTransport::new("me");
        tx.set_unreachable(true);
        assert!(matches!(
            tx.fetch_payload("nope").await,
            Err(MessageError::Unreachable(_))
        ));
        assert!(matches!(
            tx.open_attachment_stream("nope").await,
            Err(MessageError::Unreachable(_))
        ));
    }
}
