//! Hydration protocol: raw payload -> fully resolved message snapshot.
//!
//! - Fetches the payload by id (unless the entity was seeded with one)
//! - Resolves sender (fatal on miss), recipient/room (miss downgrades to null)
//! - Runs the mention resolver and lifts attachment metadata

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{
    AttachmentMeta, Contact, MessageError, MessageKind, RawPayload, Room,
};
use crate::usecases::message::Seed;
use crate::usecases::{mentions, Services};

/// The resolved, immutable snapshot of one message. Built in a single pass
/// here; accessors on the entity only ever read it.
#[derive(Debug)]
pub(crate) struct Hydrated {
    pub raw: RawPayload,
    pub kind: MessageKind,
    pub sub_kind: Option<MessageKind>,
    pub sender: Contact,
    pub recipient: Option<Contact>,
    pub room: Option<Room>,
    pub text: String,
    pub attachment: Option<AttachmentMeta>,
    pub mentions: Vec<Contact>,
    pub is_self: bool,
    pub timestamp: DateTime<Utc>,
}

pub(crate) async fn hydrate(
    services: &Services,
    id: &str,
    seed: &Seed,
) -> Result<Hydrated, MessageError> {
    let raw = match seed {
        Seed::Payload(p) => p.clone(),
        Seed::Id => services
            .transport
            .fetch_payload(id)
            .await
            .map_err(|e| MessageError::Hydration(e.to_string()))?,
    };

    if raw.id != id {
        return Err(MessageError::Hydration(format!(
            "payload id {} does not match requested id {}",
            raw.id, id
        )));
    }

    let from_id = raw
        .from_id
        .as_deref()
        .ok_or_else(|| MessageError::Hydration(format!("payload {id} has no sender id")))?;
    let sender = services
        .directory
        .find_contact(from_id)
        .await?
        .ok_or_else(|| MessageError::DanglingReference {
            field: "sender",
            id: from_id.to_string(),
        })?;

    // A message is either direct or a room message, decided by the payload.
    match (&raw.to_id, &raw.room_id) {
        (None, None) => {
            return Err(MessageError::Hydration(format!(
                "payload {id} names neither a peer nor a room"
            )))
        }
        (Some(_), Some(_)) => {
            return Err(MessageError::Hydration(format!(
                "payload {id} names both a peer and a room"
            )))
        }
        _ => {}
    }

    let room = match &raw.room_id {
        Some(rid) => match services.directory.find_room(rid).await? {
            Some(r) => Some(r),
            None => {
                warn!(message_id = id, room_id = %rid, "room not in directory, field downgraded to null");
                None
            }
        },
        None => None,
    };
    let recipient = match &raw.to_id {
        Some(cid) => match services.directory.find_contact(cid).await? {
            Some(c) => Some(c),
            None => {
                warn!(message_id = id, contact_id = %cid, "recipient not in directory, field downgraded to null");
                None
            }
        },
        None => None,
    };

    if raw.kind == MessageKind::Media && raw.attachment.is_none() {
        return Err(MessageError::Hydration(format!(
            "media payload {id} carries no attachment metadata"
        )));
    }

    let mentions = mentions::resolve(services, &raw, room.as_ref()).await?;
    let is_self = sender.id == services.transport.self_id();
    let timestamp = match DateTime::from_timestamp(raw.timestamp, 0) {
        Some(ts) => ts,
        None => {
            warn!(
                message_id = id,
                timestamp = raw.timestamp,
                "out-of-range wire timestamp, field downgraded to epoch"
            );
            DateTime::default()
        }
    };

    Ok(Hydrated {
        kind: raw.kind,
        sub_kind: raw.sub_kind,
        sender,
        recipient,
        room,
        text: raw.text.clone().unwrap_or_default(),
        attachment: raw.attachment.clone(),
        mentions,
        is_self,
        timestamp,
        raw,
    })
}
