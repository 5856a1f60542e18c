//! Reply/forward dispatch: compute the target, hand off to the transport.
//!
//! Addressing rule: a room message is answered into its room (with the
//! room-scoped mention list); a direct message is answered to its sender.

use tracing::{debug, info};

use crate::domain::{Contact, MessageError, OutboundContent, SendTarget};
use crate::usecases::hydrator::Hydrated;
use crate::usecases::Services;

pub(crate) async fn reply(
    services: &Services,
    source: &Hydrated,
    content: OutboundContent,
    mentions: &[Contact],
) -> Result<(), MessageError> {
    let target = match &source.room {
        Some(room) => SendTarget::Room(room.clone()),
        None => SendTarget::Contact(source.sender.clone()),
    };
    // Mentions only carry meaning inside a room.
    let mentions = if target.is_room() {
        mentions
    } else {
        if !mentions.is_empty() {
            debug!(message_id = %source.raw.id, "mentions ignored for direct reply");
        }
        &[]
    };

    services.transport.send(&target, content, mentions).await?;
    info!(
        message_id = %source.raw.id,
        target = target.id(),
        room = target.is_room(),
        "reply sent"
    );
    Ok(())
}

pub(crate) async fn forward(
    services: &Services,
    source_id: &str,
    target: &SendTarget,
    content: OutboundContent,
) -> Result<(), MessageError> {
    services.transport.send(target, content, &[]).await?;
    info!(message_id = source_id, target = target.id(), "message forwarded");
    Ok(())
}
