//! Batch lookup helpers. Thin wrappers over the transport's search; no
//! paging or ranking.

use crate::domain::{MessageError, MessageQuery};
use crate::usecases::{Message, Services};

/// First match for the query, if any.
pub async fn find(
    services: &Services,
    query: &MessageQuery,
) -> Result<Option<Message>, MessageError> {
    Ok(find_all(services, query).await?.into_iter().next())
}

/// All matches for the query as RAW entities, capped at the configured
/// search limit. Callers hydrate the ones they need.
pub async fn find_all(
    services: &Services,
    query: &MessageQuery,
) -> Result<Vec<Message>, MessageError> {
    let payloads = services.transport.search_payloads(query).await?;
    Ok(payloads
        .into_iter()
        .take(services.search_limit)
        .map(|p| Message::from_payload(services.clone(), p))
        .collect())
}
