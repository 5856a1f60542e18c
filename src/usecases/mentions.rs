//! Mention resolver: raw payload -> ordered contact list.
//!
//! Two paths, depending on what the originating client put on the wire:
//! explicit mention ids (exact), or in-band `@Name` markers in the text
//! (best-effort, matched against the room roster).

use tracing::warn;

use crate::domain::{Contact, MessageError, RawPayload, Room};
use crate::shared::config::MentionPolicy;
use crate::usecases::Services;

/// Marker terminator some clients append after an in-band mention
/// (FOUR-PER-EM SPACE). Plain whitespace also ends a marker.
pub(crate) const MENTION_TERMINATOR: char = '\u{2005}';

/// Resolve the mention list for one payload. Order and multiplicity follow
/// the payload; duplicates are intentional and preserved. Unresolvable ids
/// are dropped with a warning, never an error.
pub(crate) async fn resolve(
    services: &Services,
    raw: &RawPayload,
    room: Option<&Room>,
) -> Result<Vec<Contact>, MessageError> {
    if !raw.mention_ids.is_empty() {
        let mut out = Vec::with_capacity(raw.mention_ids.len());
        for mid in &raw.mention_ids {
            match services.directory.find_contact(mid).await? {
                Some(c) => out.push(c),
                None => {
                    warn!(message_id = %raw.id, mention_id = %mid, "dropping unresolvable mention id")
                }
            }
        }
        return Ok(out);
    }

    // Marker path only applies inside a room: display names are matched
    // against the roster, not the whole directory.
    let (Some(text), Some(room)) = (raw.text.as_deref(), room) else {
        return Ok(Vec::new());
    };
    if !text.contains('@') {
        return Ok(Vec::new());
    }

    let mut roster = Vec::with_capacity(room.member_ids.len());
    for mid in &room.member_ids {
        if let Some(c) = services.directory.find_contact(mid).await? {
            roster.push(c);
        }
    }

    let mut out = Vec::new();
    for name in marker_names(text) {
        let candidates: Vec<&Contact> = roster
            .iter()
            .filter(|c| c.name == name || c.alias.as_deref() == Some(name))
            .collect();
        match candidates.len() {
            0 => warn!(message_id = %raw.id, name, "mention marker matches no room member"),
            1 => out.push(candidates[0].clone()),
            n => match services.mention_policy {
                MentionPolicy::All => out.extend(candidates.into_iter().cloned()),
                MentionPolicy::First => out.push(candidates[0].clone()),
                MentionPolicy::None => {
                    warn!(message_id = %raw.id, name, candidates = n, "ambiguous mention dropped")
                }
            },
        }
    }
    Ok(out)
}

/// Extract `@Name` markers in text order. A marker runs from `@` to the next
/// terminator, whitespace, or end of text.
fn marker_names(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find('@') {
        rest = &rest[pos + 1..];
        let end = rest
            .find(|c: char| c == MENTION_TERMINATOR || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..end];
        if !name.is_empty() {
            names.push(name);
        }
        rest = &rest[end..];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDirectory, InMemoryTransport};
    use crate::domain::MessageKind;
    use std::sync::Arc;

    fn contact(id: &str, name: &str) -> Contact {
        Contact {
            id: id.into(),
            name: name.into(),
            alias: None,
        }
    }

    fn services(policy: MentionPolicy) -> Services {
        let mut directory = InMemoryDirectory::new();
        directory.add_contact(contact("c1", "Alice"));
        directory.add_contact(contact("c2", "Bob"));
        directory.add_contact(contact("c3", "Bob")); // same display name as c2
        directory.add_room(Room {
            id: "r1".into(),
            topic: "test room".into(),
            member_ids: vec!["c1".into(), "c2".into(), "c3".into()],
        });
        let mut s = Services::new(
            Arc::new(directory),
            Arc::new(InMemoryTransport::new("me")),
        );
        s.mention_policy = policy;
        s
    }

    fn payload(text: Option<&str>, mention_ids: &[&str]) -> RawPayload {
        RawPayload {
            id: "m1".into(),
            kind: MessageKind::Text,
            sub_kind: None,
            app_kind: None,
            from_id: Some("c1".into()),
            to_id: None,
            room_id: Some("r1".into()),
            text: text.map(String::from),
            mention_ids: mention_ids.iter().map(|s| s.to_string()).collect(),
            attachment: None,
            app_payload: None,
            timestamp: 1704067200,
        }
    }

    fn room() -> Room {
        Room {
            id: "r1".into(),
            topic: "test room".into(),
            member_ids: vec!["c1".into(), "c2".into(), "c3".into()],
        }
    }

    #[tokio::test]
    async fn test_explicit_ids_preserve_order_and_duplicates() {
        let s = services(MentionPolicy::All);
        let p = payload(Some("hey"), &["c1", "c1", "c2"]);
        let got = resolve(&s, &p, Some(&room())).await.unwrap();
        let ids: Vec<&str> = got.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c1", "c2"]);
    }

    #[tokio::test]
    async fn test_unresolvable_id_dropped_not_fatal() {
        let s = services(MentionPolicy::All);
        let p = payload(Some("hey"), &["c1", "ghost", "c2"]);
        let got = resolve(&s, &p, Some(&room())).await.unwrap();
        let ids: Vec<&str> = got.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_marker_path_unique_name() {
        let s = services(MentionPolicy::All);
        let p = payload(Some("ping @Alice\u{2005}are you there"), &[]);
        let got = resolve(&s, &p, Some(&room())).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "c1");
    }

    #[tokio::test]
    async fn test_marker_path_ambiguous_all() {
        let s = services(MentionPolicy::All);
        let p = payload(Some("@Bob hi"), &[]);
        let got = resolve(&s, &p, Some(&room())).await.unwrap();
        let ids: Vec<&str> = got.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c3"]);
    }

    #[tokio::test]
    async fn test_marker_path_ambiguous_first_and_none() {
        let s = services(MentionPolicy::First);
        let p = payload(Some("@Bob hi"), &[]);
        let got = resolve(&s, &p, Some(&room())).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "c2");

        let s = services(MentionPolicy::None);
        let got = resolve(&s, &p, Some(&room())).await.unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn test_no_room_means_no_marker_matching() {
        let s = services(MentionPolicy::All);
        let p = payload(Some("@Alice hi"), &[]);
        let got = resolve(&s, &p, None).await.unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn test_marker_names_extraction() {
        assert_eq!(
            marker_names("@Alice\u{2005}and @Bob too"),
            vec!["Alice", "Bob"]
        );
        assert_eq!(marker_names("no mentions here"), Vec::<&str>::new());
        assert_eq!(marker_names("trailing @"), Vec::<&str>::new());
        assert_eq!(marker_names("@A @A"), vec!["A", "A"]);
    }
}
