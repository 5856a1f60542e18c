//! In-memory directory. Backs dev wiring and the test suite.

use std::collections::HashMap;

use crate::domain::{Contact, MessageError, Room};
use crate::ports::DirectoryPort;

/// Directory over plain hash maps. Populate before wiring into services.
#[derive(Default)]
pub struct InMemoryDirectory {
    contacts: HashMap<String, Contact>,
    rooms: HashMap<String, Room>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.insert(contact.id.clone(), contact);
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.id.clone(), room);
    }
}

#[async_trait::async_trait]
impl DirectoryPort for InMemoryDirectory {
    async fn find_contact(&self, id: &str) -> Result<Option<Contact>, MessageError> {
        Ok(self.contacts.get(id).cloned())
    }

    async fn find_room(&self, id: &str) -> Result<Option<Room>, MessageError> {
        Ok(self.rooms.get(id).cloned())
    }
}
