//! In-memory adapters: dev wiring and test doubles for the outbound ports.

pub mod directory;
pub mod transport;

pub use directory::InMemoryDirectory;
pub use transport::{InMemoryTransport, SentRecord};
