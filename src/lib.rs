//! chat-core: polymorphic chat message abstraction with lazy hydration,
//! mention resolution, and reply/forward dispatch. Hexagonal Architecture:
//! the backend session and directory sit behind outbound ports.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;

pub use usecases::{Message, Services};
