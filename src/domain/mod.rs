//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    AppKind, AttachmentMeta, Contact, MessageKind, MessageQuery, OutboundContent, RawPayload,
    Room, SendTarget,
};
pub use errors::MessageError;
