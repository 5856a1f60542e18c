//! Infrastructure adapters. Implement outbound ports.
//!
//! Concrete backend sessions live in the embedding application; this crate
//! ships the in-memory pair used for development and tests.

pub mod memory;
