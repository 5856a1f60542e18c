//! Cross-cutting concerns: configuration, logging bootstrap.

pub mod config;
pub mod logging;
