//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessageError {
    /// Accessor requiring the full payload was called before `ready()`.
    #[error("message {id} not hydrated: call ready() before {accessor}()")]
    NotHydrated { id: String, accessor: &'static str },

    /// Payload fetch failed or the returned payload is unusable.
    #[error("hydration failed: {0}")]
    Hydration(String),

    /// A referenced record could not be resolved by the directory. Fatal for
    /// the sender; recipient/room misses are downgraded to null instead.
    #[error("dangling {field} reference: {id}")]
    DanglingReference { field: &'static str, id: String },

    /// Operation not meaningful for this message variant, or intentionally
    /// retired.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The transport could not be reached for a non-hydration operation.
    #[error("transport unreachable: {0}")]
    Unreachable(String),

    /// Reply or forward could not be delivered.
    #[error("send failed: {0}")]
    Send(String),
}
