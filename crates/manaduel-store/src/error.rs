//! Error types for the store layer.

use manaduel_protocol::SessionId;

use crate::SessionStatus;

/// Errors that can occur in the durable session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No session record exists for the given id.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The requested status change is not a valid forward transition.
    #[error("invalid status transition for session {session_id}: {from} -> {to}")]
    InvalidTransition {
        session_id: SessionId,
        from: SessionStatus,
        to: SessionStatus,
    },

    /// The backing store failed. Phase transitions guarded by a write
    /// must not proceed when this is returned.
    #[error("store backend failure: {0}")]
    Backend(String),
}
