//! Unified error type for the Manaduel server.

use manaduel_protocol::{ProtocolError, SessionId};
use manaduel_store::StoreError;

/// Top-level error that wraps the sub-crate errors.
///
/// Player-visible failures are not errors here: protocol violations
/// are silently ignored and session-level failures travel to clients
/// as events. `ServerError` covers what the embedding process needs to
/// handle — codec failures at the transport seam, store backends, and
/// sessions whose actor is gone.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// An encode/decode error at the protocol boundary.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A durable-store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session actor has stopped and can no longer take commands.
    #[error("session {0} is unavailable")]
    SessionUnavailable(SessionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_error() {
        let err = StoreError::NotFound(SessionId(3));
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Store(_)));
        assert!(server_err.to_string().contains("S-3"));
    }

    #[test]
    fn test_unavailable_display() {
        let err = ServerError::SessionUnavailable(SessionId(9));
        assert_eq!(err.to_string(), "session S-9 is unavailable");
    }
}
