//! The `SessionStore` trait — the only persistence the core requires.

use manaduel_protocol::{CardId, PlayerId, SessionId};

use crate::{SessionStatus, StoreError};

/// One persisted draft pick.
///
/// `sequence` is the per-player pick number (1-based), matching the
/// order the player made their picks. Global pick order is the order
/// records are returned by [`SessionStore::picks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftPickRecord {
    pub player: PlayerId,
    pub card: CardId,
    pub sequence: u32,
}

/// Durable persistence for session status and draft picks.
///
/// Implementations use interior mutability so a single store instance
/// can be shared behind an `Arc` by all session actors. Calls are
/// synchronous from the actor's point of view: a phase transition is
/// only observable after its store write has returned `Ok`.
pub trait SessionStore: Send + Sync {
    /// Creates a session record in [`SessionStatus::Lobby`] and
    /// returns its store-assigned id.
    fn create_session(
        &self,
        player1: PlayerId,
        player2: PlayerId,
    ) -> Result<SessionId, StoreError>;

    /// Reads the current status of a session.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if the session does not exist.
    fn status(&self, session_id: SessionId) -> Result<SessionStatus, StoreError>;

    /// Advances a session's status.
    ///
    /// # Errors
    /// [`StoreError::InvalidTransition`] unless `status` is the next
    /// phase in the fixed forward order.
    fn set_status(
        &self,
        session_id: SessionId,
        status: SessionStatus,
    ) -> Result<(), StoreError>;

    /// Appends one draft pick in global pick order.
    fn append_pick(
        &self,
        session_id: SessionId,
        pick: DraftPickRecord,
    ) -> Result<(), StoreError>;

    /// Returns all recorded picks in global pick order.
    fn picks(&self, session_id: SessionId) -> Result<Vec<DraftPickRecord>, StoreError>;
}
