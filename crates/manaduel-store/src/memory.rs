//! In-memory reference implementation of [`SessionStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use manaduel_protocol::{PlayerId, SessionId};

use crate::{DraftPickRecord, SessionStatus, SessionStore, StoreError};

struct SessionRecord {
    #[allow(dead_code)]
    players: (PlayerId, PlayerId),
    status: SessionStatus,
    picks: Vec<DraftPickRecord>,
}

struct Inner {
    next_id: u64,
    sessions: HashMap<SessionId, SessionRecord>,
}

/// A [`SessionStore`] backed by a process-local map.
///
/// This is the store the single-process server runs on, and the one
/// tests use. A relational backend would implement the same trait
/// against its tables without the core noticing.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                sessions: HashMap::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn create_session(
        &self,
        player1: PlayerId,
        player2: PlayerId,
    ) -> Result<SessionId, StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let session_id = SessionId(inner.next_id);
        inner.next_id += 1;
        inner.sessions.insert(
            session_id,
            SessionRecord {
                players: (player1, player2),
                status: SessionStatus::Lobby,
                picks: Vec::new(),
            },
        );
        tracing::debug!(%session_id, %player1, %player2, "session record created");
        Ok(session_id)
    }

    fn status(&self, session_id: SessionId) -> Result<SessionStatus, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .sessions
            .get(&session_id)
            .map(|record| record.status)
            .ok_or(StoreError::NotFound(session_id))
    }

    fn set_status(
        &self,
        session_id: SessionId,
        status: SessionStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let record = inner
            .sessions
            .get_mut(&session_id)
            .ok_or(StoreError::NotFound(session_id))?;

        if !record.status.can_advance_to(status) {
            return Err(StoreError::InvalidTransition {
                session_id,
                from: record.status,
                to: status,
            });
        }

        record.status = status;
        tracing::debug!(%session_id, %status, "session status advanced");
        Ok(())
    }

    fn append_pick(
        &self,
        session_id: SessionId,
        pick: DraftPickRecord,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let record = inner
            .sessions
            .get_mut(&session_id)
            .ok_or(StoreError::NotFound(session_id))?;
        record.picks.push(pick);
        Ok(())
    }

    fn picks(&self, session_id: SessionId) -> Result<Vec<DraftPickRecord>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        inner
            .sessions
            .get(&session_id)
            .map(|record| record.picks.clone())
            .ok_or(StoreError::NotFound(session_id))
    }
}
