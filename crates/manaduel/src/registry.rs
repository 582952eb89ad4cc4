//! Session registry: tracks live session actors by id.

use std::collections::HashMap;

use manaduel_protocol::SessionId;
use tracing::debug;

use crate::session::SessionHandle;

/// Handles to every running session actor.
///
/// A session whose actor has stopped (game over, abandoned, or store
/// failure) keeps its entry until the next [`sweep`](Self::sweep);
/// lookups filter closed handles so callers never route into a dead
/// actor.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, SessionHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: SessionHandle) {
        debug!(session_id = %handle.session_id(), "session registered");
        self.sessions.insert(handle.session_id(), handle);
    }

    /// Returns a handle to a live session, if any.
    pub fn get(&self, session_id: SessionId) -> Option<SessionHandle> {
        self.sessions
            .get(&session_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Drops entries whose actors have stopped.
    pub fn sweep(&mut self) {
        self.sessions.retain(|_, handle| !handle.is_closed());
    }

    /// Number of registered sessions, live or not.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
