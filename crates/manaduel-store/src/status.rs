//! Session phase state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle phase of a session.
///
/// Transitions move strictly forward, one phase at a time:
///
/// ```text
/// Lobby → Draft → Battle → Finished
/// ```
///
/// The one exception is abandonment: a session can be closed out from
/// any phase, so `Finished` is always reachable directly.
///
/// - **Lobby**: session created on mutual invite accept; players are
///   gathering and signalling readiness.
/// - **Draft**: alternating picks are building both decks.
/// - **Battle**: the turn/combat loop is running.
/// - **Finished**: terminal. The session is evicted from live memory;
///   only the durable record remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Lobby,
    Draft,
    Battle,
    Finished,
}

impl SessionStatus {
    /// The next phase in the fixed order, or `None` from `Finished`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Lobby => Some(Self::Draft),
            Self::Draft => Some(Self::Battle),
            Self::Battle => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if advancing to `target` is a valid transition:
    /// the next phase in order, or `Finished` from any live phase.
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
            || (target == Self::Finished && !self.is_finished())
    }

    /// Returns `true` once the session has ended.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Draft => write!(f, "draft"),
            Self::Battle => write!(f, "battle"),
            Self::Finished => write!(f, "finished"),
        }
    }
}
