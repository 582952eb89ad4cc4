//! Identity newtypes and message routing primitives.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CardId;

/// A unique identifier for a player.
///
/// Newtype over `u64` so a `PlayerId` can never be confused with a
/// `SessionId` even though both are integers underneath.
/// `#[serde(transparent)]` keeps the JSON representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a session (one match between two players).
///
/// Opaque to callers — the durable store assigns it at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A card in play: an owned value copy of catalog data plus mutable
/// defense that is decremented during combat.
///
/// The catalog card it was copied from is never mutated. Attack and
/// defense are signed because defense goes negative transiently while
/// combat computes overflow damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCard {
    pub id: CardId,
    pub attack: i32,
    pub defense: i32,
}

/// Specifies who should receive an outbound event.
///
/// Engine operations return lists of `(Recipient, ServerEvent)` pairs;
/// the server layer resolves each recipient against the session's two
/// players and the connection directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Everyone in the session room.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Everyone in the room except the given player.
    AllExcept(PlayerId),
}
