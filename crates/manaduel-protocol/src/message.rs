//! Named commands and events exchanged between players and the engine.
//!
//! The engine consumes [`ClientCommand`]s and emits [`ServerEvent`]s.
//! Both enums are internally tagged (`{"type": "..."}`), the shape the
//! browser client parses directly.
//!
//! Hidden-information rule: any event targeted at one player may carry
//! that player's full hand and deck, but an opponent's hand and deck
//! only ever appear as counts.

use serde::{Deserialize, Serialize};

use crate::{CardId, CatalogCard, FieldCard, PlayerId, SessionId};

/// Number of field slots per player. The field always has exactly this
/// many positions; empty slots are `None`.
pub const FIELD_SLOTS: usize = 5;

/// One recorded draft pick, as replayed to a resuming client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPickView {
    pub picked_by: PlayerId,
    pub card: CardId,
}

/// One player's public board: hp plus the five field slots.
///
/// Used for both the pre-combat reveal and the post-combat result —
/// hp and fields are public information at those points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBoard {
    pub player: PlayerId,
    pub hp: i32,
    pub field: [Option<FieldCard>; FIELD_SLOTS],
}

/// Commands a player sends to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientCommand {
    /// Invite another player to a match.
    Invite { target: PlayerId },
    /// Accept or decline an invite previously received from `from`.
    InviteResponse { from: PlayerId, accept: bool },
    /// Signal readiness in the lobby; the draft starts on the second
    /// distinct ready signal.
    PlayerReady { session_id: SessionId },
    /// Rejoin a session room during lobby or draft (reconnect path).
    JoinRoom { session_id: SessionId },
    /// Leave a session room.
    LeaveRoom { session_id: SessionId },
    /// Pick a card from the draft pool.
    DraftPick { session_id: SessionId, card: CardId },
    /// Enter (or re-enter) the battle for a drafted session.
    JoinGame { session_id: SessionId },
    /// Play a card from hand onto the field.
    PlayCard { session_id: SessionId, card: CardId },
    /// End the current turn.
    EndTurn { session_id: SessionId },
}

/// Events the engine emits toward players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    // -- Matchmaking --
    /// Someone invited you.
    InviteReceived { from: PlayerId },
    /// The player you invited answered.
    InviteResponse { from: PlayerId, accept: bool },
    /// Your invite could not be delivered: the target is not connected.
    /// Distinct from a decline, which only a connected target can send.
    InviteFailed { target: PlayerId },
    /// A session was created for both players.
    SessionJoined { session_id: SessionId },
    /// The other room member left.
    OpponentLeft { player: PlayerId },

    // -- Session-level failures --
    /// The referenced session does not exist or is no longer joinable.
    InvalidSession,
    /// The referenced session is not in the battle phase.
    InvalidGame,
    /// A durable-store failure blocked a phase transition.
    SessionFailed { message: String },

    // -- Draft --
    /// Both players are ready; the draft begins.
    StartDraft {
        session_id: SessionId,
        card_pool: Vec<CatalogCard>,
        first_player: PlayerId,
    },
    /// A pick was recorded; `next_player` is expected to act.
    DraftUpdate {
        picked_by: PlayerId,
        card: CardId,
        next_player: PlayerId,
    },
    /// Full draft state replay for a reconnecting player.
    ResumeDraft {
        session_id: SessionId,
        card_pool: Vec<CatalogCard>,
        first_player: PlayerId,
        picks: Vec<DraftPickView>,
        next_player: PlayerId,
    },
    /// Both players have 15 picks; the session moves to battle.
    DraftComplete,

    // -- Battle --
    /// Initial battle snapshot, targeted per player.
    GameStart {
        session_id: SessionId,
        round: u32,
        current_turn: PlayerId,
        your_hand: Vec<CatalogCard>,
        your_hp: i32,
        your_crystals: u32,
        your_deck_size: usize,
        opp_hp: i32,
        opp_hand_size: usize,
        opp_deck_size: usize,
    },
    /// It is your turn; act within `time_secs`.
    YourTurn { crystals: u32, time_secs: u64 },
    /// The opponent is acting; their deadline is `time_secs`.
    OpponentTurn { time_secs: u64 },
    /// A card was placed. `card` is `None` in the copy sent to the
    /// opponent (face-down placeholder until the reveal).
    CardPlayed {
        by: PlayerId,
        slot: usize,
        card: Option<FieldCard>,
        crystals: u32,
    },
    /// Both fields face-up at the start of combat resolution.
    RevealCards { boards: Vec<PlayerBoard> },
    /// Post-combat hp and surviving field state.
    BattleResult { boards: Vec<PlayerBoard> },
    /// A new round: your refilled hand and updated resources.
    NewRound {
        round: u32,
        hand: Vec<CatalogCard>,
        crystals: u32,
        deck_size: usize,
    },
    /// Mid-battle resume snapshot, targeted at the reconnecting player.
    ResumeGame {
        session_id: SessionId,
        round: u32,
        current_turn: PlayerId,
        your_hand: Vec<CatalogCard>,
        your_hp: i32,
        your_crystals: u32,
        your_deck_size: usize,
        your_field: [Option<FieldCard>; FIELD_SLOTS],
        opp_hp: i32,
        opp_field: [Option<FieldCard>; FIELD_SLOTS],
        opp_hand_size: usize,
        opp_deck_size: usize,
    },
    /// Terminal result. `None` means a draw.
    GameOver { winner: Option<PlayerId> },
}
