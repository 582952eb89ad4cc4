//! Game logic for Manaduel: the draft protocol, the battle state
//! machine, and the combat-resolution algorithm.
//!
//! Everything in this crate is pure, synchronous state manipulation —
//! no IO, no timers, no channels. The server layer owns a
//! [`DraftEngine`] or [`BattleSession`] per session, feeds player
//! actions in, and maps the returned outcomes onto store writes,
//! broadcasts, and turn-clock operations.
//!
//! Invalid actions (wrong turn, unaffordable card, card not in hand)
//! are not errors: they come back as `Rejected` outcomes and cause no
//! state change, matching the silent-ignore policy for protocol and
//! resource violations.

mod battle;
mod combat;
mod draft;

pub use battle::{
    BattleSession, PlayOutcome, PlayerBattleState, RoundOutcome, RoundRefill,
    RoundReport, TurnOutcome, CRYSTALS_PER_ROUND, HAND_SIZE, STARTING_CRYSTALS,
    STARTING_HP,
};
pub use combat::{resolve_combat, CombatOutcome};
pub use draft::{
    DraftEngine, DraftPick, PickOutcome, ReadyOutcome, PICKS_PER_PLAYER,
    POOL_SIZE,
};
