//! The alternating-pick draft.
//!
//! Both players ready up, a 30-card pool is drawn from the catalog,
//! and a random first picker is chosen. Picks then strictly alternate
//! until each player holds 15 cards. Out-of-turn picks, unknown cards,
//! and already-taken cards are rejected without changing state.

use manaduel_protocol::{CardCatalog, CardId, CatalogCard, PlayerId};
use rand::Rng;
use tracing::debug;

/// Cards drawn into the shared draft pool.
pub const POOL_SIZE: usize = 30;

/// Picks each player makes before the draft completes.
pub const PICKS_PER_PLAYER: usize = POOL_SIZE / 2;

/// One accepted pick, in global pick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftPick {
    pub player: PlayerId,
    pub card: CardId,
}

/// Result of a ready-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// Not a participant, duplicate ready, or draft already running.
    Ignored,
    /// First of the two; waiting on the opponent.
    Waiting,
    /// Second ready arrived: pool drawn, first picker chosen.
    Started,
}

/// Result of a pick attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Out of turn, unknown card, already taken, or draft not running.
    Rejected,
    /// Pick accepted; `sequence` is this player's 1-based pick count.
    Picked {
        sequence: u32,
        next_player: PlayerId,
    },
    /// Pick accepted and the pool is exhausted.
    Complete { sequence: u32 },
}

struct DraftState {
    pool: Vec<CatalogCard>,
    first_player: PlayerId,
    picks: Vec<DraftPick>,
}

/// Draft phase state for one session.
pub struct DraftEngine {
    players: [PlayerId; 2],
    ready: [bool; 2],
    state: Option<DraftState>,
}

impl DraftEngine {
    pub fn new(players: [PlayerId; 2]) -> Self {
        Self {
            players,
            ready: [false; 2],
            state: None,
        }
    }

    pub fn players(&self) -> [PlayerId; 2] {
        self.players
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        match self.players {
            [a, b] if a == player => Some(b),
            [a, b] if b == player => Some(a),
            _ => None,
        }
    }

    /// Marks `player` ready. The second distinct ready draws the pool
    /// and picks a random first player; later readies are ignored.
    pub fn mark_ready<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        catalog: &CardCatalog,
        rng: &mut R,
    ) -> ReadyOutcome {
        if self.state.is_some() {
            return ReadyOutcome::Ignored;
        }
        let Some(idx) = self.players.iter().position(|p| *p == player) else {
            return ReadyOutcome::Ignored;
        };
        if self.ready[idx] {
            return ReadyOutcome::Ignored;
        }
        self.ready[idx] = true;

        if !self.ready.iter().all(|r| *r) {
            return ReadyOutcome::Waiting;
        }

        let pool = catalog.draw_pool(rng, POOL_SIZE);
        let first_player = self.players[rng.random_range(0..2)];
        debug!(%first_player, pool_size = pool.len(), "draft started");
        self.state = Some(DraftState {
            pool,
            first_player,
            picks: Vec::with_capacity(POOL_SIZE),
        });
        ReadyOutcome::Started
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.picks.len() == POOL_SIZE)
    }

    /// The drawn pool, once the draft has started.
    pub fn pool(&self) -> Option<&[CatalogCard]> {
        self.state.as_ref().map(|s| s.pool.as_slice())
    }

    pub fn first_player(&self) -> Option<PlayerId> {
        self.state.as_ref().map(|s| s.first_player)
    }

    /// Accepted picks in global order. Empty before the draft starts.
    pub fn picks(&self) -> &[DraftPick] {
        self.state.as_ref().map_or(&[], |s| s.picks.as_slice())
    }

    /// Whose pick it is. `None` before start and after completion.
    pub fn expected_player(&self) -> Option<PlayerId> {
        let state = self.state.as_ref()?;
        if state.picks.len() >= POOL_SIZE {
            return None;
        }
        let first = state.first_player;
        if state.picks.len() % 2 == 0 {
            Some(first)
        } else {
            self.opponent_of(first)
        }
    }

    /// Attempts a pick for `player`.
    pub fn pick(&mut self, player: PlayerId, card: CardId) -> PickOutcome {
        if self.expected_player() != Some(player) {
            return PickOutcome::Rejected;
        }
        // expected_player returned Some, so state is populated.
        let Some(state) = self.state.as_mut() else {
            return PickOutcome::Rejected;
        };
        if !state.pool.iter().any(|c| c.id == card) {
            debug!(%player, %card, "pick rejected: card not in pool");
            return PickOutcome::Rejected;
        }
        if state.picks.iter().any(|p| p.card == card) {
            debug!(%player, %card, "pick rejected: card already taken");
            return PickOutcome::Rejected;
        }

        state.picks.push(DraftPick { player, card });
        let sequence =
            state.picks.iter().filter(|p| p.player == player).count() as u32;

        if state.picks.len() == POOL_SIZE {
            debug!(%player, %card, "draft complete");
            PickOutcome::Complete { sequence }
        } else {
            // Parity flipped with the push, so this is the opponent.
            let next_player = match self.expected_player() {
                Some(next) => next,
                None => return PickOutcome::Rejected,
            };
            PickOutcome::Picked {
                sequence,
                next_player,
            }
        }
    }

    /// Picks a uniformly random untaken card for the current player.
    /// Used when their pick timer expires. `None` if no pick is due.
    pub fn auto_pick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<(PlayerId, CardId, PickOutcome)> {
        let player = self.expected_player()?;
        let state = self.state.as_ref()?;
        let remaining: Vec<CardId> = state
            .pool
            .iter()
            .map(|c| c.id)
            .filter(|id| !state.picks.iter().any(|p| p.card == *id))
            .collect();
        let card = *remaining.get(rng.random_range(0..remaining.len()))?;
        debug!(%player, %card, "auto-picking for expired turn");
        Some((player, card, self.pick(player, card)))
    }

    /// The finished decks, one per player in `players()` order, each
    /// holding that player's 15 picks in the order they were made.
    /// `None` until the draft completes.
    pub fn decks(&self) -> Option<[Vec<CatalogCard>; 2]> {
        if !self.is_complete() {
            return None;
        }
        let state = self.state.as_ref()?;
        let deck_for = |player: PlayerId| -> Vec<CatalogCard> {
            state
                .picks
                .iter()
                .filter(|p| p.player == player)
                .filter_map(|p| {
                    state.pool.iter().find(|c| c.id == p.card).cloned()
                })
                .collect()
        };
        Some([deck_for(self.players[0]), deck_for(self.players[1])])
    }
}
