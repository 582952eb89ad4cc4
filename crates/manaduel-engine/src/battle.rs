//! The battle phase: alternating turns, simultaneous reveal, rounds.
//!
//! A round is one turn per player. The first mover plays cards
//! face-down and ends their turn; the other player does the same; the
//! second end-turn triggers the reveal and combat resolution. Hp is
//! clamped at zero and the round either ends the game or refills both
//! players for the next one.
//!
//! Turn deadlines live outside this type: when a player's clock
//! expires, the server calls [`BattleSession::end_turn`] on their
//! behalf, which is indistinguishable from a manual end-turn.

use std::collections::VecDeque;

use manaduel_protocol::{
    CardId, CatalogCard, FieldCard, PlayerBoard, PlayerId, FIELD_SLOTS,
};
use tracing::debug;

use crate::combat::resolve_combat;

pub const STARTING_HP: i32 = 20;
pub const STARTING_CRYSTALS: u32 = 8;
pub const CRYSTALS_PER_ROUND: u32 = 5;
pub const HAND_SIZE: usize = 5;

/// Result of a play-card attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Not your turn, card not in hand, can't afford it, or no slot.
    Rejected,
    /// Card placed face-down; `crystals` is the player's new balance.
    Placed {
        slot: usize,
        card: FieldCard,
        crystals: u32,
    },
}

/// Result of an end-turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Not your turn, or the battle is over.
    Rejected,
    /// First end-turn of the round; play passes to the other player.
    NextTurn(PlayerId),
    /// Second end-turn: the round resolved.
    RoundResolved(RoundReport),
}

/// Everything the server needs to broadcast one resolved round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    /// Both boards face-up, before any damage.
    pub reveal: [PlayerBoard; 2],
    /// Both boards after combat: updated hp, surviving cards.
    pub result: [PlayerBoard; 2],
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    /// `None` winner is a draw.
    GameOver { winner: Option<PlayerId> },
    NextRound {
        round: u32,
        first_mover: PlayerId,
        refills: [RoundRefill; 2],
    },
}

/// One player's private refill for a new round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRefill {
    pub player: PlayerId,
    pub hand: Vec<CatalogCard>,
    pub crystals: u32,
    pub deck_size: usize,
}

/// One player's side of the battle.
#[derive(Debug, Clone)]
pub struct PlayerBattleState {
    id: PlayerId,
    hp: i32,
    crystals: u32,
    hand: Vec<CatalogCard>,
    deck: VecDeque<CatalogCard>,
    field: [Option<FieldCard>; FIELD_SLOTS],
}

impl PlayerBattleState {
    fn new(id: PlayerId, deck: Vec<CatalogCard>) -> Self {
        let mut deck: VecDeque<CatalogCard> = deck.into();
        let mut hand = Vec::with_capacity(HAND_SIZE);
        while hand.len() < HAND_SIZE {
            match deck.pop_front() {
                Some(card) => hand.push(card),
                None => break,
            }
        }
        Self {
            id,
            hp: STARTING_HP,
            crystals: STARTING_CRYSTALS,
            hand,
            deck,
            field: Default::default(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn crystals(&self) -> u32 {
        self.crystals
    }

    pub fn hand(&self) -> &[CatalogCard] {
        &self.hand
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    pub fn field(&self) -> &[Option<FieldCard>; FIELD_SLOTS] {
        &self.field
    }

    fn board(&self) -> PlayerBoard {
        PlayerBoard {
            player: self.id,
            hp: self.hp,
            field: self.field.clone(),
        }
    }

    /// Draws from the deck front until the hand holds five cards or
    /// the deck runs out.
    fn refill(&mut self) {
        while self.hand.len() < HAND_SIZE {
            match self.deck.pop_front() {
                Some(card) => self.hand.push(card),
                None => break,
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.hand.is_empty() && self.deck.is_empty()
    }

    fn refill_view(&self) -> RoundRefill {
        RoundRefill {
            player: self.id,
            hand: self.hand.clone(),
            crystals: self.crystals,
            deck_size: self.deck.len(),
        }
    }
}

/// Battle state for one session.
pub struct BattleSession {
    players: [PlayerBattleState; 2],
    /// First mover of round 1; round parity anchors to this.
    first_player: PlayerId,
    current_turn: PlayerId,
    round: u32,
    ended: [bool; 2],
    finished: bool,
}

impl BattleSession {
    /// Starts a battle from the drafted decks. `first_player` moves
    /// first in round 1 (and every odd round after).
    pub fn new(
        decks: [(PlayerId, Vec<CatalogCard>); 2],
        first_player: PlayerId,
    ) -> Self {
        let [(id_a, deck_a), (id_b, deck_b)] = decks;
        let first = if first_player == id_a || first_player == id_b {
            first_player
        } else {
            id_a
        };
        Self {
            players: [
                PlayerBattleState::new(id_a, deck_a),
                PlayerBattleState::new(id_b, deck_b),
            ],
            first_player: first,
            current_turn: first,
            round: 1,
            ended: [false; 2],
            finished: false,
        }
    }

    pub fn players(&self) -> [PlayerId; 2] {
        [self.players[0].id, self.players[1].id]
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn state_of(&self, player: PlayerId) -> Option<&PlayerBattleState> {
        self.players.iter().find(|p| p.id == player)
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<&PlayerBattleState> {
        match self.index_of(player)? {
            0 => Some(&self.players[1]),
            _ => Some(&self.players[0]),
        }
    }

    fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    /// Plays a card from hand onto the lowest empty field slot.
    pub fn play_card(&mut self, player: PlayerId, card: CardId) -> PlayOutcome {
        if self.finished || player != self.current_turn {
            return PlayOutcome::Rejected;
        }
        let Some(idx) = self.index_of(player) else {
            return PlayOutcome::Rejected;
        };
        let state = &mut self.players[idx];
        let Some(hand_idx) = state.hand.iter().position(|c| c.id == card) else {
            debug!(%player, %card, "play rejected: card not in hand");
            return PlayOutcome::Rejected;
        };
        let cost = state.hand[hand_idx].cost;
        if cost > state.crystals {
            debug!(%player, %card, cost, crystals = state.crystals,
                "play rejected: not enough crystals");
            return PlayOutcome::Rejected;
        }
        let Some(slot) = state.field.iter().position(Option::is_none) else {
            return PlayOutcome::Rejected;
        };

        let played = state.hand.remove(hand_idx);
        state.crystals -= cost;
        let field_card = FieldCard {
            id: played.id,
            attack: played.attack,
            defense: played.defense,
        };
        state.field[slot] = Some(field_card.clone());
        debug!(%player, %card, slot, crystals = state.crystals, "card placed");
        PlayOutcome::Placed {
            slot,
            card: field_card,
            crystals: state.crystals,
        }
    }

    /// Ends the current player's turn. The second end-turn of a round
    /// resolves combat and returns the full round report.
    pub fn end_turn(&mut self, player: PlayerId) -> TurnOutcome {
        if self.finished || player != self.current_turn {
            return TurnOutcome::Rejected;
        }
        let Some(idx) = self.index_of(player) else {
            return TurnOutcome::Rejected;
        };
        self.ended[idx] = true;
        let other = 1 - idx;
        if !self.ended[other] {
            self.current_turn = self.players[other].id;
            debug!(round = self.round, next = %self.current_turn, "turn passed");
            TurnOutcome::NextTurn(self.current_turn)
        } else {
            TurnOutcome::RoundResolved(self.resolve_round())
        }
    }

    fn resolve_round(&mut self) -> RoundReport {
        let reveal = [self.players[0].board(), self.players[1].board()];

        let combat =
            resolve_combat(&self.players[0].field, &self.players[1].field);
        self.players[0].hp = (self.players[0].hp - combat.damage_to_a).max(0);
        self.players[1].hp = (self.players[1].hp - combat.damage_to_b).max(0);

        let result = [
            PlayerBoard {
                player: self.players[0].id,
                hp: self.players[0].hp,
                field: combat.survivors_a,
            },
            PlayerBoard {
                player: self.players[1].id,
                hp: self.players[1].hp,
                field: combat.survivors_b,
            },
        ];

        // Fields do not persist across rounds.
        for player in &mut self.players {
            player.field = Default::default();
        }
        self.ended = [false; 2];

        if self.players.iter().any(|p| p.hp <= 0) {
            self.finished = true;
            let winner = self.winner_by_hp();
            debug!(round = self.round, ?winner, "battle over: hp depleted");
            return RoundReport {
                reveal,
                result,
                outcome: RoundOutcome::GameOver { winner },
            };
        }

        self.round += 1;
        for player in &mut self.players {
            player.crystals += CRYSTALS_PER_ROUND;
            player.refill();
        }

        if self.players.iter().all(PlayerBattleState::is_exhausted) {
            self.finished = true;
            let winner = self.winner_by_hp();
            debug!(round = self.round, ?winner, "battle over: decks exhausted");
            return RoundReport {
                reveal,
                result,
                outcome: RoundOutcome::GameOver { winner },
            };
        }

        // Odd rounds open with the original first player.
        let first_mover = if self.round % 2 == 1 {
            self.first_player
        } else {
            match self.opponent_of(self.first_player) {
                Some(opponent) => opponent.id,
                None => self.first_player,
            }
        };
        self.current_turn = first_mover;
        debug!(round = self.round, %first_mover, "new round");

        RoundReport {
            reveal,
            result,
            outcome: RoundOutcome::NextRound {
                round: self.round,
                first_mover,
                refills: [
                    self.players[0].refill_view(),
                    self.players[1].refill_view(),
                ],
            },
        }
    }

    fn winner_by_hp(&self) -> Option<PlayerId> {
        let [a, b] = &self.players;
        match a.hp.cmp(&b.hp) {
            std::cmp::Ordering::Greater => Some(a.id),
            std::cmp::Ordering::Less => Some(b.id),
            std::cmp::Ordering::Equal => None,
        }
    }
}
