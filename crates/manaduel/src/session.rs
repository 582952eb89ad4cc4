//! Session actor: an isolated Tokio task owning one match.
//!
//! Each session runs in its own task and communicates with the outside
//! world through an mpsc channel — no shared mutable game state. The
//! actor owns the draft engine, the battle state, and the turn clock,
//! and is the only writer of this session's store records.
//!
//! Phase transitions are durable-write-first: the store's `set_status`
//! must return `Ok` before the transition is announced to players. A
//! store failure ends the session with a `SessionFailed` broadcast.

use std::sync::Arc;
use std::time::Duration;

use manaduel_clock::TurnClock;
use manaduel_engine::{
    BattleSession, DraftEngine, PickOutcome, PlayOutcome, ReadyOutcome,
    RoundOutcome, RoundReport, TurnOutcome,
};
use manaduel_protocol::{
    CardCatalog, CardId, CatalogCard, DraftPickView, PlayerId, Recipient,
    ServerEvent, SessionId,
};
use manaduel_store::{DraftPickRecord, SessionStatus, SessionStore, StoreError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::directory::ConnectionDirectory;
use crate::ServerError;

/// Command channel depth per session actor.
const CHANNEL_SIZE: usize = 64;

/// Per-session tunables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Deadline for each draft pick and each battle turn.
    pub turn_duration: Duration,
    /// Fixed rng seed; `None` seeds from the OS. Tests pin this.
    pub rng_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            turn_duration: Duration::from_secs(30),
            rng_seed: None,
        }
    }
}

/// Commands sent to a session actor through its channel.
pub(crate) enum SessionCommand {
    Ready { player: PlayerId },
    JoinRoom { player: PlayerId },
    LeaveRoom { player: PlayerId },
    Pick { player: PlayerId, card: CardId },
    JoinGame { player: PlayerId },
    Play { player: PlayerId, card: CardId },
    EndTurn { player: PlayerId },
    Info { reply: oneshot::Sender<SessionInfo> },
}

/// Snapshot of session metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub players: [PlayerId; 2],
    pub status: SessionStatus,
}

/// Handle to a running session actor. Cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    players: [PlayerId; 2],
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn players(&self) -> [PlayerId; 2] {
        self.players
    }

    /// Whether the actor has stopped (finished or abandoned session).
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub(crate) async fn send(
        &self,
        cmd: SessionCommand,
    ) -> Result<(), ServerError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| ServerError::SessionUnavailable(self.session_id))
    }

    /// Requests the actor's current metadata.
    pub async fn info(&self) -> Result<SessionInfo, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Info { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| ServerError::SessionUnavailable(self.session_id))
    }
}

/// Where the session is in its life.
enum Phase {
    /// Lobby and draft. The draft engine tracks readiness internally.
    Gathering(DraftEngine),
    /// Draft done; waiting for both players to enter the battle.
    AwaitingBattle {
        decks: [(PlayerId, Vec<CatalogCard>); 2],
        joined: [bool; 2],
    },
    Battle(BattleSession),
    Finished,
}

struct SessionActor {
    session_id: SessionId,
    players: [PlayerId; 2],
    catalog: Arc<CardCatalog>,
    store: Arc<dyn SessionStore>,
    directory: ConnectionDirectory,
    clock: TurnClock<PlayerId>,
    rng: StdRng,
    phase: Phase,
    receiver: mpsc::Receiver<SessionCommand>,
}

/// Spawns a session actor task and returns a handle to it.
pub(crate) fn spawn_session(
    session_id: SessionId,
    players: [PlayerId; 2],
    catalog: Arc<CardCatalog>,
    store: Arc<dyn SessionStore>,
    directory: ConnectionDirectory,
    config: &SessionConfig,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let actor = SessionActor {
        session_id,
        players,
        catalog,
        store,
        directory,
        clock: TurnClock::new(config.turn_duration),
        rng,
        phase: Phase::Gathering(DraftEngine::new(players)),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        players,
        sender: tx,
    }
}

impl SessionActor {
    async fn run(mut self) {
        info!(session_id = %self.session_id, "session actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => break,
                    }
                }
                expiry = self.clock.expired() => {
                    self.handle_expiry(expiry.holder);
                }
            }
            if matches!(self.phase, Phase::Finished) {
                break;
            }
        }

        info!(session_id = %self.session_id, "session actor stopped");
    }

    fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Ready { player } => self.handle_ready(player),
            SessionCommand::JoinRoom { player } => self.handle_join_room(player),
            SessionCommand::LeaveRoom { player } => {
                self.handle_leave_room(player)
            }
            SessionCommand::Pick { player, card } => {
                let outcome = match &mut self.phase {
                    Phase::Gathering(draft) if draft.is_started() => {
                        draft.pick(player, card)
                    }
                    _ => return,
                };
                self.apply_pick(player, card, outcome);
            }
            SessionCommand::JoinGame { player } => self.handle_join_game(player),
            SessionCommand::Play { player, card } => {
                self.handle_play(player, card)
            }
            SessionCommand::EndTurn { player } => self.handle_end_turn(player),
            SessionCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
        }
    }

    // -- Lobby and draft -------------------------------------------------

    fn handle_ready(&mut self, player: PlayerId) {
        let outcome = match &mut self.phase {
            Phase::Gathering(draft) => {
                draft.mark_ready(player, &self.catalog, &mut self.rng)
            }
            _ => return,
        };
        match outcome {
            ReadyOutcome::Ignored => {}
            ReadyOutcome::Waiting => {
                debug!(session_id = %self.session_id, %player, "first ready");
            }
            ReadyOutcome::Started => self.start_draft(),
        }
    }

    fn start_draft(&mut self) {
        if let Err(e) = self
            .store
            .set_status(self.session_id, SessionStatus::Draft)
        {
            self.fail_session(&e);
            return;
        }

        let (card_pool, first_player) = match &self.phase {
            Phase::Gathering(draft) => match (draft.pool(), draft.first_player())
            {
                (Some(pool), Some(first)) => (pool.to_vec(), first),
                _ => return,
            },
            _ => return,
        };

        info!(session_id = %self.session_id, %first_player, "draft started");
        self.send_to(
            Recipient::All,
            ServerEvent::StartDraft {
                session_id: self.session_id,
                card_pool,
                first_player,
            },
        );
        self.clock.arm(first_player);
    }

    fn apply_pick(
        &mut self,
        player: PlayerId,
        card: CardId,
        outcome: PickOutcome,
    ) {
        match outcome {
            PickOutcome::Rejected => {
                debug!(session_id = %self.session_id, %player, %card,
                    "pick ignored");
            }
            PickOutcome::Picked {
                sequence,
                next_player,
            } => {
                if let Err(e) = self.store.append_pick(
                    self.session_id,
                    DraftPickRecord {
                        player,
                        card,
                        sequence,
                    },
                ) {
                    self.fail_session(&e);
                    return;
                }
                self.send_to(
                    Recipient::All,
                    ServerEvent::DraftUpdate {
                        picked_by: player,
                        card,
                        next_player,
                    },
                );
                self.clock.arm(next_player);
            }
            PickOutcome::Complete { sequence } => {
                if let Err(e) = self.store.append_pick(
                    self.session_id,
                    DraftPickRecord {
                        player,
                        card,
                        sequence,
                    },
                ) {
                    self.fail_session(&e);
                    return;
                }
                if let Err(e) = self
                    .store
                    .set_status(self.session_id, SessionStatus::Battle)
                {
                    self.fail_session(&e);
                    return;
                }

                // The final pick is still announced; `next_player` is
                // the opponent by parity even though no pick follows.
                let next_player = self
                    .opponent_of(player)
                    .unwrap_or(player);
                self.send_to(
                    Recipient::All,
                    ServerEvent::DraftUpdate {
                        picked_by: player,
                        card,
                        next_player,
                    },
                );
                self.send_to(Recipient::All, ServerEvent::DraftComplete);

                let decks = match &self.phase {
                    Phase::Gathering(draft) => draft.decks(),
                    _ => None,
                };
                if let Some([deck_a, deck_b]) = decks {
                    info!(session_id = %self.session_id, "draft complete");
                    self.phase = Phase::AwaitingBattle {
                        decks: [
                            (self.players[0], deck_a),
                            (self.players[1], deck_b),
                        ],
                        joined: [false; 2],
                    };
                    // Entering the battle has a deadline too, so a
                    // session both players walk away from does not
                    // linger forever.
                    self.clock.arm(self.players[0]);
                }
            }
        }
    }

    fn handle_join_room(&mut self, player: PlayerId) {
        if !self.players.contains(&player) {
            self.directory.send(player, ServerEvent::InvalidSession);
            return;
        }
        match &self.phase {
            Phase::Gathering(draft) if draft.is_started() => {
                let (Some(pool), Some(first), Some(next)) = (
                    draft.pool(),
                    draft.first_player(),
                    draft.expected_player(),
                ) else {
                    self.directory.send(player, ServerEvent::InvalidSession);
                    return;
                };
                let picks = draft
                    .picks()
                    .iter()
                    .map(|p| DraftPickView {
                        picked_by: p.player,
                        card: p.card,
                    })
                    .collect();
                self.directory.send(
                    player,
                    ServerEvent::ResumeDraft {
                        session_id: self.session_id,
                        card_pool: pool.to_vec(),
                        first_player: first,
                        picks,
                        next_player: next,
                    },
                );
            }
            Phase::Gathering(_) => {
                self.directory.send(
                    player,
                    ServerEvent::SessionJoined {
                        session_id: self.session_id,
                    },
                );
            }
            // Past the draft the room is no longer joinable; the
            // battle has its own entry path.
            _ => self.directory.send(player, ServerEvent::InvalidSession),
        }
    }

    fn handle_leave_room(&mut self, player: PlayerId) {
        if !self.players.contains(&player) {
            self.directory.send(player, ServerEvent::InvalidSession);
            return;
        }
        if !matches!(self.phase, Phase::Gathering(_)) {
            return;
        }
        self.abandon_session(player);
    }

    /// Ends a session a player has walked away from: the durable
    /// record is closed out and the other player notified.
    fn abandon_session(&mut self, leaver: PlayerId) {
        if let Err(e) = self
            .store
            .set_status(self.session_id, SessionStatus::Finished)
        {
            self.fail_session(&e);
            return;
        }
        info!(session_id = %self.session_id, %leaver, "session abandoned");
        self.send_to(
            Recipient::AllExcept(leaver),
            ServerEvent::OpponentLeft { player: leaver },
        );
        self.clock.cancel();
        self.phase = Phase::Finished;
    }

    // -- Battle ----------------------------------------------------------

    fn handle_join_game(&mut self, player: PlayerId) {
        let Some(idx) = self.players.iter().position(|p| *p == player) else {
            self.directory.send(player, ServerEvent::InvalidGame);
            return;
        };
        match &mut self.phase {
            Phase::AwaitingBattle { decks, joined } => {
                joined[idx] = true;
                if joined.iter().all(|j| *j) {
                    let decks = decks.clone();
                    self.start_battle(decks);
                } else if let Some(missing) =
                    joined.iter().position(|j| !*j)
                {
                    // The deadline now rests on the absent player.
                    let absent = self.players[missing];
                    self.clock.arm(absent);
                }
            }
            Phase::Battle(_) => self.send_battle_resume(player),
            _ => self.directory.send(player, ServerEvent::InvalidGame),
        }
    }

    fn start_battle(&mut self, decks: [(PlayerId, Vec<CatalogCard>); 2]) {
        let first_player = self.players[self.rng.random_range(0..2)];
        let battle = BattleSession::new(decks, first_player);
        info!(session_id = %self.session_id, %first_player, "battle started");

        for player in self.players {
            let (Some(me), Some(opp)) =
                (battle.state_of(player), battle.opponent_of(player))
            else {
                continue;
            };
            self.directory.send(
                player,
                ServerEvent::GameStart {
                    session_id: self.session_id,
                    round: battle.round(),
                    current_turn: first_player,
                    your_hand: me.hand().to_vec(),
                    your_hp: me.hp(),
                    your_crystals: me.crystals(),
                    your_deck_size: me.deck_size(),
                    opp_hp: opp.hp(),
                    opp_hand_size: opp.hand_size(),
                    opp_deck_size: opp.deck_size(),
                },
            );
        }

        let crystals = battle
            .state_of(first_player)
            .map(|s| s.crystals())
            .unwrap_or(0);
        self.phase = Phase::Battle(battle);
        self.announce_turn(first_player, crystals);
    }

    fn send_battle_resume(&mut self, player: PlayerId) {
        let Phase::Battle(battle) = &self.phase else {
            return;
        };
        let (Some(me), Some(opp)) =
            (battle.state_of(player), battle.opponent_of(player))
        else {
            self.directory.send(player, ServerEvent::InvalidGame);
            return;
        };

        self.directory.send(
            player,
            ServerEvent::ResumeGame {
                session_id: self.session_id,
                round: battle.round(),
                current_turn: battle.current_turn(),
                your_hand: me.hand().to_vec(),
                your_hp: me.hp(),
                your_crystals: me.crystals(),
                your_deck_size: me.deck_size(),
                your_field: me.field().clone(),
                opp_hp: opp.hp(),
                opp_field: opp.field().clone(),
                opp_hand_size: opp.hand_size(),
                opp_deck_size: opp.deck_size(),
            },
        );

        // Re-announce the live turn; the existing deadline stays armed.
        let time_secs = self.turn_secs();
        if battle.current_turn() == player {
            self.directory.send(
                player,
                ServerEvent::YourTurn {
                    crystals: me.crystals(),
                    time_secs,
                },
            );
        } else {
            self.directory
                .send(player, ServerEvent::OpponentTurn { time_secs });
        }
    }

    fn handle_play(&mut self, player: PlayerId, card: CardId) {
        let outcome = match &mut self.phase {
            Phase::Battle(battle) => battle.play_card(player, card),
            _ => return,
        };
        if let PlayOutcome::Placed {
            slot,
            card: field_card,
            crystals,
        } = outcome
        {
            // The owner sees the card; the opponent sees a face-down
            // placeholder until the reveal.
            self.directory.send(
                player,
                ServerEvent::CardPlayed {
                    by: player,
                    slot,
                    card: Some(field_card),
                    crystals,
                },
            );
            self.send_to(
                Recipient::AllExcept(player),
                ServerEvent::CardPlayed {
                    by: player,
                    slot,
                    card: None,
                    crystals,
                },
            );
        }
    }

    fn handle_end_turn(&mut self, player: PlayerId) {
        let outcome = match &mut self.phase {
            Phase::Battle(battle) => battle.end_turn(player),
            _ => return,
        };
        match outcome {
            TurnOutcome::Rejected => {}
            TurnOutcome::NextTurn(next) => {
                let crystals = self.battle_crystals(next);
                self.announce_turn(next, crystals);
            }
            TurnOutcome::RoundResolved(report) => self.broadcast_round(report),
        }
    }

    fn broadcast_round(&mut self, report: RoundReport) {
        self.send_to(
            Recipient::All,
            ServerEvent::RevealCards {
                boards: report.reveal.to_vec(),
            },
        );
        self.send_to(
            Recipient::All,
            ServerEvent::BattleResult {
                boards: report.result.to_vec(),
            },
        );

        match report.outcome {
            RoundOutcome::GameOver { winner } => {
                self.clock.cancel();
                if let Err(e) = self
                    .store
                    .set_status(self.session_id, SessionStatus::Finished)
                {
                    self.fail_session(&e);
                    return;
                }
                info!(session_id = %self.session_id, ?winner, "game over");
                self.send_to(Recipient::All, ServerEvent::GameOver { winner });
                self.phase = Phase::Finished;
            }
            RoundOutcome::NextRound {
                round,
                first_mover,
                refills,
            } => {
                for refill in refills {
                    self.directory.send(
                        refill.player,
                        ServerEvent::NewRound {
                            round,
                            hand: refill.hand,
                            crystals: refill.crystals,
                            deck_size: refill.deck_size,
                        },
                    );
                }
                let crystals = self.battle_crystals(first_mover);
                self.announce_turn(first_mover, crystals);
            }
        }
    }

    // -- Deadlines -------------------------------------------------------

    fn handle_expiry(&mut self, holder: PlayerId) {
        debug!(session_id = %self.session_id, %holder, "turn deadline hit");
        if matches!(self.phase, Phase::Battle(_)) {
            self.handle_end_turn(holder);
            return;
        }
        if matches!(self.phase, Phase::AwaitingBattle { .. }) {
            // A drafted session where someone never enters the battle
            // is treated like a walk-out.
            self.abandon_session(holder);
            return;
        }

        let auto = match &mut self.phase {
            Phase::Gathering(draft) if draft.is_started() => {
                draft.auto_pick(&mut self.rng)
            }
            _ => None,
        };
        if let Some((player, card, outcome)) = auto {
            self.apply_pick(player, card, outcome);
        }
    }

    // -- Plumbing --------------------------------------------------------

    fn announce_turn(&mut self, current: PlayerId, crystals: u32) {
        let time_secs = self.turn_secs();
        self.directory.send(
            current,
            ServerEvent::YourTurn {
                crystals,
                time_secs,
            },
        );
        self.send_to(
            Recipient::AllExcept(current),
            ServerEvent::OpponentTurn { time_secs },
        );
        self.clock.arm(current);
    }

    fn battle_crystals(&self, player: PlayerId) -> u32 {
        match &self.phase {
            Phase::Battle(battle) => battle
                .state_of(player)
                .map(|s| s.crystals())
                .unwrap_or(0),
            _ => 0,
        }
    }

    fn fail_session(&mut self, err: &StoreError) {
        error!(session_id = %self.session_id, error = %err,
            "store failure, session ending");
        self.clock.cancel();
        self.send_to(
            Recipient::All,
            ServerEvent::SessionFailed {
                message: err.to_string(),
            },
        );
        self.phase = Phase::Finished;
    }

    fn send_to(&self, recipient: Recipient, event: ServerEvent) {
        self.directory.dispatch(self.players, recipient, event);
    }

    fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        match self.players {
            [a, b] if a == player => Some(b),
            [a, b] if b == player => Some(a),
            _ => None,
        }
    }

    fn turn_secs(&self) -> u64 {
        self.clock.turn_duration().as_secs()
    }

    fn info(&self) -> SessionInfo {
        let status = match &self.phase {
            Phase::Gathering(draft) if draft.is_started() => {
                SessionStatus::Draft
            }
            Phase::Gathering(_) => SessionStatus::Lobby,
            Phase::AwaitingBattle { .. } | Phase::Battle(_) => {
                SessionStatus::Battle
            }
            Phase::Finished => SessionStatus::Finished,
        };
        SessionInfo {
            session_id: self.session_id,
            players: self.players,
            status,
        }
    }
}
