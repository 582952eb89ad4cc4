//! Integration tests for the full session flow: invites, draft,
//! battle, timeouts, resume, and store-failure handling.
//!
//! Timer tests run under `start_paused` so deadlines resolve
//! deterministically without real waiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use manaduel::{EventReceiver, GameServer, SessionConfig};
use manaduel_protocol::{
    CardCatalog, CardId, CatalogCard, ClientCommand, PlayerId, ServerEvent,
    SessionId,
};
use manaduel_store::{
    DraftPickRecord, MemoryStore, SessionStatus, SessionStore, StoreError,
};

const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);
const P3: PlayerId = PlayerId(3);

// =========================================================================
// Helpers
// =========================================================================

/// A catalog of uniform cards (cost 1, 2 attack, 1 defense) so battle
/// outcomes are predictable regardless of which cards get drafted.
fn uniform_catalog() -> CardCatalog {
    CardCatalog::new(
        (1..=40)
            .map(|n| CatalogCard {
                id: CardId(n),
                name: format!("Card {n}"),
                cost: 1,
                attack: 2,
                defense: 1,
                image_url: format!("/cards/{n}.png"),
            })
            .collect(),
    )
}

fn test_config() -> SessionConfig {
    SessionConfig {
        turn_duration: Duration::from_secs(30),
        rng_seed: Some(7),
    }
}

fn server_with(store: Arc<dyn SessionStore>) -> GameServer {
    GameServer::with_config(uniform_catalog(), store, test_config())
}

/// Receives the next event or panics. The generous timeout only
/// matters under paused time, where it resolves instantly.
async fn ev(rx: &mut EventReceiver) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(600), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Asserts that no event arrives within a short window.
async fn assert_silent(rx: &mut EventReceiver) {
    let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(result.is_err(), "expected silence, got {result:?}");
}

/// Connects both players and walks them through invite + accept.
/// Returns their event streams (drained) and the session id.
async fn setup_session(
    server: &GameServer,
) -> (EventReceiver, EventReceiver, SessionId) {
    let mut rx1 = server.connect(P1);
    let mut rx2 = server.connect(P2);

    server
        .handle_command(P1, ClientCommand::Invite { target: P2 })
        .await;
    assert_eq!(ev(&mut rx2).await, ServerEvent::InviteReceived { from: P1 });

    server
        .handle_command(
            P2,
            ClientCommand::InviteResponse {
                from: P1,
                accept: true,
            },
        )
        .await;
    assert_eq!(
        ev(&mut rx1).await,
        ServerEvent::InviteResponse {
            from: P2,
            accept: true
        }
    );
    let session_id = match ev(&mut rx1).await {
        ServerEvent::SessionJoined { session_id } => session_id,
        other => panic!("expected SessionJoined, got {other:?}"),
    };
    assert_eq!(ev(&mut rx2).await, ServerEvent::SessionJoined { session_id });

    (rx1, rx2, session_id)
}

/// Readies both players and returns the draft pool and first picker.
async fn start_draft(
    server: &GameServer,
    session_id: SessionId,
    rx1: &mut EventReceiver,
    rx2: &mut EventReceiver,
) -> (Vec<CatalogCard>, PlayerId) {
    server
        .handle_command(P1, ClientCommand::PlayerReady { session_id })
        .await;
    server
        .handle_command(P2, ClientCommand::PlayerReady { session_id })
        .await;

    let (pool, first) = match ev(rx1).await {
        ServerEvent::StartDraft {
            card_pool,
            first_player,
            ..
        } => (card_pool, first_player),
        other => panic!("expected StartDraft, got {other:?}"),
    };
    assert!(matches!(ev(rx2).await, ServerEvent::StartDraft { .. }));
    (pool, first)
}

/// Drives all 30 picks in pool order, draining the updates.
async fn complete_draft(
    server: &GameServer,
    session_id: SessionId,
    rx1: &mut EventReceiver,
    rx2: &mut EventReceiver,
    pool: &[CatalogCard],
    first: PlayerId,
) {
    let mut current = first;
    for card in pool {
        server
            .handle_command(
                current,
                ClientCommand::DraftPick {
                    session_id,
                    card: card.id,
                },
            )
            .await;
        for rx in [&mut *rx1, &mut *rx2] {
            match ev(rx).await {
                ServerEvent::DraftUpdate { picked_by, .. } => {
                    assert_eq!(picked_by, current);
                }
                other => panic!("expected DraftUpdate, got {other:?}"),
            }
        }
        current = if current == P1 { P2 } else { P1 };
    }
    assert_eq!(ev(rx1).await, ServerEvent::DraftComplete);
    assert_eq!(ev(rx2).await, ServerEvent::DraftComplete);
}

/// Joins both players into the battle, returning whose turn it is and
/// the current player's opening hand.
async fn enter_battle(
    server: &GameServer,
    session_id: SessionId,
    rx1: &mut EventReceiver,
    rx2: &mut EventReceiver,
) -> (PlayerId, Vec<CatalogCard>) {
    server
        .handle_command(P1, ClientCommand::JoinGame { session_id })
        .await;
    server
        .handle_command(P2, ClientCommand::JoinGame { session_id })
        .await;

    let mut current = P1;
    let mut hands = [Vec::new(), Vec::new()];
    for (idx, rx) in [rx1, rx2].into_iter().enumerate() {
        match ev(rx).await {
            ServerEvent::GameStart {
                round,
                current_turn,
                your_hand,
                your_hp,
                your_crystals,
                your_deck_size,
                opp_hp,
                opp_hand_size,
                opp_deck_size,
                ..
            } => {
                assert_eq!(round, 1);
                assert_eq!(your_hp, 20);
                assert_eq!(opp_hp, 20);
                assert_eq!(your_crystals, 8);
                assert_eq!(your_hand.len(), 5);
                assert_eq!(your_deck_size, 10);
                assert_eq!(opp_hand_size, 5);
                assert_eq!(opp_deck_size, 10);
                current = current_turn;
                hands[idx] = your_hand;
            }
            other => panic!("expected GameStart, got {other:?}"),
        }
        // Turn announcement follows the snapshot.
        match ev(rx).await {
            ServerEvent::YourTurn { time_secs, .. }
            | ServerEvent::OpponentTurn { time_secs } => {
                assert_eq!(time_secs, 30);
            }
            other => panic!("expected turn announcement, got {other:?}"),
        }
    }
    let hand = if current == P1 {
        hands[0].clone()
    } else {
        hands[1].clone()
    };
    (current, hand)
}

/// A store that can be told to fail status writes.
struct FailingStore {
    inner: MemoryStore,
    fail_status: AtomicBool,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_status: AtomicBool::new(false),
        }
    }
}

impl SessionStore for FailingStore {
    fn create_session(
        &self,
        player1: PlayerId,
        player2: PlayerId,
    ) -> Result<SessionId, StoreError> {
        self.inner.create_session(player1, player2)
    }

    fn status(&self, session_id: SessionId) -> Result<SessionStatus, StoreError> {
        self.inner.status(session_id)
    }

    fn set_status(
        &self,
        session_id: SessionId,
        status: SessionStatus,
    ) -> Result<(), StoreError> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write refused".into()));
        }
        self.inner.set_status(session_id, status)
    }

    fn append_pick(
        &self,
        session_id: SessionId,
        pick: DraftPickRecord,
    ) -> Result<(), StoreError> {
        self.inner.append_pick(session_id, pick)
    }

    fn picks(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<DraftPickRecord>, StoreError> {
        self.inner.picks(session_id)
    }
}

// =========================================================================
// Matchmaking
// =========================================================================

#[tokio::test]
async fn test_invite_accept_creates_session() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone());

    let (_rx1, _rx2, session_id) = setup_session(&server).await;

    assert_eq!(store.status(session_id).unwrap(), SessionStatus::Lobby);
    assert_eq!(server.session_count().await, 1);

    let info = server.session_info(session_id).await.expect("live session");
    assert_eq!(info.session_id, session_id);
    assert_eq!(info.players, [P1, P2]);
    assert_eq!(info.status, SessionStatus::Lobby);
}

#[tokio::test]
async fn test_invite_to_offline_player_fails_without_fake_decline() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let mut rx1 = server.connect(P1);

    server
        .handle_command(P1, ClientCommand::Invite { target: P2 })
        .await;

    // The target was never asked, so the inviter gets a delivery
    // failure rather than a decline in the target's name.
    assert_eq!(ev(&mut rx1).await, ServerEvent::InviteFailed { target: P2 });
}

#[tokio::test]
async fn test_invite_decline_notifies_inviter() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let mut rx1 = server.connect(P1);
    let mut rx2 = server.connect(P2);

    server
        .handle_command(P1, ClientCommand::Invite { target: P2 })
        .await;
    assert_eq!(ev(&mut rx2).await, ServerEvent::InviteReceived { from: P1 });

    server
        .handle_command(
            P2,
            ClientCommand::InviteResponse {
                from: P1,
                accept: false,
            },
        )
        .await;

    assert_eq!(
        ev(&mut rx1).await,
        ServerEvent::InviteResponse {
            from: P2,
            accept: false
        }
    );
    assert_eq!(server.session_count().await, 0);
}

#[tokio::test]
async fn test_accept_auto_declines_competing_invite() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let mut rx1 = server.connect(P1);
    let mut rx2 = server.connect(P2);
    let mut rx3 = server.connect(P3);

    server
        .handle_command(P1, ClientCommand::Invite { target: P2 })
        .await;
    server
        .handle_command(P3, ClientCommand::Invite { target: P2 })
        .await;
    assert_eq!(ev(&mut rx2).await, ServerEvent::InviteReceived { from: P1 });
    assert_eq!(ev(&mut rx2).await, ServerEvent::InviteReceived { from: P3 });

    server
        .handle_command(
            P2,
            ClientCommand::InviteResponse {
                from: P1,
                accept: true,
            },
        )
        .await;

    // The losing inviter is declined on P2's behalf.
    assert_eq!(
        ev(&mut rx3).await,
        ServerEvent::InviteResponse {
            from: P2,
            accept: false
        }
    );
    assert!(matches!(
        ev(&mut rx1).await,
        ServerEvent::InviteResponse { accept: true, .. }
    ));
}

#[tokio::test]
async fn test_command_for_unknown_session_rejected() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let mut rx1 = server.connect(P1);

    server
        .handle_command(
            P1,
            ClientCommand::PlayerReady {
                session_id: SessionId(999),
            },
        )
        .await;
    assert_eq!(ev(&mut rx1).await, ServerEvent::InvalidSession);

    server
        .handle_command(
            P1,
            ClientCommand::JoinGame {
                session_id: SessionId(999),
            },
        )
        .await;
    assert_eq!(ev(&mut rx1).await, ServerEvent::InvalidGame);
}

// =========================================================================
// Draft
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_both_ready_starts_draft() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone());
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;

    server
        .handle_command(P1, ClientCommand::PlayerReady { session_id })
        .await;
    assert_silent(&mut rx1).await;
    assert_eq!(store.status(session_id).unwrap(), SessionStatus::Lobby);

    server
        .handle_command(P2, ClientCommand::PlayerReady { session_id })
        .await;

    let (pool, first) = match ev(&mut rx1).await {
        ServerEvent::StartDraft {
            session_id: sid,
            card_pool,
            first_player,
        } => {
            assert_eq!(sid, session_id);
            (card_pool, first_player)
        }
        other => panic!("expected StartDraft, got {other:?}"),
    };
    assert!(matches!(ev(&mut rx2).await, ServerEvent::StartDraft { .. }));
    assert_eq!(pool.len(), 30);
    assert!(first == P1 || first == P2);
    assert_eq!(store.status(session_id).unwrap(), SessionStatus::Draft);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_turn_pick_silently_ignored() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;

    let wrong = if first == P1 { P2 } else { P1 };
    server
        .handle_command(
            wrong,
            ClientCommand::DraftPick {
                session_id,
                card: pool[0].id,
            },
        )
        .await;

    assert_silent(&mut rx1).await;
    assert_silent(&mut rx2).await;
}

#[tokio::test(start_paused = true)]
async fn test_pick_broadcasts_update_and_persists() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone());
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;

    server
        .handle_command(
            first,
            ClientCommand::DraftPick {
                session_id,
                card: pool[3].id,
            },
        )
        .await;

    for rx in [&mut rx1, &mut rx2] {
        match ev(rx).await {
            ServerEvent::DraftUpdate {
                picked_by,
                card,
                next_player,
            } => {
                assert_eq!(picked_by, first);
                assert_eq!(card, pool[3].id);
                assert_ne!(next_player, first);
            }
            other => panic!("expected DraftUpdate, got {other:?}"),
        }
    }

    let picks = store.picks(session_id).unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].player, first);
    assert_eq!(picks[0].card, pool[3].id);
    assert_eq!(picks[0].sequence, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pick_deadline_auto_picks_for_idle_player() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (_, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;

    // Nobody picks; paused time runs to the 30s deadline.
    match ev(&mut rx1).await {
        ServerEvent::DraftUpdate { picked_by, .. } => {
            assert_eq!(picked_by, first, "auto-pick acts for the idle player");
        }
        other => panic!("expected DraftUpdate, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_join_room_mid_draft_replays_picks() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;

    // Two picks happen.
    let second = if first == P1 { P2 } else { P1 };
    for (player, card) in [(first, pool[0].id), (second, pool[1].id)] {
        server
            .handle_command(player, ClientCommand::DraftPick { session_id, card })
            .await;
        ev(&mut rx1).await;
        ev(&mut rx2).await;
    }

    // P1 reconnects into the room.
    server
        .handle_command(P1, ClientCommand::JoinRoom { session_id })
        .await;

    match ev(&mut rx1).await {
        ServerEvent::ResumeDraft {
            session_id: sid,
            card_pool,
            first_player,
            picks,
            next_player,
        } => {
            assert_eq!(sid, session_id);
            assert_eq!(card_pool.len(), 30);
            assert_eq!(first_player, first);
            assert_eq!(picks.len(), 2);
            assert_eq!(picks[0].picked_by, first);
            assert_eq!(picks[0].card, pool[0].id);
            assert_eq!(next_player, first, "two picks back to the first player");
        }
        other => panic!("expected ResumeDraft, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_leave_room_notifies_opponent_and_ends_session() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone());
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;

    server
        .handle_command(P1, ClientCommand::LeaveRoom { session_id })
        .await;

    assert_eq!(ev(&mut rx2).await, ServerEvent::OpponentLeft { player: P1 });

    // The abandoned session no longer accepts commands, and the
    // durable record is closed out.
    server
        .handle_command(P2, ClientCommand::PlayerReady { session_id })
        .await;
    assert_eq!(ev(&mut rx2).await, ServerEvent::InvalidSession);
    assert_eq!(store.status(session_id).unwrap(), SessionStatus::Finished);
}

#[tokio::test(start_paused = true)]
async fn test_store_failure_blocks_draft_start() {
    let store = Arc::new(FailingStore::new());
    let server = server_with(store.clone());
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;

    store.fail_status.store(true, Ordering::SeqCst);
    server
        .handle_command(P1, ClientCommand::PlayerReady { session_id })
        .await;
    server
        .handle_command(P2, ClientCommand::PlayerReady { session_id })
        .await;

    // No StartDraft: the failed write ends the session instead.
    for rx in [&mut rx1, &mut rx2] {
        match ev(rx).await {
            ServerEvent::SessionFailed { message } => {
                assert!(message.contains("write refused"));
            }
            other => panic!("expected SessionFailed, got {other:?}"),
        }
    }
    assert_eq!(
        store.status(session_id).unwrap(),
        SessionStatus::Lobby,
        "status must not have advanced"
    );
}

// =========================================================================
// Battle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_full_match_draft_to_second_round() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone());
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;

    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;
    complete_draft(&server, session_id, &mut rx1, &mut rx2, &pool, first).await;
    assert_eq!(store.status(session_id).unwrap(), SessionStatus::Battle);

    let (current, hand) =
        enter_battle(&server, session_id, &mut rx1, &mut rx2).await;
    let (current_rx, other_rx) = if current == P1 {
        (&mut rx1, &mut rx2)
    } else {
        (&mut rx2, &mut rx1)
    };

    // Current player plays one uniform 2/1 costing 1.
    server
        .handle_command(
            current,
            ClientCommand::PlayCard {
                session_id,
                card: hand[0].id,
            },
        )
        .await;

    match ev(current_rx).await {
        ServerEvent::CardPlayed {
            by,
            slot,
            card,
            crystals,
        } => {
            assert_eq!(by, current);
            assert_eq!(slot, 0);
            assert_eq!(card.as_ref().map(|c| c.id), Some(hand[0].id));
            assert_eq!(crystals, 7);
        }
        other => panic!("expected CardPlayed, got {other:?}"),
    }
    match ev(other_rx).await {
        ServerEvent::CardPlayed { card, .. } => {
            assert!(card.is_none(), "opponent sees the card face-down");
        }
        other => panic!("expected CardPlayed, got {other:?}"),
    }

    // Current ends; play passes to the opponent.
    server
        .handle_command(current, ClientCommand::EndTurn { session_id })
        .await;
    assert!(matches!(ev(current_rx).await, ServerEvent::OpponentTurn { .. }));
    assert!(matches!(ev(other_rx).await, ServerEvent::YourTurn { .. }));

    // Opponent plays nothing and ends; the round resolves.
    let other = if current == P1 { P2 } else { P1 };
    server
        .handle_command(other, ClientCommand::EndTurn { session_id })
        .await;

    for rx in [&mut *current_rx, &mut *other_rx] {
        match ev(rx).await {
            ServerEvent::RevealCards { boards } => {
                assert_eq!(boards.len(), 2);
            }
            other => panic!("expected RevealCards, got {other:?}"),
        }
        match ev(rx).await {
            ServerEvent::BattleResult { boards } => {
                let loser = boards.iter().find(|b| b.player == other).unwrap();
                let winner =
                    boards.iter().find(|b| b.player == current).unwrap();
                assert_eq!(loser.hp, 18, "unopposed 2-attack card hits hp");
                assert_eq!(winner.hp, 20);
            }
            other_ev => panic!("expected BattleResult, got {other_ev:?}"),
        }
    }

    // Round 2: refills and +5 crystals, opener flips to the other player.
    match ev(current_rx).await {
        ServerEvent::NewRound {
            round,
            hand,
            crystals,
            deck_size,
        } => {
            assert_eq!(round, 2);
            assert_eq!(hand.len(), 5);
            assert_eq!(crystals, 8 - 1 + 5);
            assert_eq!(deck_size, 9);
        }
        other => panic!("expected NewRound, got {other:?}"),
    }
    match ev(other_rx).await {
        ServerEvent::NewRound { crystals, deck_size, .. } => {
            assert_eq!(crystals, 8 + 5);
            assert_eq!(deck_size, 10);
        }
        other => panic!("expected NewRound, got {other:?}"),
    }
    assert!(matches!(ev(other_rx).await, ServerEvent::YourTurn { .. }));
    assert!(matches!(ev(current_rx).await, ServerEvent::OpponentTurn { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_turn_deadline_forces_end_turn() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;
    complete_draft(&server, session_id, &mut rx1, &mut rx2, &pool, first).await;
    let (current, _) = enter_battle(&server, session_id, &mut rx1, &mut rx2).await;
    let (current_rx, other_rx) = if current == P1 {
        (&mut rx1, &mut rx2)
    } else {
        (&mut rx2, &mut rx1)
    };

    // The current player never acts; the deadline ends their turn.
    assert!(matches!(ev(current_rx).await, ServerEvent::OpponentTurn { .. }));
    assert!(matches!(ev(other_rx).await, ServerEvent::YourTurn { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_battle_entry_deadline_abandons_session() {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone());
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;
    complete_draft(&server, session_id, &mut rx1, &mut rx2, &pool, first).await;

    // Only P1 enters the battle; P2 never does.
    server
        .handle_command(P1, ClientCommand::JoinGame { session_id })
        .await;

    // Paused time runs to the entry deadline; the no-show is treated
    // as having left.
    assert_eq!(ev(&mut rx1).await, ServerEvent::OpponentLeft { player: P2 });
    assert_eq!(store.status(session_id).unwrap(), SessionStatus::Finished);

    server
        .handle_command(P1, ClientCommand::JoinGame { session_id })
        .await;
    assert_eq!(ev(&mut rx1).await, ServerEvent::InvalidGame);
}

#[tokio::test(start_paused = true)]
async fn test_join_game_mid_battle_resumes_with_hidden_opponent_hand() {
    let server = server_with(Arc::new(MemoryStore::new()));
    let (mut rx1, mut rx2, session_id) = setup_session(&server).await;
    let (pool, first) = start_draft(&server, session_id, &mut rx1, &mut rx2).await;
    complete_draft(&server, session_id, &mut rx1, &mut rx2, &pool, first).await;
    let (current, hand) =
        enter_battle(&server, session_id, &mut rx1, &mut rx2).await;

    // Current player puts a card down.
    server
        .handle_command(
            current,
            ClientCommand::PlayCard {
                session_id,
                card: hand[0].id,
            },
        )
        .await;
    let (current_rx, other_rx) = if current == P1 {
        (&mut rx1, &mut rx2)
    } else {
        (&mut rx2, &mut rx1)
    };
    ev(current_rx).await; // CardPlayed (face-up)
    ev(other_rx).await; // CardPlayed (face-down)

    // The opponent rejoins mid-battle.
    let other = if current == P1 { P2 } else { P1 };
    server
        .handle_command(other, ClientCommand::JoinGame { session_id })
        .await;

    match ev(other_rx).await {
        ServerEvent::ResumeGame {
            session_id: sid,
            round,
            current_turn,
            your_hand,
            opp_hand_size,
            opp_deck_size,
            opp_field,
            ..
        } => {
            assert_eq!(sid, session_id);
            assert_eq!(round, 1);
            assert_eq!(current_turn, current);
            assert_eq!(your_hand.len(), 5);
            // Opponent cards only ever appear as counts.
            assert_eq!(opp_hand_size, 4);
            assert_eq!(opp_deck_size, 10);
            assert_eq!(opp_field.iter().flatten().count(), 1);
        }
        other_ev => panic!("expected ResumeGame, got {other_ev:?}"),
    }
    assert!(matches!(ev(other_rx).await, ServerEvent::OpponentTurn { .. }));
}
