//! `GameServer`: the command entry point tying all the layers together.
//!
//! The embedding transport does three things: register a connecting
//! player with [`GameServer::connect`] and pump the returned receiver
//! out to them, feed their decoded [`ClientCommand`]s into
//! [`GameServer::handle_command`], and call
//! [`GameServer::disconnect`] when the connection drops. Everything
//! else — matchmaking, session actors, persistence — happens behind
//! this type.

use std::sync::Arc;

use manaduel_protocol::{
    CardCatalog, ClientCommand, PlayerId, ServerEvent, SessionId,
};
use manaduel_store::SessionStore;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::directory::{ConnectionDirectory, EventReceiver};
use crate::invite::{InviteCoordinator, InviteOutcome, RespondOutcome};
use crate::registry::SessionRegistry;
use crate::session::{
    spawn_session, SessionCommand, SessionConfig, SessionInfo,
};

/// A running Manaduel server core.
pub struct GameServer {
    catalog: Arc<CardCatalog>,
    store: Arc<dyn SessionStore>,
    directory: ConnectionDirectory,
    registry: Mutex<SessionRegistry>,
    invites: Mutex<InviteCoordinator>,
    config: SessionConfig,
}

impl GameServer {
    pub fn new(catalog: CardCatalog, store: Arc<dyn SessionStore>) -> Self {
        Self::with_config(catalog, store, SessionConfig::default())
    }

    pub fn with_config(
        catalog: CardCatalog,
        store: Arc<dyn SessionStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            directory: ConnectionDirectory::new(),
            registry: Mutex::new(SessionRegistry::new()),
            invites: Mutex::new(InviteCoordinator::new()),
            config,
        }
    }

    /// Marks a player online and returns their outbound event stream.
    pub fn connect(&self, player: PlayerId) -> EventReceiver {
        self.directory.register(player)
    }

    /// Marks a player offline. Their sessions keep running; resume
    /// commands bring a reconnecting player back up to date.
    pub fn disconnect(&self, player: PlayerId) {
        self.directory.unregister(player);
    }

    /// Dispatches one decoded client command.
    pub async fn handle_command(&self, player: PlayerId, cmd: ClientCommand) {
        match cmd {
            ClientCommand::Invite { target } => {
                self.handle_invite(player, target).await;
            }
            ClientCommand::InviteResponse { from, accept } => {
                self.handle_invite_response(player, from, accept).await;
            }
            ClientCommand::PlayerReady { session_id } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::Ready { player },
                    ServerEvent::InvalidSession,
                )
                .await;
            }
            ClientCommand::JoinRoom { session_id } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::JoinRoom { player },
                    ServerEvent::InvalidSession,
                )
                .await;
            }
            ClientCommand::LeaveRoom { session_id } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::LeaveRoom { player },
                    ServerEvent::InvalidSession,
                )
                .await;
            }
            ClientCommand::DraftPick { session_id, card } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::Pick { player, card },
                    ServerEvent::InvalidSession,
                )
                .await;
            }
            ClientCommand::JoinGame { session_id } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::JoinGame { player },
                    ServerEvent::InvalidGame,
                )
                .await;
            }
            ClientCommand::PlayCard { session_id, card } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::Play { player, card },
                    ServerEvent::InvalidGame,
                )
                .await;
            }
            ClientCommand::EndTurn { session_id } => {
                self.route(
                    player,
                    session_id,
                    SessionCommand::EndTurn { player },
                    ServerEvent::InvalidGame,
                )
                .await;
            }
        }
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        let mut registry = self.registry.lock().await;
        registry.sweep();
        registry.len()
    }

    /// Metadata for a live session. `None` if the session does not
    /// exist or its actor has stopped.
    pub async fn session_info(
        &self,
        session_id: SessionId,
    ) -> Option<SessionInfo> {
        let handle = self.registry.lock().await.get(session_id)?;
        handle.info().await.ok()
    }

    async fn handle_invite(&self, from: PlayerId, target: PlayerId) {
        if from == target {
            debug!(%from, "self-invite ignored");
            return;
        }
        // An offline target was never asked, so this is a delivery
        // failure, not a decline.
        if !self.directory.is_connected(target) {
            self.directory
                .send(from, ServerEvent::InviteFailed { target });
            return;
        }
        match self.invites.lock().await.invite(from, target) {
            InviteOutcome::Delivered => {
                self.directory
                    .send(target, ServerEvent::InviteReceived { from });
            }
            InviteOutcome::Duplicate => {
                debug!(%from, %target, "duplicate invite ignored");
            }
        }
    }

    async fn handle_invite_response(
        &self,
        responder: PlayerId,
        from: PlayerId,
        accept: bool,
    ) {
        let outcome = self.invites.lock().await.respond(responder, from, accept);
        match outcome {
            RespondOutcome::Ignored => {
                debug!(%responder, %from, "response without invite ignored");
            }
            RespondOutcome::Declined => {
                self.directory.send(
                    from,
                    ServerEvent::InviteResponse {
                        from: responder,
                        accept: false,
                    },
                );
            }
            RespondOutcome::Accepted { auto_declined } => {
                for (inviter, target) in auto_declined {
                    self.directory.send(
                        inviter,
                        ServerEvent::InviteResponse {
                            from: target,
                            accept: false,
                        },
                    );
                }
                self.directory.send(
                    from,
                    ServerEvent::InviteResponse {
                        from: responder,
                        accept: true,
                    },
                );
                self.create_session(from, responder).await;
            }
        }
    }

    async fn create_session(&self, player1: PlayerId, player2: PlayerId) {
        let session_id = match self.store.create_session(player1, player2) {
            Ok(id) => id,
            Err(e) => {
                warn!(%player1, %player2, error = %e, "session creation failed");
                let failed = ServerEvent::SessionFailed {
                    message: e.to_string(),
                };
                self.directory.send(player1, failed.clone());
                self.directory.send(player2, failed);
                return;
            }
        };

        let handle = spawn_session(
            session_id,
            [player1, player2],
            Arc::clone(&self.catalog),
            Arc::clone(&self.store),
            self.directory.clone(),
            &self.config,
        );
        let mut registry = self.registry.lock().await;
        registry.sweep();
        registry.insert(handle);
        drop(registry);

        let joined = ServerEvent::SessionJoined { session_id };
        self.directory.send(player1, joined.clone());
        self.directory.send(player2, joined);
    }

    /// Routes a session-scoped command, answering with `missing` when
    /// the session doesn't exist or its actor has stopped.
    async fn route(
        &self,
        player: PlayerId,
        session_id: SessionId,
        cmd: SessionCommand,
        missing: ServerEvent,
    ) {
        let handle = self.registry.lock().await.get(session_id);
        let delivered = match handle {
            Some(handle) => handle.send(cmd).await.is_ok(),
            None => false,
        };
        if !delivered {
            debug!(%player, %session_id, "command for unavailable session");
            self.directory.send(player, missing);
        }
    }
}
