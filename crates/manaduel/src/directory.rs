//! Connection directory: who is online, and how to reach them.
//!
//! The transport layer registers a channel per connected player; the
//! session actors push [`ServerEvent`]s through it. A player with no
//! entry is offline, and sends to them are silently dropped — the
//! resume commands exist precisely so a reconnecting player can catch
//! up on what they missed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use manaduel_protocol::{PlayerId, Recipient, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Outbound channel for one player's events.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;
/// The receiving half handed to the player's connection task.
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Shared map from player id to their outbound event channel.
///
/// Cheap to clone; all clones see the same directory.
#[derive(Clone, Default)]
pub struct ConnectionDirectory {
    inner: Arc<Mutex<HashMap<PlayerId, EventSender>>>,
}

impl ConnectionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `player` as connected and returns the receiving half
    /// of their event channel. A re-register (reconnect) replaces the
    /// previous channel; events already queued on the old one are lost.
    pub fn register(&self, player: PlayerId) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let replaced = self.lock().insert(player, tx);
        debug!(%player, reconnect = replaced.is_some(), "player connected");
        rx
    }

    /// Removes `player` from the directory. Idempotent.
    pub fn unregister(&self, player: PlayerId) {
        if self.lock().remove(&player).is_some() {
            debug!(%player, "player disconnected");
        }
    }

    pub fn is_connected(&self, player: PlayerId) -> bool {
        self.lock().contains_key(&player)
    }

    /// Sends one event to one player. Offline or closed receivers are
    /// silently dropped.
    pub fn send(&self, player: PlayerId, event: ServerEvent) {
        let guard = self.lock();
        match guard.get(&player) {
            Some(tx) => {
                let _ = tx.send(event);
            }
            None => trace!(%player, "dropping event for offline player"),
        }
    }

    /// Resolves a [`Recipient`] against a session's two players and
    /// delivers the event to each match.
    pub fn dispatch(
        &self,
        players: [PlayerId; 2],
        recipient: Recipient,
        event: ServerEvent,
    ) {
        match recipient {
            Recipient::All => {
                for player in players {
                    self.send(player, event.clone());
                }
            }
            Recipient::Player(player) => self.send(player, event),
            Recipient::AllExcept(excluded) => {
                for player in players {
                    if player != excluded {
                        self.send(player, event.clone());
                    }
                }
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PlayerId, EventSender>> {
        self.inner.lock().expect("directory lock poisoned")
    }
}
