//! # Manaduel
//!
//! Session server for a real-time two-player card battler: invite
//! matchmaking, an alternating-pick draft, and a battle loop with
//! simultaneous reveal, per-turn deadlines, and reconnect support.
//!
//! The crate is transport-agnostic. A host process decodes client
//! messages however it likes (the JSON codec in `manaduel-protocol`
//! matches the browser client), then drives [`GameServer`]:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use manaduel::GameServer;
//! use manaduel_protocol::{CardCatalog, ClientCommand, PlayerId};
//! use manaduel_store::MemoryStore;
//!
//! # async fn demo(catalog: CardCatalog) {
//! let server = GameServer::new(catalog, Arc::new(MemoryStore::new()));
//!
//! let mut events = server.connect(PlayerId(1));
//! server
//!     .handle_command(PlayerId(1), ClientCommand::Invite { target: PlayerId(2) })
//!     .await;
//! // pump `events` out to the player's connection...
//! # }
//! ```

use tracing_subscriber::EnvFilter;

mod directory;
mod error;
mod invite;
mod registry;
mod server;
mod session;

/// Installs a global tracing subscriber configured from `RUST_LOG`
/// (default level `info`). Call once from the host binary; does
/// nothing if a subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub use directory::{ConnectionDirectory, EventReceiver, EventSender};
pub use error::ServerError;
pub use invite::{InviteCoordinator, InviteOutcome, RespondOutcome};
pub use registry::SessionRegistry;
pub use server::GameServer;
pub use session::{SessionConfig, SessionHandle, SessionInfo};
