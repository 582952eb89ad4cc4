//! Per-session turn deadline for Manaduel.
//!
//! A [`TurnClock`] owns at most one outstanding deadline at a time.
//! Arming it replaces any previous deadline, so duplicate firings are
//! impossible by construction — the invariant the draft and battle
//! loops rely on ("at most one timer is ever live per session").
//!
//! # Integration
//!
//! The clock is designed to sit inside a session actor's
//! `tokio::select!` loop. While unarmed it pends forever, which is the
//! correct behavior between turns:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle player actions */ }
//!         expiry = clock.expired() => {
//!             // force-end expiry.holder's turn
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Returned when a deadline fires: whose turn ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry<T> {
    /// The actor that failed to act in time.
    pub holder: T,
}

/// A single cancellable, re-armable deadline.
///
/// `T` identifies whoever holds the current turn (a player id in
/// practice); the clock itself doesn't interpret it.
pub struct TurnClock<T> {
    turn_duration: Duration,
    deadline: Option<(T, Instant)>,
}

impl<T: Copy + std::fmt::Debug> TurnClock<T> {
    /// Creates an unarmed clock with the given per-turn duration.
    pub fn new(turn_duration: Duration) -> Self {
        Self {
            turn_duration,
            deadline: None,
        }
    }

    /// Arms the deadline for `holder`, replacing any previous deadline.
    pub fn arm(&mut self, holder: T) {
        let at = Instant::now() + self.turn_duration;
        if self.deadline.is_some() {
            trace!(?holder, "re-arming turn deadline (previous cancelled)");
        }
        self.deadline = Some((holder, at));
        debug!(?holder, secs = self.turn_duration.as_secs(), "turn deadline armed");
    }

    /// Cancels the outstanding deadline, if any. Idempotent.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("turn deadline cancelled");
        }
    }

    /// Whether a deadline is currently armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whose deadline is armed, if any.
    pub fn holder(&self) -> Option<T> {
        self.deadline.map(|(holder, _)| holder)
    }

    /// The configured per-turn duration.
    pub fn turn_duration(&self) -> Duration {
        self.turn_duration
    }

    /// Waits until the armed deadline passes, then disarms and returns
    /// the expired holder.
    ///
    /// While unarmed this future pends forever; `tokio::select!` keeps
    /// processing the other branches. The clock disarms itself on fire,
    /// so a stale deadline can never fire twice.
    pub async fn expired(&mut self) -> Expiry<T> {
        let (holder, at) = match self.deadline {
            Some(deadline) => deadline,
            None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(at).await;
        self.deadline = None;
        debug!(?holder, "turn deadline expired");
        Expiry { holder }
    }
}
