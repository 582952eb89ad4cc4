//! Invite matchmaking: who has invited whom, and what accepting does.
//!
//! A player may receive invites from several others at once. Accepting
//! one creates the session and auto-declines every competing invite
//! addressed to either participant; invites the participants had sent
//! to third parties are quietly withdrawn.

use std::collections::HashMap;

use manaduel_protocol::PlayerId;
use tracing::debug;

/// Result of recording an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteOutcome {
    /// New invite; notify the target.
    Delivered,
    /// The same invite is already pending.
    Duplicate,
}

/// Result of answering an invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespondOutcome {
    /// No such pending invite.
    Ignored,
    /// Declined; notify the inviter.
    Declined,
    /// Accepted. `auto_declined` lists `(inviter, target)` pairs for
    /// every competing invite that was dropped; each inviter should be
    /// told their invite was declined.
    Accepted {
        auto_declined: Vec<(PlayerId, PlayerId)>,
    },
}

/// Pending invites, keyed by target. Inviters are kept in arrival
/// order per target.
#[derive(Default)]
pub struct InviteCoordinator {
    pending: HashMap<PlayerId, Vec<PlayerId>>,
}

impl InviteCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an invite from `from` to `target`.
    pub fn invite(&mut self, from: PlayerId, target: PlayerId) -> InviteOutcome {
        let inviters = self.pending.entry(target).or_default();
        if inviters.contains(&from) {
            return InviteOutcome::Duplicate;
        }
        inviters.push(from);
        debug!(%from, %target, "invite recorded");
        InviteOutcome::Delivered
    }

    /// Answers the pending invite from `from` addressed to `responder`.
    pub fn respond(
        &mut self,
        responder: PlayerId,
        from: PlayerId,
        accept: bool,
    ) -> RespondOutcome {
        let Some(inviters) = self.pending.get_mut(&responder) else {
            return RespondOutcome::Ignored;
        };
        let Some(idx) = inviters.iter().position(|p| *p == from) else {
            return RespondOutcome::Ignored;
        };

        if !accept {
            inviters.remove(idx);
            if inviters.is_empty() {
                self.pending.remove(&responder);
            }
            debug!(%responder, %from, "invite declined");
            return RespondOutcome::Declined;
        }

        let mut auto_declined = Vec::new();

        // Competing invites addressed to either participant are
        // declined on their behalf.
        for target in [responder, from] {
            if let Some(inviters) = self.pending.remove(&target) {
                auto_declined.extend(
                    inviters
                        .into_iter()
                        .filter(|inviter| *inviter != from)
                        .map(|inviter| (inviter, target)),
                );
            }
        }

        // Invites the participants sent elsewhere are withdrawn
        // without notification.
        for inviters in self.pending.values_mut() {
            inviters.retain(|p| *p != responder && *p != from);
        }
        self.pending.retain(|_, inviters| !inviters.is_empty());

        debug!(
            %responder, %from,
            declined = auto_declined.len(),
            "invite accepted"
        );
        RespondOutcome::Accepted { auto_declined }
    }
}
