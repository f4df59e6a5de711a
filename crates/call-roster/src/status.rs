//! One-line call header summary.

use crate::pending::PendingParticipantCollection;

use serde::Serialize;
use std::time::Duration;

/// What the call header shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InCallStatus {
    /// Time since the call connected; `None` before it connects.
    ElapsedTime(Option<Duration>),
    /// Call-link join requests awaiting a decision.
    PendingRequests(usize),
    /// Participants currently in the call link.
    JoinedParticipants(usize),
}

impl InCallStatus {
    /// Derive the header for the current state.
    ///
    /// Ordinary calls show elapsed time. Call links show unresolved join
    /// requests while any exist, and the joined count otherwise.
    #[must_use]
    pub fn derive(
        is_call_link: bool,
        elapsed: Option<Duration>,
        pending: &PendingParticipantCollection,
        joined: usize,
    ) -> Self {
        if !is_call_link {
            return InCallStatus::ElapsedTime(elapsed);
        }

        let unresolved = pending.get_unresolved_pending_participants().len();
        if unresolved > 0 {
            InCallStatus::PendingRequests(unresolved)
        } else {
            InCallStatus::JoinedParticipants(joined)
        }
    }
}
