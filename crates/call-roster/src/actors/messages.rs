//! Message types for the call state actor.
//!
//! Updates are fire-and-forget; the mailbox is processed in order, so a
//! `GetSnapshot` sent after an update observes it.

use crate::grid::ParticipantCollection;
use crate::participant::Participant;
use crate::pending::{PendingEntry, PendingParticipantCollection, PendingRecipient};
use crate::status::InCallStatus;

use common::types::RecipientId;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::oneshot;

/// Messages sent to `CallStateActor`.
#[derive(Debug)]
pub enum CallStateMessage {
    /// Full participant roster from signaling.
    UpdateRoster { roster: Vec<Participant> },

    /// Full "wants to join" roster from signaling.
    UpdateJoinRequests { recipients: Vec<PendingRecipient> },

    /// Moderator approved one request.
    Approve { recipient_id: RecipientId },

    /// Moderator denied one request.
    Deny { recipient_id: RecipientId },

    /// Moderator approved every unresolved request.
    ApproveAll,

    /// Moderator denied every unresolved request.
    DenyAll,

    /// Change the number of grid tiles and re-partition the last roster.
    SetGridCapacity { capacity: usize },

    /// Get the current snapshot.
    GetSnapshot {
        respond_to: oneshot::Sender<CallStateSnapshot>,
    },
}

impl CallStateMessage {
    /// Bounded label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            CallStateMessage::UpdateRoster { .. } => "update_roster",
            CallStateMessage::UpdateJoinRequests { .. } => "update_join_requests",
            CallStateMessage::Approve { .. } => "approve",
            CallStateMessage::Deny { .. } => "deny",
            CallStateMessage::ApproveAll => "approve_all",
            CallStateMessage::DenyAll => "deny_all",
            CallStateMessage::SetGridCapacity { .. } => "set_grid_capacity",
            CallStateMessage::GetSnapshot { .. } => "get_snapshot",
        }
    }
}

/// Fully formed call state published after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallStateSnapshot {
    /// Incremented on every published change. Starts at 0.
    pub generation: u64,
    pub participants: ParticipantCollection,
    pub pending: PendingParticipantCollection,
    /// How long resolved join requests stay visible.
    pub resolved_window: Duration,
}

impl CallStateSnapshot {
    /// Join requests for the waiting-room UI: unresolved ones, plus those
    /// resolved within `resolved_window`.
    #[must_use]
    pub fn visible_pending(&self) -> Vec<&PendingEntry> {
        self.pending
            .get_visible_pending_participants(self.resolved_window)
    }

    /// Call header summary for this snapshot.
    #[must_use]
    pub fn in_call_status(&self, is_call_link: bool, elapsed: Option<Duration>) -> InCallStatus {
        InCallStatus::derive(is_call_link, elapsed, &self.pending, self.participants.len())
    }
}
