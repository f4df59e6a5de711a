//! Builders for rosters and join requests.

use call_roster::participant::Participant;
use call_roster::pending::PendingRecipient;

use crate::test_ids::{pid, rid};

/// Builds an ordered roster snapshot.
///
/// Entries keep the order they were added in, which is the tiebreak for
/// participants with identical timestamps.
#[derive(Debug, Default, Clone)]
pub struct RosterBuilder {
    participants: Vec<Participant>,
}

impl RosterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster of `count` participants (IDs `1..=count`) with identical stats.
    #[must_use]
    pub fn tied(count: u128) -> Self {
        (1..=count).fold(Self::new(), |builder, n| builder.participant(n, 0, 0))
    }

    /// Add a participant by small-integer ID.
    #[must_use]
    pub fn participant(mut self, id: u128, last_spoke_at_ms: u64, joined_at_ms: u64) -> Self {
        self.participants
            .push(Participant::new(pid(id), last_spoke_at_ms, joined_at_ms));
        self
    }

    /// Drop a participant, as if they left the call.
    #[must_use]
    pub fn without(mut self, id: u128) -> Self {
        self.participants.retain(|p| p.id != pid(id));
        self
    }

    /// Record that a participant just spoke.
    #[must_use]
    pub fn spoke(mut self, id: u128, at_ms: u64) -> Self {
        for p in &mut self.participants {
            if p.id == pid(id) {
                p.last_spoke_at_ms = at_ms;
            }
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<Participant> {
        self.participants
    }
}

/// Join request for a small-integer recipient ID.
#[must_use]
pub fn recipient(id: u128) -> PendingRecipient {
    PendingRecipient::new(rid(id), format!("Requester {id}"))
}

/// Join requests for several small-integer recipient IDs.
#[must_use]
pub fn recipients(ids: &[u128]) -> Vec<PendingRecipient> {
    ids.iter().copied().map(recipient).collect()
}

/// IDs of participants, as integers.
#[must_use]
pub fn ids(participants: &[Participant]) -> Vec<u128> {
    participants.iter().map(|p| p.id.as_u128()).collect()
}
