//! Call participant records and the priority ordering shared by layout code.

use common::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// One participant as reported by the signaling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identity across roster updates.
    pub id: ParticipantId,
    /// When speech was last detected, in milliseconds. Non-decreasing while present.
    pub last_spoke_at_ms: u64,
    /// When the participant first appeared, in milliseconds.
    pub joined_at_ms: u64,
}

impl Participant {
    #[must_use]
    pub fn new(id: ParticipantId, last_spoke_at_ms: u64, joined_at_ms: u64) -> Self {
        Self {
            id,
            last_spoke_at_ms,
            joined_at_ms,
        }
    }

    /// Whether `other` describes the same participant, regardless of stats.
    #[must_use]
    pub fn same_participant(&self, other: &Participant) -> bool {
        self.id == other.id
    }
}

/// Priority ordering: most recent speaker first, then earliest joiner.
///
/// Exact ties compare `Equal`; callers rely on a stable sort to keep roster
/// order among them.
#[must_use]
pub fn compare_priority(a: &Participant, b: &Participant) -> Ordering {
    b.last_spoke_at_ms
        .cmp(&a.last_spoke_at_ms)
        .then_with(|| a.joined_at_ms.cmp(&b.joined_at_ms))
}

/// Stable sort by [`compare_priority`].
pub fn sort_by_priority(participants: &mut [Participant]) {
    // slice::sort_by is stable
    participants.sort_by(compare_priority);
}

/// Drop repeated ids, keeping the first occurrence.
///
/// Returns the de-duplicated roster and how many records were dropped.
#[must_use]
pub fn dedupe_roster(roster: &[Participant]) -> (Vec<Participant>, usize) {
    let mut seen = HashSet::with_capacity(roster.len());
    let unique: Vec<Participant> = roster
        .iter()
        .filter(|p| seen.insert(p.id))
        .copied()
        .collect();
    let dropped = roster.len() - unique.len();
    (unique, dropped)
}
