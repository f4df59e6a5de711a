//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for partitions and join-request state.

use std::collections::HashSet;
use std::time::Duration;

use call_roster::grid::ParticipantCollection;
use call_roster::participant::Participant;
use call_roster::pending::{AdmissionState, PendingParticipantCollection};
use common::types::ParticipantId;

use crate::fixtures::ids;
use crate::test_ids::rid;

/// Custom assertions for grid/list partitions
///
/// # Example
/// ```rust,ignore
/// partition
///     .assert_grid_ids(&[2, 3, 1])
///     .assert_list_ids(&[])
///     .assert_partition_of(&roster);
/// ```
pub trait PartitionAssertions {
    /// Assert the grid holds exactly these IDs, in slot order
    fn assert_grid_ids(&self, expected: &[u128]) -> &Self;

    /// Assert the list holds exactly these IDs, in display order
    fn assert_list_ids(&self, expected: &[u128]) -> &Self;

    /// Assert the partition is a complete, non-overlapping split of `roster`
    /// with a full grid
    fn assert_partition_of(&self, roster: &[Participant]) -> &Self;
}

impl PartitionAssertions for ParticipantCollection {
    fn assert_grid_ids(&self, expected: &[u128]) -> &Self {
        assert_eq!(ids(self.grid()), expected, "unexpected grid order");
        self
    }

    fn assert_list_ids(&self, expected: &[u128]) -> &Self {
        assert_eq!(ids(self.list()), expected, "unexpected list order");
        self
    }

    fn assert_partition_of(&self, roster: &[Participant]) -> &Self {
        let roster_ids: HashSet<ParticipantId> = roster.iter().map(|p| p.id).collect();

        assert_eq!(
            self.grid().len(),
            self.capacity().min(roster_ids.len()),
            "grid must fill min(capacity, roster) slots"
        );

        let mut seen = HashSet::new();
        for p in self.participants() {
            assert!(seen.insert(p.id), "{} appears more than once", p.id);
            assert!(roster_ids.contains(&p.id), "{} is not in the roster", p.id);
        }
        assert_eq!(seen, roster_ids, "participants were dropped");

        self
    }
}

/// Custom assertions for join-request registries
///
/// # Example
/// ```rust,ignore
/// registry
///     .assert_state(100, AdmissionState::Denied)
///     .assert_denial_count(100, 1);
/// ```
pub trait PendingAssertions {
    /// Assert the recipient is tracked in `state`
    fn assert_state(&self, id: u128, state: AdmissionState) -> &Self;

    /// Assert the recipient's last transition happened at `at_ms`
    fn assert_changed_at(&self, id: u128, at_ms: u64) -> &Self;

    /// Assert the recipient has been denied `count` times
    fn assert_denial_count(&self, id: u128, count: u32) -> &Self;

    /// Assert the recipient is not tracked at all
    fn assert_untracked(&self, id: u128) -> &Self;

    /// Assert the unresolved query returns exactly these IDs, in order
    fn assert_unresolved_ids(&self, expected: &[u128]) -> &Self;

    /// Assert the windowed query returns exactly these IDs, in order
    fn assert_all_since_ids(&self, since_ms: u64, expected: &[u128]) -> &Self;
}

impl PendingAssertions for PendingParticipantCollection {
    fn assert_state(&self, id: u128, state: AdmissionState) -> &Self {
        let entry = self
            .get(rid(id))
            .unwrap_or_else(|| panic!("recipient {id} is not tracked"));
        assert_eq!(entry.state, state, "unexpected state for recipient {id}");
        self
    }

    fn assert_changed_at(&self, id: u128, at_ms: u64) -> &Self {
        let entry = self
            .get(rid(id))
            .unwrap_or_else(|| panic!("recipient {id} is not tracked"));
        assert_eq!(
            entry.state_change_at,
            Duration::from_millis(at_ms),
            "unexpected state change time for recipient {id}"
        );
        self
    }

    fn assert_denial_count(&self, id: u128, count: u32) -> &Self {
        let entry = self
            .get(rid(id))
            .unwrap_or_else(|| panic!("recipient {id} is not tracked"));
        assert_eq!(
            entry.denial_count, count,
            "unexpected denial count for recipient {id}"
        );
        self
    }

    fn assert_untracked(&self, id: u128) -> &Self {
        assert!(
            self.get(rid(id)).is_none(),
            "recipient {id} should not be tracked"
        );
        self
    }

    fn assert_unresolved_ids(&self, expected: &[u128]) -> &Self {
        let actual: Vec<u128> = self
            .get_unresolved_pending_participants()
            .iter()
            .map(|e| e.recipient_id().as_u128())
            .collect();
        assert_eq!(actual, expected, "unexpected unresolved requests");
        self
    }

    fn assert_all_since_ids(&self, since_ms: u64, expected: &[u128]) -> &Self {
        let actual: Vec<u128> = self
            .get_all_pending_participants(Duration::from_millis(since_ms))
            .iter()
            .map(|e| e.recipient_id().as_u128())
            .collect();
        assert_eq!(actual, expected, "unexpected requests since {since_ms}ms");
        self
    }
}
