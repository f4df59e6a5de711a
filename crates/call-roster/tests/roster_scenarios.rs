//! End-to-end scenarios for grid placement and join-request admission.
//!
//! Admission scenarios run on a `TickingClock`, so the N-th clock read in a
//! test returns N-1 milliseconds.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use call_roster::grid::ParticipantCollection;
use call_roster::pending::{AdmissionState, PendingParticipantCollection};
use roster_test_utils::*;

const CAPACITY: usize = 3;

// ============================================================================
// Grid placement
// ============================================================================

fn first_roster() -> Vec<call_roster::participant::Participant> {
    RosterBuilder::new()
        .participant(1, 1, 4)
        .participant(2, 1, 2)
        .participant(3, 1, 3)
        .build()
}

#[test]
fn test_first_roster_sorts_ties_by_join_time() {
    let roster = first_roster();

    ParticipantCollection::new(CAPACITY)
        .next(&roster)
        .assert_grid_ids(&[2, 3, 1])
        .assert_list_ids(&[])
        .assert_partition_of(&roster);
}

#[test]
fn test_fourth_participant_from_empty_grid() {
    let roster = RosterBuilder::new()
        .participant(1, 1, 2)
        .participant(2, 1, 1)
        .participant(3, 1, 4)
        .participant(4, 1, 0)
        .build();

    ParticipantCollection::new(CAPACITY)
        .next(&roster)
        .assert_grid_ids(&[4, 2, 1])
        .assert_list_ids(&[3])
        .assert_partition_of(&roster);
}

#[test]
fn test_fourth_participant_replaces_demoted_tile_in_place() {
    let first = ParticipantCollection::new(CAPACITY).next(&first_roster());

    let roster = RosterBuilder::new()
        .participant(1, 1, 2)
        .participant(2, 1, 1)
        .participant(3, 1, 4)
        .participant(4, 1, 0)
        .build();

    // 3 falls out of the top three; 4 takes its slot while 2 and 1 stay put
    first
        .next(&roster)
        .assert_grid_ids(&[2, 4, 1])
        .assert_list_ids(&[3])
        .assert_partition_of(&roster);
}

#[test]
fn test_departure_keeps_previous_grid_order() {
    let previous = ParticipantCollection::new(CAPACITY).next(&RosterBuilder::tied(3).build());
    previous.assert_grid_ids(&[1, 2, 3]);

    // New input order is reversed; the grid still follows its own order
    let roster = RosterBuilder::new()
        .participant(3, 0, 0)
        .participant(2, 0, 0)
        .build();

    previous
        .next(&roster)
        .assert_grid_ids(&[2, 3])
        .assert_list_ids(&[])
        .assert_partition_of(&roster);
}

#[test]
fn test_speaker_in_list_is_promoted_into_departed_slot() {
    let roster = RosterBuilder::tied(5).build();
    let previous = ParticipantCollection::new(CAPACITY).next(&roster);
    previous.assert_grid_ids(&[1, 2, 3]).assert_list_ids(&[4, 5]);

    let roster = RosterBuilder::tied(5).without(2).spoke(5, 10).build();

    // 2 left from the middle slot; 5 takes it and 3 stays put
    previous
        .next(&roster)
        .assert_grid_ids(&[1, 5, 3])
        .assert_list_ids(&[4])
        .assert_partition_of(&roster);
}

#[test]
fn test_list_follows_current_priority() {
    let roster = RosterBuilder::tied(5).build();
    let previous = ParticipantCollection::new(2).next(&roster);
    previous.assert_list_ids(&[3, 4, 5]);

    // 5 speaks and enters the grid; 4 spoke earlier and now leads the list
    let roster = RosterBuilder::tied(5).spoke(4, 5).spoke(5, 10).build();

    previous
        .next(&roster)
        .assert_grid_ids(&[5, 4])
        .assert_list_ids(&[1, 2, 3])
        .assert_partition_of(&roster);
}

#[test]
fn test_unchanged_roster_is_stable() {
    let roster = RosterBuilder::tied(6).spoke(6, 3).build();
    let first = ParticipantCollection::new(CAPACITY).next(&roster);
    let second = first.next(&roster);

    assert_eq!(first, second);
}

// ============================================================================
// Join-request admission
// ============================================================================

const A: u128 = 100;
const B: u128 = 101;

#[test]
fn test_admission_deny_then_retry() {
    let clock = Arc::new(TickingClock::new());
    let empty = PendingParticipantCollection::new(clock.clone());

    // Both requests share the single read made by the update
    let requested = empty.with_recipients(&recipients(&[A, B]));
    requested
        .assert_unresolved_ids(&[A, B])
        .assert_state(A, AdmissionState::Pending)
        .assert_changed_at(A, 0)
        .assert_state(B, AdmissionState::Pending)
        .assert_changed_at(B, 0);

    let denied = requested.with_denial(rid(A));
    denied
        .assert_state(A, AdmissionState::Denied)
        .assert_changed_at(A, 1)
        .assert_denial_count(A, 1)
        .assert_all_since_ids(0, &[A, B])
        .assert_all_since_ids(2, &[B]);

    // B withdrew; A asked again
    let retried = denied.with_recipients(&recipients(&[A]));
    retried
        .assert_state(A, AdmissionState::Pending)
        .assert_changed_at(A, 2)
        .assert_denial_count(A, 1)
        .assert_untracked(B)
        .assert_unresolved_ids(&[A]);

    assert_eq!(clock.reads(), 3);

    // Earlier values are untouched
    requested.assert_state(A, AdmissionState::Pending);
    denied.assert_state(B, AdmissionState::Pending);
}

#[test]
fn test_approved_requester_survives_roster_churn() {
    let clock = Arc::new(TickingClock::new());
    let registry = PendingParticipantCollection::new(clock)
        .with_recipients(&recipients(&[A, B]))
        .with_approval(rid(A))
        .with_recipients(&[]);

    registry
        .assert_state(A, AdmissionState::Approved)
        .assert_changed_at(A, 1)
        .assert_denial_count(A, 0)
        .assert_untracked(B)
        .assert_unresolved_ids(&[]);

    // Approved entries ignore new requests
    registry
        .with_recipients(&recipients(&[A]))
        .assert_state(A, AdmissionState::Approved)
        .assert_changed_at(A, 1);
}

#[test]
fn test_decision_for_unknown_recipient_reads_no_time() {
    let clock = Arc::new(TickingClock::new());
    let registry = PendingParticipantCollection::new(clock.clone())
        .with_recipients(&recipients(&[A]));

    let after = registry.with_approval(rid(B)).with_denial(rid(B));

    assert_eq!(after, registry);
    assert_eq!(clock.reads(), 1);
}

#[test]
fn test_repeated_denials_accumulate() {
    let clock = Arc::new(TickingClock::new());
    let mut registry = PendingParticipantCollection::new(clock);

    for _ in 0..3 {
        registry = registry
            .with_recipients(&recipients(&[A]))
            .with_denial(rid(A));
    }

    registry
        .assert_state(A, AdmissionState::Denied)
        .assert_denial_count(A, 3)
        .assert_changed_at(A, 5);
}

#[test]
fn test_bulk_decisions_only_touch_unresolved() {
    let clock = Arc::new(TickingClock::new());
    let registry = PendingParticipantCollection::new(clock)
        .with_recipients(&recipients(&[A, B]))
        .with_approval(rid(A))
        .with_all_denied();

    registry
        .assert_state(A, AdmissionState::Approved)
        .assert_changed_at(A, 1)
        .assert_state(B, AdmissionState::Denied)
        .assert_changed_at(B, 2)
        .assert_denial_count(B, 1);
}
