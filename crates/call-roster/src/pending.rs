//! Waiting-room state for users asking to join a moderated call link.
//!
//! Each recipient moves through a small state machine:
//!
//! ```text
//!            with_recipients              with_approval
//!   (new) ------------------> Pending ------------------> Approved
//!                              |   ^
//!                  with_denial |   | with_recipients (denial_count kept)
//!                              v   |
//!                              Denied
//! ```
//!
//! A `Pending` entry disappears when its recipient is missing from the next
//! `with_recipients` roster. `Approved` and `Denied` entries are kept;
//! [`PendingParticipantCollection::get_all_pending_participants`] hides the
//! ones resolved before its `since` bound.

use crate::clock::Clock;
use crate::observability::record_duplicates_dropped;

use common::types::RecipientId;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Admission state of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionState {
    Pending,
    Approved,
    Denied,
}

impl AdmissionState {
    /// Label value used in logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionState::Pending => "pending",
            AdmissionState::Approved => "approved",
            AdmissionState::Denied => "denied",
        }
    }
}

/// A user in the "wants to join" roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecipient {
    pub id: RecipientId,
    pub display_name: String,
}

impl PendingRecipient {
    #[must_use]
    pub fn new(id: RecipientId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Tracked join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEntry {
    /// Recipient as seen when the entry last entered `Pending`.
    pub recipient: PendingRecipient,
    pub state: AdmissionState,
    /// Clock reading at the last state change.
    pub state_change_at: Duration,
    /// Number of denials so far. Never decreases.
    pub denial_count: u32,
}

impl PendingEntry {
    fn pending(recipient: PendingRecipient, now: Duration, denial_count: u32) -> Self {
        Self {
            recipient,
            state: AdmissionState::Pending,
            state_change_at: now,
            denial_count,
        }
    }

    #[must_use]
    pub fn recipient_id(&self) -> RecipientId {
        self.recipient.id
    }

    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.state == AdmissionState::Pending
    }
}

/// Immutable registry of join requests, keyed by recipient.
///
/// Every update returns a new collection; the receiver is left untouched.
#[derive(Clone)]
pub struct PendingParticipantCollection {
    clock: Arc<dyn Clock>,
    /// At most one entry per recipient, in first-request order.
    entries: Vec<PendingEntry>,
}

impl PendingParticipantCollection {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Vec::new(),
        }
    }

    fn with_entries(&self, entries: Vec<PendingEntry>) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            entries,
        }
    }

    /// Apply the current "wants to join" roster.
    ///
    /// - New recipients become `Pending` with `denial_count = 0`.
    /// - `Denied` recipients become `Pending` again, keeping `denial_count`.
    /// - `Pending` and `Approved` recipients are left as they are.
    /// - `Pending` entries missing from `recipients` are removed.
    ///
    /// Duplicate ids are a caller bug: debug builds assert, release builds
    /// keep the first occurrence.
    #[must_use]
    pub fn with_recipients(&self, recipients: &[PendingRecipient]) -> Self {
        let now = self.clock.now();

        let mut seen = HashSet::with_capacity(recipients.len());
        let unique: Vec<&PendingRecipient> =
            recipients.iter().filter(|r| seen.insert(r.id)).collect();
        let dropped = recipients.len() - unique.len();
        if dropped > 0 {
            warn!(
                target: "roster.pending",
                dropped,
                "Dropped duplicate recipient ids from join requests"
            );
            record_duplicates_dropped("join_requests", dropped);
        }
        debug_assert_eq!(dropped, 0, "join requests contain duplicate recipient ids");

        let mut entries: Vec<PendingEntry> = self
            .entries
            .iter()
            .filter(|e| !e.is_unresolved() || seen.contains(&e.recipient_id()))
            .cloned()
            .collect();
        let withdrawn = self.entries.len() - entries.len();

        let mut added = 0usize;
        let mut retried = 0usize;
        for recipient in unique {
            match entries.iter_mut().find(|e| e.recipient_id() == recipient.id) {
                None => {
                    entries.push(PendingEntry::pending(recipient.clone(), now, 0));
                    added += 1;
                }
                Some(entry) if entry.state == AdmissionState::Denied => {
                    *entry = PendingEntry::pending(recipient.clone(), now, entry.denial_count);
                    retried += 1;
                }
                Some(_) => {}
            }
        }

        if added + retried + withdrawn > 0 {
            debug!(
                target: "roster.pending",
                added,
                retried,
                withdrawn,
                "Join requests updated"
            );
        }

        self.with_entries(entries)
    }

    /// Mark a recipient as approved.
    ///
    /// No-op when the recipient has no entry.
    #[must_use]
    pub fn with_approval(&self, id: RecipientId) -> Self {
        self.with_decision(id, AdmissionState::Approved)
    }

    /// Mark a recipient as denied and bump its denial count.
    ///
    /// No-op when the recipient has no entry.
    #[must_use]
    pub fn with_denial(&self, id: RecipientId) -> Self {
        self.with_decision(id, AdmissionState::Denied)
    }

    /// Approve every unresolved request with a single timestamp.
    #[must_use]
    pub fn with_all_approved(&self) -> Self {
        self.with_bulk_decision(AdmissionState::Approved)
    }

    /// Deny every unresolved request with a single timestamp.
    #[must_use]
    pub fn with_all_denied(&self) -> Self {
        self.with_bulk_decision(AdmissionState::Denied)
    }

    fn with_decision(&self, id: RecipientId, decision: AdmissionState) -> Self {
        if self.get(id).is_none() {
            debug!(
                target: "roster.pending",
                recipient_id = %id,
                decision = decision.as_str(),
                "Decision for unknown recipient ignored"
            );
            return self.clone();
        }

        let now = self.clock.now();
        let entries = self
            .entries
            .iter()
            .map(|e| {
                if e.recipient_id() == id {
                    decide(e, decision, now)
                } else {
                    e.clone()
                }
            })
            .collect();

        self.with_entries(entries)
    }

    fn with_bulk_decision(&self, decision: AdmissionState) -> Self {
        let now = self.clock.now();
        let entries = self
            .entries
            .iter()
            .map(|e| {
                if e.is_unresolved() {
                    decide(e, decision, now)
                } else {
                    e.clone()
                }
            })
            .collect();

        self.with_entries(entries)
    }

    /// Entries still awaiting a decision.
    #[must_use]
    pub fn get_unresolved_pending_participants(&self) -> Vec<&PendingEntry> {
        self.entries.iter().filter(|e| e.is_unresolved()).collect()
    }

    /// Unresolved entries plus any entry whose state changed at or after `since`.
    #[must_use]
    pub fn get_all_pending_participants(&self, since: Duration) -> Vec<&PendingEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_unresolved() || e.state_change_at >= since)
            .collect()
    }

    /// [`Self::get_all_pending_participants`] over a trailing window ending now.
    #[must_use]
    pub fn get_visible_pending_participants(&self, window: Duration) -> Vec<&PendingEntry> {
        let since = self.clock.now().saturating_sub(window);
        self.get_all_pending_participants(since)
    }

    #[must_use]
    pub fn get(&self, id: RecipientId) -> Option<&PendingEntry> {
        self.entries.iter().find(|e| e.recipient_id() == id)
    }

    /// All tracked entries, in first-request order.
    #[must_use]
    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decide(entry: &PendingEntry, decision: AdmissionState, now: Duration) -> PendingEntry {
    let denial_count = if decision == AdmissionState::Denied {
        entry.denial_count.saturating_add(1)
    } else {
        entry.denial_count
    };

    PendingEntry {
        recipient: entry.recipient.clone(),
        state: decision,
        state_change_at: now,
        denial_count,
    }
}

impl PartialEq for PendingParticipantCollection {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for PendingParticipantCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingParticipantCollection")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Serialize for PendingParticipantCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}
