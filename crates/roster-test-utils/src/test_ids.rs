//! Fixed test IDs for deterministic tests
//!
//! Participant fixtures use small integers so assertions can compare against
//! plain `u128` lists.

use common::types::{ParticipantId, RecipientId};

/// Participant ID for a small integer.
#[must_use]
pub const fn pid(n: u128) -> ParticipantId {
    ParticipantId::from_u128(n)
}

/// Recipient ID for a small integer.
#[must_use]
pub const fn rid(n: u128) -> RecipientId {
    RecipientId::from_u128(n)
}
