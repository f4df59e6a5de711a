//! Grid/list partitioning of call participants.
//!
//! A [`ParticipantCollection`] splits the roster into a bounded set of video
//! tiles (the grid) and an overflow list. Each roster update produces a new
//! collection from the previous one:
//!
//! 1. Sort the roster by priority (stable) and take the first `capacity`
//!    participants as the target grid membership.
//! 2. Grid occupants still in the target keep their relative order.
//! 3. A slot whose occupant left the call or was pushed out of the target is
//!    vacated. Vacated slots are refilled in ascending index order by the
//!    highest-priority participants not yet on the grid.
//! 4. Vacated slots left once promotions run out close up.
//! 5. Promotions left over once every vacated slot is filled are appended.
//! 6. The list is the rest of the roster in current priority order.
//!
//! Tiles therefore never move because of a ranking change alone.

use crate::observability::record_duplicates_dropped;
use crate::participant::{dedupe_roster, sort_by_priority, Participant};

use common::types::ParticipantId;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Immutable grid/list split of the current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantCollection {
    capacity: usize,
    grid: Vec<Participant>,
    list: Vec<Participant>,
}

impl ParticipantCollection {
    /// Empty collection with room for `capacity` grid tiles.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            grid: Vec::new(),
            list: Vec::new(),
        }
    }

    /// Partition a roster with no prior layout to preserve.
    #[must_use]
    pub fn from_roster(capacity: usize, roster: &[Participant]) -> Self {
        Self::new(capacity).next(roster)
    }

    /// Same layout with a different capacity, applied on the next update.
    #[must_use]
    pub fn with_capacity(&self, capacity: usize) -> Self {
        Self {
            capacity,
            grid: self.grid.clone(),
            list: self.list.clone(),
        }
    }

    /// Compute the partition for a new roster snapshot.
    ///
    /// `roster` must be the complete participant list. Duplicate ids are a
    /// caller bug: debug builds assert, release builds drop them (first
    /// occurrence wins).
    #[must_use]
    pub fn next(&self, roster: &[Participant]) -> Self {
        let (mut sorted, dropped) = dedupe_roster(roster);
        if dropped > 0 {
            warn!(
                target: "roster.grid",
                dropped,
                "Dropped duplicate participant ids from roster"
            );
            record_duplicates_dropped("roster", dropped);
        }
        debug_assert_eq!(dropped, 0, "roster contains duplicate participant ids");

        let roster_len = sorted.len();
        sort_by_priority(&mut sorted);
        let split = self.capacity.min(sorted.len());
        let list = sorted.split_off(split);
        let target = sorted;

        let grid = self.place(&target);

        debug!(
            target: "roster.grid",
            roster = roster_len,
            grid = grid.len(),
            list = list.len(),
            capacity = self.capacity,
            "Partition updated"
        );

        Self {
            capacity: self.capacity,
            grid,
            list,
        }
    }

    /// Lay out `target` over the current grid slots.
    fn place(&self, target: &[Participant]) -> Vec<Participant> {
        let target_by_id: HashMap<ParticipantId, &Participant> =
            target.iter().map(|p| (p.id, p)).collect();

        let retained: HashSet<ParticipantId> = self
            .grid
            .iter()
            .filter(|p| target_by_id.contains_key(&p.id))
            .map(|p| p.id)
            .collect();

        let mut promoted = target.iter().filter(|p| !retained.contains(&p.id));

        let mut grid = Vec::with_capacity(target.len());
        for occupant in &self.grid {
            if let Some(current) = target_by_id.get(&occupant.id) {
                // Fresh stats, same slot.
                grid.push(**current);
            } else if let Some(replacement) = promoted.next() {
                // Vacated slot (departed or demoted) takes the next promotion.
                grid.push(*replacement);
            }
            // No promotion left: the slot closes.
        }
        grid.extend(promoted.copied());

        grid
    }

    /// Maximum number of grid tiles.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Participants with a video tile, in slot order.
    #[must_use]
    pub fn grid(&self) -> &[Participant] {
        &self.grid
    }

    /// Overflow participants, in priority order.
    #[must_use]
    pub fn list(&self) -> &[Participant] {
        &self.list
    }

    /// Every participant: grid first, then list.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.grid.iter().chain(self.list.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grid.len() + self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.list.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants().any(|p| p.id == id)
    }

    /// Slot index of a grid participant.
    #[must_use]
    pub fn grid_position(&self, id: ParticipantId) -> Option<usize> {
        self.grid.iter().position(|p| p.id == id)
    }
}
