//! # Roster Test Utilities
//!
//! Shared test utilities for the call roster.
//!
//! This crate provides:
//! - Fixed participant and recipient IDs
//! - Participant and roster builders
//! - A strictly increasing fake clock (`TickingClock`)
//! - Custom assertions (`PartitionAssertions`, `PendingAssertions`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roster_test_utils::*;
//!
//! #[test]
//! fn test_example() {
//!     let roster = RosterBuilder::new()
//!         .participant(1, 1, 4)
//!         .participant(2, 1, 2)
//!         .build();
//!
//!     ParticipantCollection::from_roster(3, &roster)
//!         .assert_grid_ids(&[2, 1])
//!         .assert_partition_of(&roster);
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod test_ids;
pub mod ticking_clock;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use test_ids::*;
pub use ticking_clock::*;
