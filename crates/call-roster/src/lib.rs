//! Call Roster Library
//!
//! Participant visibility and admission control for a multi-party call:
//!
//! - Which participants get a video tile (grid) and which overflow into a
//!   compact list, keeping tiles in place across updates
//! - Waiting-room state for users asking to join a moderated call link
//!   (pending, approved, denied)
//!
//! # Architecture
//!
//! Both collections are immutable values. Every update returns a new value
//! and leaves the previous one untouched:
//!
//! ```text
//! ParticipantCollection::next(roster)          -> ParticipantCollection
//! PendingParticipantCollection::with_*(...)    -> PendingParticipantCollection
//! ```
//!
//! A single `CallStateActor` per call threads signaling events through them
//! and publishes complete snapshots to readers.
//!
//! # Modules
//!
//! - [`actors`] - Single-writer call state owner
//! - [`clock`] - Injectable time source
//! - [`config`] - Configuration from environment
//! - [`errors`] - Error types
//! - [`grid`] - Grid/list partitioning
//! - [`participant`] - Participant records and priority ordering
//! - [`pending`] - Join request registry
//! - [`replay`] - Scripted event replay
//! - [`status`] - Call header summary

pub mod actors;
pub mod clock;
pub mod config;
pub mod errors;
pub mod grid;
pub mod observability;
pub mod participant;
pub mod pending;
pub mod replay;
pub mod status;
