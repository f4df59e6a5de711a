//! Call roster error types.
//!
//! The partitioner and the pending registry are total and never fail. Errors
//! come from the actor boundary (mailbox closed, bad capacity) and from the
//! replay tool's script parsing.

use thiserror::Error;

/// Call roster error type.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The call state actor has stopped or dropped the reply channel.
    #[error("Call state actor unavailable: {0}")]
    ActorUnavailable(String),

    /// Grid capacity must allow at least one tile.
    #[error("Invalid grid capacity: {0}")]
    InvalidCapacity(usize),

    /// Replay script line could not be parsed.
    #[error("Replay error at line {line}: {reason}")]
    Replay { line: usize, reason: String },
}
