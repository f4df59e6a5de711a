//! Actor owning the call's roster state.
//!
//! One `CallStateActor` per call is the single writer of both collections:
//!
//! ```text
//! signaling ──► CallStateHandle ──mpsc──► CallStateActor
//!                                          ├── ParticipantCollection
//!                                          └── PendingParticipantCollection
//!                                                   │
//! UI readers ◄──────────── watch ◄──── CallStateSnapshot
//! ```
//!
//! # Modules
//!
//! - [`call_state`] - `CallStateActor` and its handle
//! - [`messages`] - Mailbox messages and the published snapshot

pub mod call_state;
pub mod messages;

// Re-export primary types
pub use call_state::{CallStateActor, CallStateHandle};
pub use messages::*;
