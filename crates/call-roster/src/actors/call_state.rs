//! `CallStateActor` - single owner of the participant layout and the
//! waiting-room registry for one call.
//!
//! Signaling events arrive through the mailbox and are applied one at a
//! time. Each change replaces the held collections with new values and
//! publishes a [`CallStateSnapshot`] on a watch channel, so readers only ever
//! see complete snapshots.

use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::errors::RosterError;
use crate::grid::ParticipantCollection;
use crate::observability::{
    record_admission_decisions, record_partition_duration, set_partition_sizes,
    set_pending_unresolved,
};
use crate::participant::Participant;
use crate::pending::{AdmissionState, PendingParticipantCollection, PendingRecipient};

use super::messages::{CallStateMessage, CallStateSnapshot};

use common::types::RecipientId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Handle to a `CallStateActor`.
#[derive(Clone)]
pub struct CallStateHandle {
    sender: mpsc::Sender<CallStateMessage>,
    cancel_token: CancellationToken,
    snapshots: watch::Receiver<CallStateSnapshot>,
}

impl CallStateHandle {
    /// Deliver a new participant roster.
    pub async fn update_roster(&self, roster: Vec<Participant>) -> Result<(), RosterError> {
        self.send(CallStateMessage::UpdateRoster { roster }).await
    }

    /// Deliver a new "wants to join" roster.
    pub async fn update_join_requests(
        &self,
        recipients: Vec<PendingRecipient>,
    ) -> Result<(), RosterError> {
        self.send(CallStateMessage::UpdateJoinRequests { recipients })
            .await
    }

    /// Approve one join request.
    pub async fn approve(&self, recipient_id: RecipientId) -> Result<(), RosterError> {
        self.send(CallStateMessage::Approve { recipient_id }).await
    }

    /// Deny one join request.
    pub async fn deny(&self, recipient_id: RecipientId) -> Result<(), RosterError> {
        self.send(CallStateMessage::Deny { recipient_id }).await
    }

    /// Approve every unresolved join request.
    pub async fn approve_all(&self) -> Result<(), RosterError> {
        self.send(CallStateMessage::ApproveAll).await
    }

    /// Deny every unresolved join request.
    pub async fn deny_all(&self) -> Result<(), RosterError> {
        self.send(CallStateMessage::DenyAll).await
    }

    /// Change the number of grid tiles.
    ///
    /// # Errors
    ///
    /// `RosterError::InvalidCapacity` for zero.
    pub async fn set_grid_capacity(&self, capacity: usize) -> Result<(), RosterError> {
        if capacity == 0 {
            return Err(RosterError::InvalidCapacity(capacity));
        }
        self.send(CallStateMessage::SetGridCapacity { capacity })
            .await
    }

    /// Request the snapshot after every message sent so far has been applied.
    pub async fn snapshot(&self) -> Result<CallStateSnapshot, RosterError> {
        let (tx, rx) = oneshot::channel();
        self.send(CallStateMessage::GetSnapshot { respond_to: tx })
            .await?;

        rx.await
            .map_err(|e| RosterError::ActorUnavailable(format!("response receive failed: {e}")))
    }

    /// Latest published snapshot, without waiting for queued messages.
    #[must_use]
    pub fn current(&self) -> CallStateSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CallStateSnapshot> {
        self.snapshots.clone()
    }

    /// Cancel the actor.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Check if the actor is cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    async fn send(&self, message: CallStateMessage) -> Result<(), RosterError> {
        self.sender
            .send(message)
            .await
            .map_err(|e| RosterError::ActorUnavailable(format!("channel send failed: {e}")))
    }
}

/// The `CallStateActor` implementation.
pub struct CallStateActor {
    receiver: mpsc::Receiver<CallStateMessage>,
    cancel_token: CancellationToken,
    participants: ParticipantCollection,
    pending: PendingParticipantCollection,
    /// Last roster received, re-partitioned on capacity changes.
    roster: Vec<Participant>,
    resolved_window: Duration,
    generation: u64,
    publisher: watch::Sender<CallStateSnapshot>,
    messages_processed: u64,
}

impl CallStateActor {
    /// Spawn a call state actor timed by a [`MonotonicClock`] that starts
    /// now.
    pub fn start(
        config: &Config,
        cancel_token: CancellationToken,
    ) -> (CallStateHandle, JoinHandle<()>) {
        Self::spawn(config, Arc::new(MonotonicClock::new()), cancel_token)
    }

    /// Spawn a new call state actor.
    ///
    /// Returns a handle and the task join handle.
    ///
    /// # Arguments
    ///
    /// * `config` - Grid capacity, resolved-request window and mailbox size
    /// * `clock` - Time source for admission state changes
    /// * `cancel_token` - Stops the actor when cancelled
    pub fn spawn(
        config: &Config,
        clock: Arc<dyn Clock>,
        cancel_token: CancellationToken,
    ) -> (CallStateHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(config.mailbox_capacity.max(1));

        let participants = ParticipantCollection::new(config.grid_capacity);
        let pending = PendingParticipantCollection::new(clock);
        let initial = CallStateSnapshot {
            generation: 0,
            participants: participants.clone(),
            pending: pending.clone(),
            resolved_window: config.resolved_window,
        };
        let (publisher, snapshots) = watch::channel(initial);

        let actor = Self {
            receiver,
            cancel_token: cancel_token.clone(),
            participants,
            pending,
            roster: Vec::new(),
            resolved_window: config.resolved_window,
            generation: 0,
            publisher,
            messages_processed: 0,
        };

        let task_handle = tokio::spawn(actor.run());

        let handle = CallStateHandle {
            sender,
            cancel_token,
            snapshots,
        };

        (handle, task_handle)
    }

    /// Run the actor message loop.
    #[instrument(skip_all, name = "roster.actor.call_state", fields(capacity = self.participants.capacity()))]
    async fn run(mut self) {
        info!(target: "roster.actor", "CallStateActor started");

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!(
                        target: "roster.actor",
                        "CallStateActor received cancellation signal"
                    );
                    break;
                }

                msg = self.receiver.recv() => {
                    match msg {
                        Some(message) => {
                            self.handle_message(message);
                            self.messages_processed += 1;
                        }
                        None => {
                            info!(
                                target: "roster.actor",
                                "CallStateActor channel closed, exiting"
                            );
                            break;
                        }
                    }
                }
            }
        }

        info!(
            target: "roster.actor",
            generation = self.generation,
            messages_processed = self.messages_processed,
            "CallStateActor stopped"
        );
    }

    /// Handle a single message.
    fn handle_message(&mut self, message: CallStateMessage) {
        debug!(target: "roster.actor", kind = message.kind(), "Handling message");

        match message {
            CallStateMessage::UpdateRoster { roster } => {
                self.roster = roster;
                self.repartition(self.participants.capacity());
            }

            CallStateMessage::UpdateJoinRequests { recipients } => {
                self.pending = self.pending.with_recipients(&recipients);
                self.publish();
            }

            CallStateMessage::Approve { recipient_id } => {
                let applied = usize::from(self.pending.get(recipient_id).is_some());
                self.pending = self.pending.with_approval(recipient_id);
                self.record_decisions(AdmissionState::Approved, applied);
            }

            CallStateMessage::Deny { recipient_id } => {
                let applied = usize::from(self.pending.get(recipient_id).is_some());
                self.pending = self.pending.with_denial(recipient_id);
                self.record_decisions(AdmissionState::Denied, applied);
            }

            CallStateMessage::ApproveAll => {
                let applied = self.pending.get_unresolved_pending_participants().len();
                self.pending = self.pending.with_all_approved();
                self.record_decisions(AdmissionState::Approved, applied);
            }

            CallStateMessage::DenyAll => {
                let applied = self.pending.get_unresolved_pending_participants().len();
                self.pending = self.pending.with_all_denied();
                self.record_decisions(AdmissionState::Denied, applied);
            }

            CallStateMessage::SetGridCapacity { capacity } => {
                info!(
                    target: "roster.actor",
                    from = self.participants.capacity(),
                    to = capacity,
                    "Grid capacity changed"
                );
                self.repartition(capacity);
            }

            CallStateMessage::GetSnapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
        }
    }

    fn repartition(&mut self, capacity: usize) {
        let started = Instant::now();
        self.participants = self
            .participants
            .with_capacity(capacity)
            .next(&self.roster);
        record_partition_duration(started.elapsed());
        self.publish();
    }

    fn record_decisions(&mut self, decision: AdmissionState, applied: usize) {
        if applied == 0 {
            return;
        }
        info!(
            target: "roster.actor",
            decision = decision.as_str(),
            count = applied,
            "Admission decision applied"
        );
        record_admission_decisions(decision.as_str(), applied);
        self.publish();
    }

    fn snapshot(&self) -> CallStateSnapshot {
        CallStateSnapshot {
            generation: self.generation,
            participants: self.participants.clone(),
            pending: self.pending.clone(),
            resolved_window: self.resolved_window,
        }
    }

    fn publish(&mut self) {
        self.generation += 1;
        set_partition_sizes(self.participants.grid().len(), self.participants.list().len());
        set_pending_unresolved(self.pending.get_unresolved_pending_participants().len());
        self.publisher.send_replace(self.snapshot());
    }
}
