//! Scripted replay of signaling events against a `CallStateActor`.
//!
//! Scripts are JSON lines, one event per line. Blank lines and lines starting
//! with `#` are skipped:
//!
//! ```text
//! {"event":"roster","participants":[{"id":"00000000-0000-0000-0000-000000000001","last_spoke_at_ms":0,"joined_at_ms":0}]}
//! {"event":"join_requests","recipients":[{"id":"00000000-0000-0000-0000-00000000000a","display_name":"Ann"}]}
//! {"event":"advance_clock","ms":500}
//! {"event":"deny","recipient_id":"00000000-0000-0000-0000-00000000000a"}
//! ```

use crate::actors::{CallStateHandle, CallStateSnapshot};
use crate::clock::ManualClock;
use crate::errors::RosterError;
use crate::participant::Participant;
use crate::pending::PendingRecipient;

use common::types::RecipientId;
use serde::Deserialize;
use std::io::BufRead;
use std::time::Duration;
use tracing::debug;

/// One scripted event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    Roster { participants: Vec<Participant> },
    JoinRequests { recipients: Vec<PendingRecipient> },
    Approve { recipient_id: RecipientId },
    Deny { recipient_id: RecipientId },
    ApproveAll,
    DenyAll,
    SetCapacity { capacity: usize },
    AdvanceClock { ms: u64 },
}

/// Parse one script line. `line` is 1-based and only used for errors.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ReplayEvent>, RosterError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| RosterError::Replay {
            line,
            reason: e.to_string(),
        })
}

/// Feed every event in `input` to the actor.
///
/// `on_snapshot` receives the line number and resulting snapshot for every
/// event that reaches the actor. Clock advances produce no snapshot.
pub async fn run_script<R, F>(
    input: R,
    handle: &CallStateHandle,
    clock: &ManualClock,
    mut on_snapshot: F,
) -> Result<usize, RosterError>
where
    R: BufRead,
    F: FnMut(usize, &CallStateSnapshot),
{
    let mut applied = 0usize;

    for (index, text) in input.lines().enumerate() {
        let line = index + 1;
        let text = text.map_err(|e| RosterError::Replay {
            line,
            reason: e.to_string(),
        })?;

        let Some(event) = parse_line(line, &text)? else {
            continue;
        };
        debug!(target: "roster.replay", line, ?event, "Applying event");

        match event {
            ReplayEvent::AdvanceClock { ms } => {
                clock.advance(Duration::from_millis(ms));
                continue;
            }
            ReplayEvent::Roster { participants } => handle.update_roster(participants).await?,
            ReplayEvent::JoinRequests { recipients } => {
                handle.update_join_requests(recipients).await?;
            }
            ReplayEvent::Approve { recipient_id } => handle.approve(recipient_id).await?,
            ReplayEvent::Deny { recipient_id } => handle.deny(recipient_id).await?,
            ReplayEvent::ApproveAll => handle.approve_all().await?,
            ReplayEvent::DenyAll => handle.deny_all().await?,
            ReplayEvent::SetCapacity { capacity } => handle
                .set_grid_capacity(capacity)
                .await
                .map_err(|e| match e {
                    RosterError::InvalidCapacity(_) => RosterError::Replay {
                        line,
                        reason: e.to_string(),
                    },
                    other => other,
                })?,
        }

        let snapshot = handle.snapshot().await?;
        on_snapshot(line, &snapshot);
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::actors::CallStateActor;
    use crate::config::Config;
    use crate::pending::AdmissionState;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    const SCRIPT: &str = r#"
# two participants, one join request
{"event":"roster","participants":[{"id":"00000000-0000-0000-0000-000000000001","last_spoke_at_ms":0,"joined_at_ms":5},{"id":"00000000-0000-0000-0000-000000000002","last_spoke_at_ms":0,"joined_at_ms":1}]}
{"event":"join_requests","recipients":[{"id":"00000000-0000-0000-0000-00000000000a","display_name":"Ann"}]}
{"event":"advance_clock","ms":500}
{"event":"deny","recipient_id":"00000000-0000-0000-0000-00000000000a"}
"#;

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert_eq!(parse_line(1, "   ").unwrap(), None);
        assert_eq!(parse_line(2, "# note").unwrap(), None);
    }

    #[test]
    fn test_parse_line_reads_unit_events() {
        assert_eq!(
            parse_line(1, r#"{"event":"approve_all"}"#).unwrap(),
            Some(ReplayEvent::ApproveAll)
        );
        assert_eq!(
            parse_line(1, r#"{"event":"set_capacity","capacity":4}"#).unwrap(),
            Some(ReplayEvent::SetCapacity { capacity: 4 })
        );
    }

    #[test]
    fn test_parse_line_reports_line_number() {
        let err = parse_line(7, r#"{"event":"teleport"}"#).unwrap_err();
        assert!(matches!(err, RosterError::Replay { line: 7, .. }));
    }

    #[tokio::test]
    async fn test_run_script_drives_actor() {
        let clock = Arc::new(ManualClock::default());
        let (handle, _task) =
            CallStateActor::spawn(&Config::default(), clock.clone(), CancellationToken::new());

        let mut lines = Vec::new();
        let applied = run_script(SCRIPT.as_bytes(), &handle, &clock, |line, _| lines.push(line))
            .await
            .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(lines, vec![3, 4, 6]);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.participants.grid()[0].id.as_u128(), 2);
        let entry = snapshot.pending.get(RecipientId::from_u128(10)).unwrap();
        assert_eq!(entry.state, AdmissionState::Denied);
        assert_eq!(entry.state_change_at, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_run_script_stops_at_bad_line() {
        let clock = Arc::new(ManualClock::default());
        let (handle, _task) =
            CallStateActor::spawn(&Config::default(), clock.clone(), CancellationToken::new());

        let script = "{\"event\":\"approve_all\"}\nnot json\n";
        let err = run_script(script.as_bytes(), &handle, &clock, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::Replay { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_run_script_reports_zero_capacity_line() {
        let clock = Arc::new(ManualClock::default());
        let (handle, _task) =
            CallStateActor::spawn(&Config::default(), clock.clone(), CancellationToken::new());

        let script = "# resize\n{\"event\":\"set_capacity\",\"capacity\":0}\n";
        let err = run_script(script.as_bytes(), &handle, &clock, |_, _| {})
            .await
            .unwrap_err();

        assert!(
            matches!(
                &err,
                RosterError::Replay { line: 2, reason } if reason.contains("Invalid grid capacity")
            ),
            "unexpected error: {err}"
        );
    }
}
