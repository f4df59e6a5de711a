//! Roster replay tool
//!
//! Replays a JSON-lines script of signaling events through a `CallStateActor`
//! and prints every resulting snapshot as one JSON line on stdout.
//!
//! ```text
//! roster-replay <script.jsonl>
//! roster-replay -            # read the script from stdin
//! ```
//!
//! Time only moves on `advance_clock` events, so output is reproducible.
//! Grid capacity and the resolved-request window come from the usual
//! `ROSTER_*` environment variables.

#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use call_roster::actors::{CallStateActor, CallStateSnapshot};
use call_roster::clock::ManualClock;
use call_roster::config::Config;
use call_roster::replay::run_script;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// One stdout line.
#[derive(Serialize)]
struct ReplayRecord<'a> {
    line: usize,
    snapshot: &'a CallStateSnapshot,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_new(&config.observability.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(common::config::DEFAULT_LOG_FILTER));
    if config.observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: roster-replay <script.jsonl | ->");
    };

    info!(
        grid_capacity = config.grid_capacity,
        resolved_window_ms = u64::try_from(config.resolved_window.as_millis()).unwrap_or(u64::MAX),
        script = %path,
        "Starting replay"
    );

    let input: Box<dyn BufRead> = if path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&path).with_context(|| format!("Failed to open {path}"))?;
        Box::new(BufReader::new(file))
    };

    let clock = Arc::new(ManualClock::default());
    let cancel_token = CancellationToken::new();
    let (handle, task) = CallStateActor::spawn(&config, clock.clone(), cancel_token.clone());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error: Option<io::Error> = None;

    let result = run_script(input, &handle, &clock, |line, snapshot| {
        if write_error.is_some() {
            return;
        }
        let record = ReplayRecord { line, snapshot };
        let written = serde_json::to_writer(&mut out, &record)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out));
        if let Err(e) = written {
            write_error = Some(e);
        }
    })
    .await;

    cancel_token.cancel();
    if let Err(e) = task.await {
        error!(error = %e, "Call state actor task failed");
    }

    if let Some(e) = write_error {
        return Err(e).context("Failed to write snapshot");
    }
    let applied = result.context("Replay failed")?;

    info!(events = applied, "Replay complete");
    Ok(())
}
