//! Headless replay of a scripted gesture session
//!
//! Each line of the script is one JSON step:
//!
//! ```text
//! {"at_ms": 0,   "op": "input", "event": {"type": "touch_start", "y": 100, "timestamp_ms": 0}}
//! {"at_ms": 200, "op": "input", "event": {"type": "touch_move", "y": 400, "timestamp_ms": 200}}
//! {"at_ms": 210, "op": "input", "event": {"type": "touch_end"}}
//! {"op": "settle"}
//! {"at_ms": 600, "op": "tick"}
//! ```
//!
//! Time only moves forward; a step without `at_ms` runs at the current time.
//! One JSON object describing the controller afterwards is printed per step.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use swipefeed_core::{
    AppConfig, ControllerEvent, ControllerSnapshot, HeadlessSurface, InputEvent, ManualClock,
    ScrollOrchestrator, Settled,
};
use swipefeed_core::Clock;
use swipefeed_tui::{FeedKind, FeedUpdate};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::demo::DemoSource;

/// How long a `settle` step waits for an operation to finish
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default)]
    at_ms: Option<u64>,
    #[serde(flatten)]
    op: Op,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Op {
    Input { event: InputEvent },
    /// Wait for the next refresh or page load to settle
    Settle,
    ProgrammaticScroll,
    FinishProgrammaticScroll,
    DismissBadge,
    /// Only advance time
    Tick,
    Dispose,
}

#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    suppress_native: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settled: Option<String>,
    mounted: bool,
    items: usize,
    snapshot: ControllerSnapshot,
    events: Vec<ControllerEvent>,
}

pub async fn run(config: &AppConfig, path: &Path) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open replay script {}", path.display()))?;
    let stdout = std::io::stdout();
    let steps = replay(config, BufReader::new(file), stdout.lock()).await?;
    info!(steps, "Replay finished");
    Ok(())
}

/// Run every step of `script` and write one report line per step
pub async fn replay<R: BufRead, W: Write>(config: &AppConfig, script: R, mut out: W) -> Result<usize> {
    let mut feed = config.feed.clone();
    // Operations settle on demand; wall-clock latency would only slow replay
    feed.latency_ms = 0;

    let clock = ManualClock::new();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let source = Arc::new(DemoSource::new(FeedKind::Social, feed, update_tx));
    let mut controller = ScrollOrchestrator::mount(
        config.controller.clone(),
        source,
        Box::new(HeadlessSurface::new()),
        Arc::new(clock.clone()),
    )?
    .with_event_sender(event_tx);

    let mut items = 0usize;
    let mut count = 0;
    for (index, line) in script.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step: Step = serde_json::from_str(line)
            .with_context(|| format!("Invalid replay step on line {}", index + 1))?;
        debug!(line = index + 1, ?step, "Replaying step");

        if let Some(at) = step.at_ms {
            clock.set(at);
        }
        controller.tick();

        let mut suppress_native = None;
        let mut settled = None;
        match step.op {
            Op::Input { event } => {
                suppress_native = Some(controller.handle(event).suppress_native);
            }
            Op::Settle => {
                settled = Some(
                    match tokio::time::timeout(SETTLE_TIMEOUT, controller.next_completion()).await {
                        Ok(Some(result)) => describe(&result),
                        Ok(None) => "disposed".to_string(),
                        Err(_) => "timeout".to_string(),
                    },
                );
            }
            Op::ProgrammaticScroll => controller.begin_programmatic_scroll(),
            Op::FinishProgrammaticScroll => controller.finish_programmatic_scroll(),
            Op::DismissBadge => controller.dismiss_badge(),
            Op::Tick => {}
            Op::Dispose => controller.dispose(),
        }

        while let Ok(update) = update_rx.try_recv() {
            match update {
                FeedUpdate::Replace(page) => items = page.len(),
                FeedUpdate::Append(page) => items += page.len(),
            }
        }

        let report = StepReport {
            step: count,
            at_ms: clock.now_ms(),
            suppress_native,
            settled,
            mounted: controller.is_mounted(),
            items,
            snapshot: controller.snapshot(),
            events: std::iter::from_fn(|| event_rx.try_recv().ok()).collect(),
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
        count += 1;
    }

    controller.dispose();
    Ok(count)
}

fn describe(settled: &Settled) -> String {
    match settled {
        Settled::Refresh(Ok(())) => "refresh_ok".to_string(),
        Settled::LoadMore(Ok(page)) if page.exhausted => "load_more_exhausted".to_string(),
        Settled::LoadMore(Ok(_)) => "load_more_ok".to_string(),
        Settled::Stale => "stale".to_string(),
        other => match other.error() {
            Some(e) => format!("error: {}", e),
            None => "unknown".to_string(),
        },
    }
}
