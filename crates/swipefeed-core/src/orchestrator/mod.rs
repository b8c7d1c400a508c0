//! Per-view scroll controller
//!
//! [`ScrollOrchestrator`] is mounted once per feed view. It owns the view's
//! listener subscriptions, fans input out to the pull engine, the sticky
//! tracker and the pagination trigger, and runs the caller's async
//! `refresh`/`load_more` on the tokio runtime it was mounted on.
//!
//! Results of those operations come back over a channel and are applied only
//! when the host drains it ([`ScrollOrchestrator::poll_completions`] from a
//! frame loop, or [`ScrollOrchestrator::next_completion`] from a `select!`),
//! so every state change happens on the host's own loop.
//!
//! # Usage
//!
//! ```ignore
//! let mut controller = ScrollOrchestrator::mount(config, source, surface, clock)?;
//!
//! // For every platform event
//! let response = controller.handle(InputEvent::TouchMove { y, timestamp_ms });
//! if response.suppress_native { /* prevent default */ }
//!
//! // Every frame
//! controller.poll_completions();
//! controller.tick();
//! let snapshot = controller.snapshot();
//! ```

pub mod events;
pub mod listeners;

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clock::{Clock, Deadline};
use crate::config::ControllerConfig;
use crate::gesture::{GestureSample, PullPhase, PullState, PullToRefreshEngine, Release};
use crate::pagination::{LoadTicket, PaginationState, PaginationTrigger};
use crate::source::{FeedSource, PageOutcome};
use crate::sticky::{StickyAffordanceTracker, StickyState};
use crate::{Error, Result};

pub use events::{ControllerEvent, ControllerSnapshot, EventResponse, InputEvent, Settled};
pub use listeners::{HeadlessSurface, InputSurface, ListenerHandle, ListenerKind};

use listeners::ListenerSet;

/// A settled async operation on its way back to the controller
enum Completion {
    Refresh {
        generation: u64,
        result: Result<()>,
    },
    LoadMore {
        ticket: LoadTicket,
        result: Result<PageOutcome>,
    },
}

pub struct ScrollOrchestrator {
    config: ControllerConfig,
    source: Arc<dyn FeedSource>,
    clock: Arc<dyn Clock>,
    runtime: Handle,
    /// `None` once disposed
    listeners: Option<ListenerSet>,
    pull: PullToRefreshEngine,
    sticky: StickyAffordanceTracker,
    pagination: PaginationTrigger,
    last_offset: f64,
    programmatic: Deadline,
    paused: bool,
    refresh_generation: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    event_tx: Option<mpsc::UnboundedSender<ControllerEvent>>,
}

impl ScrollOrchestrator {
    /// Subscribe to the surface and start a fresh controller. Must be called
    /// from within a tokio runtime.
    pub fn mount(
        config: ControllerConfig,
        source: Arc<dyn FeedSource>,
        surface: Box<dyn InputSurface>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        let listeners = ListenerSet::acquire(surface)?;
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        info!("Scroll controller mounted");

        Ok(Self {
            pull: PullToRefreshEngine::new(config.pull.clone()),
            sticky: StickyAffordanceTracker::new(config.sticky.clone()),
            pagination: PaginationTrigger::new(),
            config,
            source,
            clock,
            runtime,
            listeners: Some(listeners),
            last_offset: 0.0,
            programmatic: Deadline::default(),
            paused: false,
            refresh_generation: 0,
            completion_tx,
            completion_rx,
            event_tx: None,
        })
    }

    /// Set the event sender for view notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.listeners.is_some()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn pull_state(&self) -> PullState {
        self.pull.state()
    }

    pub fn sticky_state(&self) -> StickyState {
        self.sticky.state()
    }

    pub fn pagination_state(&self) -> PaginationState {
        self.pagination.state()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            pull: self.pull.state(),
            sticky: self.sticky.state(),
            pagination: self.pagination.state(),
        }
    }

    /// Whether input is currently being ignored because of a programmatic
    /// scroll or an explicit pause
    pub fn is_suppressed(&self) -> bool {
        self.suppressed_at(self.clock.now_ms())
    }

    /// Feed one platform event. No-op after dispose.
    pub fn handle(&mut self, event: InputEvent) -> EventResponse {
        let Some(listeners) = self.listeners.as_ref() else {
            return EventResponse::default();
        };
        if !listeners.is_attached(event.listener()) {
            return EventResponse::default();
        }

        let now = self.clock.now_ms();
        if self.suppressed_at(now) {
            // Keep tracking where the viewport is so the first real event
            // after the window doesn't read as a huge jump
            if let InputEvent::Scroll { offset_y, .. } = event {
                if offset_y.is_finite() {
                    self.last_offset = offset_y.max(0.0);
                }
            }
            return EventResponse::default();
        }

        let before = self.snapshot();
        let mut response = EventResponse::default();

        match event {
            InputEvent::Scroll {
                offset_y,
                viewport_height,
            } => self.on_scroll(offset_y, viewport_height, now),
            InputEvent::TouchStart { y, timestamp_ms } => {
                self.pull
                    .begin(GestureSample::new(y, timestamp_ms), self.last_offset);
            }
            InputEvent::TouchMove { y, timestamp_ms } => {
                if let Some(reading) = self.pull.update(GestureSample::new(y, timestamp_ms)) {
                    response.suppress_native =
                        reading.suppress_native && self.pull.phase() == PullPhase::Pulling;
                }
            }
            InputEvent::TouchEnd => {
                if self.pull.release(now) == Release::Refresh {
                    self.start_refresh();
                }
            }
            InputEvent::TouchCancel => {
                self.pull.cancel(now);
            }
            InputEvent::SentinelVisible => self.request_page(),
        }

        self.publish_changes(before);
        response
    }

    /// Advance timers (reset phase, badge hide, programmatic window)
    pub fn tick(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let now = self.clock.now_ms();
        let before = self.snapshot();

        self.pull.tick(now);
        self.sticky.tick(now);
        if self.programmatic.fire(now) {
            debug!("Programmatic scroll window elapsed");
        }

        self.publish_changes(before);
    }

    /// Apply every operation that has settled so far
    pub fn poll_completions(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        if !self.is_mounted() {
            return settled;
        }
        while let Ok(completion) = self.completion_rx.try_recv() {
            settled.push(self.apply(completion));
        }
        settled
    }

    /// Wait for the next operation to settle and apply it. Returns `None`
    /// once disposed.
    pub async fn next_completion(&mut self) -> Option<Settled> {
        if !self.is_mounted() {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Settle the current refresh from outside, for hosts that learn about
    /// completion through their own channel. A result arriving later from the
    /// spawned `refresh()` is dropped as stale.
    pub fn complete_refresh(&mut self, result: Result<()>) -> bool {
        if !self.is_mounted() || self.pull.phase() != PullPhase::Refreshing {
            return false;
        }
        self.refresh_generation += 1;

        let now = self.clock.now_ms();
        let before = self.snapshot();
        self.finish_refresh(&result, now);
        self.publish_changes(before);
        true
    }

    /// The host is about to animate the viewport itself. Input is ignored
    /// for the configured window and any live pull is abandoned.
    pub fn begin_programmatic_scroll(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let now = self.clock.now_ms();
        let before = self.snapshot();

        debug!(window_ms = self.config.programmatic_scroll_ms, "Programmatic scroll started");
        self.programmatic.arm(now, self.config.programmatic_scroll_ms);
        self.pull.cancel(now);

        self.publish_changes(before);
    }

    /// End the programmatic window early (the animation finished)
    pub fn finish_programmatic_scroll(&mut self) {
        self.programmatic.disarm();
    }

    /// Ignore input until [`resume`](Self::resume)
    pub fn pause(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let before = self.snapshot();
        self.paused = true;
        self.pull.cancel(self.clock.now_ms());
        self.publish_changes(before);
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// The caller acted on the badge
    pub fn dismiss_badge(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let before = self.snapshot();
        self.sticky.dismiss_badge();
        self.publish_changes(before);
    }

    /// Reopen pagination after an external change to the feed
    pub fn reset_pagination(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.pagination.reset();
    }

    /// Unmount: detach listeners, cancel timers, drop pending results.
    /// Safe to call any number of times; also runs on drop.
    pub fn dispose(&mut self) {
        let Some(listeners) = self.listeners.take() else {
            return;
        };
        drop(listeners);

        self.pull.teardown();
        self.sticky.teardown();
        self.pagination.reset();
        self.programmatic.disarm();
        self.paused = false;
        self.completion_rx.close();
        self.event_tx = None;

        info!("Scroll controller disposed");
    }

    fn suppressed_at(&self, now: u64) -> bool {
        self.paused || self.programmatic.is_pending(now)
    }

    fn on_scroll(&mut self, offset_y: f64, viewport_height: f64, now: u64) {
        if !offset_y.is_finite() || !viewport_height.is_finite() {
            return;
        }
        // Elastic overscroll reports negative offsets; treat as top
        let offset_y = offset_y.max(0.0);
        let prev = std::mem::replace(&mut self.last_offset, offset_y);

        if offset_y != 0.0 {
            self.pull.cancel(now);
        }
        self.sticky.on_scroll(offset_y, viewport_height, prev, now);
    }

    fn start_refresh(&mut self) {
        self.refresh_generation += 1;
        let generation = self.refresh_generation;
        let source = Arc::clone(&self.source);

        info!("Pull-to-refresh triggered");
        self.emit(ControllerEvent::RefreshStarted);
        self.spawn_settled(
            async move { source.refresh().await },
            move |result| Completion::Refresh { generation, result },
        );
    }

    fn request_page(&mut self) {
        let Some(ticket) = self.pagination.on_sentinel_visible() else {
            return;
        };
        let source = Arc::clone(&self.source);

        debug!("Loading next page");
        self.emit(ControllerEvent::LoadMoreStarted);
        self.spawn_settled(
            async move { source.load_more().await },
            move |result| Completion::LoadMore { ticket, result },
        );
    }

    /// Run a caller operation and post its result back. A panicking
    /// operation settles as an error instead of wedging the state machine.
    fn spawn_settled<T, F, W>(&self, operation: F, wrap: W)
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
        W: FnOnce(Result<T>) -> Completion + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        self.runtime.spawn(async move {
            let result = match tokio::spawn(operation).await {
                Ok(result) => result,
                Err(e) => Err(Error::Source(format!("Task join error: {}", e))),
            };
            if tx.send(wrap(result)).is_err() {
                debug!("Controller disposed before operation settled; dropping result");
            }
        });
    }

    fn apply(&mut self, completion: Completion) -> Settled {
        let now = self.clock.now_ms();
        let before = self.snapshot();

        let settled = match completion {
            Completion::Refresh { generation, result } => {
                if generation != self.refresh_generation
                    || self.pull.phase() != PullPhase::Refreshing
                {
                    debug!("Dropping stale refresh result");
                    return Settled::Stale;
                }
                self.finish_refresh(&result, now);
                Settled::Refresh(result)
            }
            Completion::LoadMore { ticket, result } => {
                let applied = match &result {
                    Ok(outcome) => self.pagination.complete(ticket, *outcome),
                    Err(_) => self.pagination.fail(ticket),
                };
                if !applied {
                    debug!("Dropping stale page result");
                    return Settled::Stale;
                }
                match &result {
                    Ok(outcome) => {
                        debug!(exhausted = outcome.exhausted, "Page loaded");
                        self.emit(ControllerEvent::PageLoaded {
                            exhausted: outcome.exhausted,
                        });
                    }
                    Err(e) => {
                        warn!("Loading next page failed: {}", e);
                        self.emit(ControllerEvent::LoadMoreFailed {
                            message: e.to_string(),
                        });
                    }
                }
                Settled::LoadMore(result)
            }
        };

        self.publish_changes(before);
        settled
    }

    fn finish_refresh(&mut self, result: &Result<()>, now: u64) {
        self.pull.complete_refresh(now);
        match result {
            Ok(()) => {
                info!("Refresh completed");
                self.pagination.reset();
                self.emit(ControllerEvent::RefreshSucceeded);
            }
            Err(e) => {
                warn!("Refresh failed: {}", e);
                self.emit(ControllerEvent::RefreshFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Diff two snapshots into notifications
    fn publish_changes(&self, before: ControllerSnapshot) {
        let after = self.snapshot();

        if before.pull.phase != after.pull.phase {
            debug!(from = ?before.pull.phase, to = ?after.pull.phase, "Pull phase changed");
            self.emit(ControllerEvent::PullPhaseChanged {
                phase: after.pull.phase,
            });
        }
        if before.sticky.active != after.sticky.active {
            self.emit(ControllerEvent::StickyChanged {
                active: after.sticky.active,
            });
        }
        if after.sticky.badge_visible
            && (!before.sticky.badge_visible || before.sticky.badge_scale != after.sticky.badge_scale)
        {
            self.emit(ControllerEvent::BadgeShown {
                scale: after.sticky.badge_scale,
            });
        } else if before.sticky.badge_visible && !after.sticky.badge_visible {
            self.emit(ControllerEvent::BadgeHidden);
        }
    }

    fn emit(&self, event: ControllerEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send controller event: receiver dropped");
            }
        }
    }
}

impl Drop for ScrollOrchestrator {
    fn drop(&mut self) {
        self.dispose();
    }
}
