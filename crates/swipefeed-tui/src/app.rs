use std::sync::Arc;

use chrono::{DateTime, Utc};
use swipefeed_core::pagination::within_proximity;
use swipefeed_core::{
    AppConfig, Clock, ControllerConfig, ControllerEvent, ControllerSnapshot, FeedSource, InputEvent, InputSurface,
    PullPhase, ScrollOrchestrator, Settled,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::input::{Action, PointerInput};
use crate::scroll::{ScrollAnimator, ScrollConfigExt};
use crate::viewport::Geometry;

/// Which demo feed a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Social,
    Shop,
}

impl FeedKind {
    pub fn title(self) -> &'static str {
        match self {
            FeedKind::Social => "Social",
            FeedKind::Shop => "Shop",
        }
    }

    /// Label of the sticky action button
    pub fn action_label(self) -> &'static str {
        match self {
            FeedKind::Social => "+ New post",
            FeedKind::Shop => "Cart",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: Uuid,
    pub title: String,
    pub detail: String,
    pub posted_at: DateTime<Utc>,
}

/// Content changes pushed by a feed source
#[derive(Debug, Clone)]
pub enum FeedUpdate {
    /// A refresh replaced the feed with its first page
    Replace(Vec<FeedItem>),
    /// The next page arrived
    Append(Vec<FeedItem>),
}

/// Last pointer row while a drag is in progress
#[derive(Debug, Clone, Copy)]
struct Drag {
    last_row: u16,
}

type SurfaceFactory = Box<dyn Fn() -> Box<dyn InputSurface> + Send>;

/// One scrollable feed with its own mounted controller
pub struct FeedView {
    pub kind: FeedKind,
    pub items: Vec<FeedItem>,
    /// Disposed while the view is not on screen
    controller: ScrollOrchestrator,
    controller_config: ControllerConfig,
    source: Arc<dyn FeedSource>,
    surface: SurfaceFactory,
    animator: ScrollAnimator,
    geometry: Geometry,
    clock: Arc<dyn Clock>,
    viewport_rows: u16,
    updates: mpsc::UnboundedReceiver<FeedUpdate>,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    /// Offset last delivered to the controller
    reported_offset: Option<f64>,
    /// Sentinel is inside the proximity zone and was already reported
    sentinel_reported: bool,
    drag: Option<Drag>,
    jumping: bool,
}

impl FeedView {
    /// Mount a controller for this view. Must run inside the tokio runtime.
    pub fn mount<S>(
        kind: FeedKind,
        config: &AppConfig,
        source: Arc<dyn FeedSource>,
        updates: mpsc::UnboundedReceiver<FeedUpdate>,
        surface: S,
        clock: Arc<dyn Clock>,
    ) -> swipefeed_core::Result<Self>
    where
        S: InputSurface + Clone + 'static,
    {
        let surface: SurfaceFactory =
            Box::new(move || -> Box<dyn InputSurface> { Box::new(surface.clone()) });
        let (event_tx, events) = mpsc::unbounded_channel();
        let controller = ScrollOrchestrator::mount(
            config.controller.clone(),
            Arc::clone(&source),
            surface(),
            Arc::clone(&clock),
        )?
        .with_event_sender(event_tx);

        Ok(Self {
            kind,
            items: Vec::new(),
            controller,
            controller_config: config.controller.clone(),
            source,
            surface,
            animator: ScrollAnimator::new(config.ui.smooth_scroll.clone(), Arc::clone(&clock)),
            geometry: Geometry::new(config.ui.row_height_px, config.ui.item_rows),
            clock,
            viewport_rows: 0,
            updates,
            events,
            reported_offset: None,
            sentinel_reported: false,
            drag: None,
            jumping: false,
        })
    }

    /// Replace a disposed controller with a freshly mounted one. The feed
    /// then animates back to the top with input suppressed.
    pub fn remount(&mut self) -> swipefeed_core::Result<()> {
        let (event_tx, events) = mpsc::unbounded_channel();
        let controller = ScrollOrchestrator::mount(
            self.controller_config.clone(),
            Arc::clone(&self.source),
            (self.surface)(),
            Arc::clone(&self.clock),
        )?
        .with_event_sender(event_tx);

        // Dropping the old controller releases whatever it still held
        self.controller = controller;
        self.events = events;
        self.reported_offset = None;
        self.sentinel_reported = false;
        self.drag = None;
        self.jump_to_top();
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.is_mounted()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.controller.snapshot()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn refresh_threshold(&self) -> f64 {
        self.controller.config().pull.refresh_threshold
    }

    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    /// Current offset in logical px
    pub fn offset_px(&self) -> f64 {
        self.animator.current()
    }

    /// First visible row of content
    pub fn scroll_row(&self) -> u16 {
        self.geometry.px_to_rows(self.animator.current())
    }

    pub fn set_viewport_rows(&mut self, rows: u16) {
        if self.viewport_rows != rows {
            self.viewport_rows = rows;
            // Viewport height is part of every scroll report
            self.reported_offset = None;
        }
    }

    /// Unmount: the view keeps its items but stops reacting to input
    pub fn dispose(&mut self) {
        self.drag = None;
        self.jumping = false;
        self.animator.cancel();
        self.controller.dispose();
    }

    fn max_offset(&self) -> f64 {
        self.geometry
            .max_offset_px(self.items.len(), self.viewport_rows)
    }

    fn viewport_height_px(&self) -> f64 {
        self.geometry.rows_to_px(self.viewport_rows as f64)
    }

    /// Drive one frame: apply content updates and settled operations,
    /// advance the scroll animation, report the offset and tick timers.
    /// Returns the controller notifications raised since the last frame.
    pub fn on_frame(&mut self) -> Vec<ControllerEvent> {
        while let Ok(update) = self.updates.try_recv() {
            match update {
                FeedUpdate::Replace(items) => {
                    debug!(feed = self.kind.title(), count = items.len(), "Feed replaced");
                    self.items = items;
                }
                FeedUpdate::Append(items) => {
                    debug!(feed = self.kind.title(), count = items.len(), "Page appended");
                    self.items.extend(items);
                }
            }
            self.sentinel_reported = false;
        }

        for settled in self.controller.poll_completions() {
            if matches!(settled, Settled::LoadMore(Ok(_))) {
                // The sentinel may still be in the zone after a short page
                self.sentinel_reported = false;
            }
        }

        let max = self.max_offset();
        self.animator.update(max);
        if self.jumping && !self.animator.is_animating() {
            // The landing offset still belongs to the jump
            self.report_scroll();
            self.jumping = false;
            self.controller.resume();
            self.controller.finish_programmatic_scroll();
        }
        self.report_scroll();
        self.controller.tick();

        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Deliver the offset when it moved and check the bottom sentinel
    fn report_scroll(&mut self) {
        let offset = self.animator.current();
        if self.reported_offset != Some(offset) {
            self.reported_offset = Some(offset);
            self.controller.handle(InputEvent::Scroll {
                offset_y: offset,
                viewport_height: self.viewport_height_px(),
            });
        }

        if self.viewport_rows == 0 || self.controller.is_suppressed() {
            return;
        }
        let margin = self.controller.config().pagination.proximity_margin;
        let visible = within_proximity(
            offset,
            self.viewport_height_px(),
            self.geometry.sentinel_top_px(self.items.len()),
            margin,
        );
        if visible && !self.sentinel_reported {
            self.sentinel_reported = true;
            self.controller.handle(InputEvent::SentinelVisible);
        } else if !visible {
            self.sentinel_reported = false;
        }
    }

    /// User scroll by whole rows, applied immediately
    pub fn scroll_by_rows(&mut self, rows: i32) {
        if self.jumping {
            return;
        }
        let delta = self.geometry.rows_to_px(rows as f64);
        let max = self.max_offset();
        self.animator.scroll_by(delta, max);
        self.report_scroll();
    }

    /// Animated jump to the top. The controller ignores input until the
    /// animation lands, however long it is configured to run.
    pub fn jump_to_top(&mut self) {
        self.controller.begin_programmatic_scroll();
        self.controller.pause();
        let max = self.max_offset();
        self.animator.scroll_to(0.0, max);
        self.jumping = true;
    }

    pub fn jump_to_bottom(&mut self) {
        let max = self.max_offset();
        self.animator.scroll_by(max, max);
        self.report_scroll();
    }

    /// Act on the "new content" badge: dismiss it and go to the top.
    /// Returns false when no badge was showing.
    pub fn show_new(&mut self) -> bool {
        if !self.controller.sticky_state().badge_visible {
            return false;
        }
        self.controller.dismiss_badge();
        self.jump_to_top();
        true
    }

    pub fn is_sticky(&self) -> bool {
        self.controller.sticky_state().active
    }

    fn now(&self) -> f64 {
        self.clock.now_ms() as f64
    }

    /// Mouse press/drag/release behave like a touch on the viewport
    pub fn pointer(&mut self, input: PointerInput) {
        match input {
            PointerInput::Press { row } => {
                self.drag = Some(Drag { last_row: row });
                self.controller.handle(InputEvent::TouchStart {
                    y: self.geometry.rows_to_px(row as f64),
                    timestamp_ms: self.now(),
                });
            }
            PointerInput::Drag { row } => {
                let Some(drag) = self.drag else {
                    return;
                };
                let response = self.controller.handle(InputEvent::TouchMove {
                    y: self.geometry.rows_to_px(row as f64),
                    timestamp_ms: self.now(),
                });
                if !response.suppress_native && self.controller.pull_state().phase == PullPhase::Idle {
                    // Native drag scrolling: content follows the pointer
                    self.scroll_by_rows(drag.last_row as i32 - row as i32);
                }
                self.drag = Some(Drag { last_row: row });
            }
            PointerInput::Release => {
                if self.drag.take().is_some() {
                    self.controller.handle(InputEvent::TouchEnd);
                }
            }
            PointerInput::Wheel(notches) => {
                let step = self.animator.config().step_rows() as i32;
                self.scroll_by_rows(notches * step);
            }
        }
    }

    /// The gesture was interrupted (focus lost)
    pub fn cancel_gesture(&mut self) {
        if self.drag.take().is_some() {
            self.controller.handle(InputEvent::TouchCancel);
        }
    }
}

/// Terminal application state: feed views of which one is mounted
pub struct App {
    views: Vec<FeedView>,
    active: usize,
    pub status_message: Option<String>,
    /// The status message reports a failure
    pub status_is_error: bool,
    pub should_quit: bool,
}

impl App {
    /// The first view stays mounted and active; the others are unmounted
    /// until switched to
    pub fn new(mut views: Vec<FeedView>) -> Self {
        for view in views.iter_mut().skip(1) {
            view.dispose();
        }
        Self {
            views,
            active: 0,
            status_message: None,
            status_is_error: false,
            should_quit: false,
        }
    }

    pub fn views(&self) -> &[FeedView] {
        &self.views
    }

    pub fn active_view(&self) -> Option<&FeedView> {
        self.views.get(self.active)
    }

    pub fn active_view_mut(&mut self) -> Option<&mut FeedView> {
        self.views.get_mut(self.active)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Rows available to feed content for a terminal of `height` rows
    /// (status bar and the list border excluded)
    pub fn viewport_rows_for(height: u16) -> u16 {
        height.saturating_sub(3)
    }

    pub fn resize(&mut self, height: u16) {
        let rows = Self::viewport_rows_for(height);
        for view in &mut self.views {
            view.set_viewport_rows(rows);
        }
    }

    /// Advance every view; unmounted views still take content updates
    pub fn on_frame(&mut self) {
        let mut messages = Vec::new();
        for (index, view) in self.views.iter_mut().enumerate() {
            for event in view.on_frame() {
                if index == self.active {
                    if let Some(message) = status_for(&event) {
                        messages.push(message);
                    }
                }
            }
        }
        if let Some((message, is_error)) = messages.pop() {
            if is_error {
                self.set_error(message);
            } else {
                self.set_status(message);
            }
        }
    }

    /// Unmount the active view and mount the next one
    pub fn switch_feed(&mut self) {
        if self.views.len() < 2 {
            return;
        }
        let next = (self.active + 1) % self.views.len();
        // Mount first so a shared surface never drops to zero subscriptions
        let mounted = match self.views.get_mut(next) {
            Some(view) => view.remount().map(|_| view.kind.title()),
            None => return,
        };
        match mounted {
            Ok(title) => {
                if let Some(view) = self.views.get_mut(self.active) {
                    view.dispose();
                }
                self.active = next;
                self.set_status(format!("Switched to {}", title));
            }
            Err(e) => {
                warn!("Failed to mount feed view: {}", e);
                self.set_error(format!("Could not switch feed: {}", e));
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SwitchFeed => self.switch_feed(),
            Action::ShowNew => self.activate(),
            Action::None => {}
            _ => {
                let Some(view) = self.active_view_mut() else {
                    return;
                };
                let page = view.viewport_rows().max(1) as i32;
                let step = view.animator.config().step_rows() as i32;
                match action {
                    Action::ScrollDown => view.scroll_by_rows(step),
                    Action::ScrollUp => view.scroll_by_rows(-step),
                    Action::PageDown => view.scroll_by_rows(page),
                    Action::PageUp => view.scroll_by_rows(-page),
                    Action::JumpToTop => view.jump_to_top(),
                    Action::JumpToBottom => view.jump_to_bottom(),
                    _ => {}
                }
            }
        }
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        if let Some(view) = self.active_view_mut() {
            view.pointer(input);
        }
    }

    pub fn focus_lost(&mut self) {
        if let Some(view) = self.active_view_mut() {
            view.cancel_gesture();
        }
    }

    /// Enter: the badge wins over the sticky action button
    fn activate(&mut self) {
        let Some(view) = self.active_view_mut() else {
            return;
        };
        if view.show_new() {
            self.set_status("Showing newest items");
        } else if view.is_sticky() {
            let label = view.kind.action_label();
            self.set_status(format!("{} selected", label.trim_start_matches("+ ")));
        }
    }

    /// Release every view's subscriptions before the terminal is restored
    pub fn dispose(&mut self) {
        for view in &mut self.views {
            view.dispose();
        }
    }
}

/// Status line text for a notification, and whether it reports a failure
fn status_for(event: &ControllerEvent) -> Option<(String, bool)> {
    match event {
        ControllerEvent::RefreshStarted => Some(("Refreshing...".to_string(), false)),
        ControllerEvent::RefreshSucceeded => Some(("Feed refreshed".to_string(), false)),
        ControllerEvent::RefreshFailed { message } => {
            Some((format!("Refresh failed: {}", message), true))
        }
        ControllerEvent::LoadMoreFailed { message } => {
            Some((format!("Loading more failed: {}", message), true))
        }
        ControllerEvent::PageLoaded { exhausted: true } => {
            Some(("You're all caught up".to_string(), false))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use swipefeed_core::{HeadlessSurface, ListenerKind, ManualClock, PageOutcome};

    /// Produces numbered items synchronously over the update channel
    struct CountingSource {
        tx: mpsc::UnboundedSender<FeedUpdate>,
        pages: AtomicUsize,
        refreshes: AtomicUsize,
        last_page: usize,
    }

    fn items(page: usize) -> Vec<FeedItem> {
        (0..5)
            .map(|i| FeedItem {
                id: Uuid::new_v4(),
                title: format!("item {}-{}", page, i),
                detail: String::new(),
                posted_at: Utc::now(),
            })
            .collect()
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn refresh(&self) -> swipefeed_core::Result<()> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            self.pages.store(1, Ordering::SeqCst);
            let _ = self.tx.send(FeedUpdate::Replace(items(0)));
            Ok(())
        }

        async fn load_more(&self) -> swipefeed_core::Result<PageOutcome> {
            let page = self.pages.fetch_add(1, Ordering::SeqCst) + 1;
            let _ = self.tx.send(FeedUpdate::Append(items(page)));
            Ok(PageOutcome {
                exhausted: page >= self.last_page,
            })
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.ui.row_height_px = 20.0;
        config.ui.item_rows = 4;
        config
    }

    fn view(kind: FeedKind, clock: &ManualClock) -> (FeedView, Arc<CountingSource>, HeadlessSurface) {
        view_with(kind, clock, &config())
    }

    fn view_with(
        kind: FeedKind,
        clock: &ManualClock,
        config: &AppConfig,
    ) -> (FeedView, Arc<CountingSource>, HeadlessSurface) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Arc::new(CountingSource {
            tx,
            pages: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            last_page: 3,
        });
        let surface = HeadlessSurface::new();
        let mut view = FeedView::mount(
            kind,
            config,
            source.clone(),
            rx,
            surface.clone(),
            Arc::new(clock.clone()),
        )
        .unwrap();
        view.set_viewport_rows(10);
        (view, source, surface)
    }

    /// Let spawned operations run, then drive frames until they settle
    async fn settle(view: &mut FeedView) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        for _ in 0..5 {
            tokio::task::yield_now().await;
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            events.extend(view.on_frame());
        }
        events
    }

    #[tokio::test]
    async fn test_empty_view_loads_first_page() {
        let clock = ManualClock::new();
        let (mut view, source, _surface) = view(FeedKind::Social, &clock);

        let events = view.on_frame();
        assert!(events.contains(&ControllerEvent::LoadMoreStarted));
        assert!(view.snapshot().pagination.loading);

        let events = settle(&mut view).await;
        assert_eq!(source.pages.load(Ordering::SeqCst), 1);
        assert_eq!(view.items.len(), 5);
        assert!(events.contains(&ControllerEvent::PageLoaded { exhausted: false }));
        assert!(!view.snapshot().pagination.loading);
    }

    #[tokio::test]
    async fn test_scrolling_to_bottom_exhausts_feed() {
        let clock = ManualClock::new();
        let (mut view, source, _surface) = view(FeedKind::Shop, &clock);

        for _ in 0..10 {
            view.on_frame();
            settle(&mut view).await;
            view.jump_to_bottom();
        }

        assert_eq!(source.pages.load(Ordering::SeqCst), 3);
        assert_eq!(view.items.len(), 15);
        assert!(view.snapshot().pagination.exhausted);
        assert!(!view.snapshot().pagination.loading);
    }

    #[tokio::test]
    async fn test_drag_at_top_refreshes() {
        let clock = ManualClock::new();
        let (mut view, source, _surface) = view(FeedKind::Social, &clock);
        view.on_frame();
        settle(&mut view).await;

        view.pointer(PointerInput::Press { row: 2 });
        clock.advance(50);
        view.pointer(PointerInput::Drag { row: 6 });
        clock.advance(50);
        // 12 rows * 20px = 240px, resisted to the 120px cap
        view.pointer(PointerInput::Drag { row: 14 });
        assert_eq!(view.snapshot().pull.phase, PullPhase::Pulling);
        assert_eq!(view.offset_px(), 0.0);

        view.pointer(PointerInput::Release);
        assert_eq!(view.snapshot().pull.phase, PullPhase::Refreshing);

        let events = settle(&mut view).await;
        assert_eq!(source.refreshes.load(Ordering::SeqCst), 1);
        assert!(events.contains(&ControllerEvent::RefreshSucceeded));
        assert_eq!(view.items.len(), 5);
        assert_eq!(view.snapshot().pull.phase, PullPhase::Resetting);

        clock.advance(300);
        view.on_frame();
        assert_eq!(view.snapshot().pull.phase, PullPhase::Idle);
    }

    #[tokio::test]
    async fn test_drag_up_scrolls_natively() {
        let clock = ManualClock::new();
        let (mut view, _source, _surface) = view(FeedKind::Social, &clock);
        for _ in 0..3 {
            view.on_frame();
            settle(&mut view).await;
            view.jump_to_bottom();
        }
        view.set_offset_for_test(0.0);

        view.pointer(PointerInput::Press { row: 8 });
        clock.advance(16);
        view.pointer(PointerInput::Drag { row: 5 });
        view.pointer(PointerInput::Release);

        assert_eq!(view.offset_px(), 60.0);
        assert_eq!(view.snapshot().pull.phase, PullPhase::Idle);
    }

    #[tokio::test]
    async fn test_jump_to_top_ignores_input_until_done() {
        let clock = ManualClock::new();
        let (mut view, _source, _surface) = view(FeedKind::Social, &clock);
        for _ in 0..3 {
            view.on_frame();
            settle(&mut view).await;
            view.jump_to_bottom();
        }
        assert!(view.offset_px() > 0.0);

        view.jump_to_top();
        view.on_frame();
        assert!(view.controller.is_suppressed());
        // Scrolling is refused while the jump runs
        let before = view.offset_px();
        view.scroll_by_rows(2);
        assert_eq!(view.offset_px(), before);

        clock.advance(800);
        view.on_frame();
        assert_eq!(view.offset_px(), 0.0);
        assert!(!view.controller.is_suppressed());
    }

    /// Load every page and leave the viewport at the bottom
    async fn scrolled_to_bottom(view: &mut FeedView) {
        for _ in 0..3 {
            view.on_frame();
            settle(view).await;
            view.jump_to_bottom();
        }
        view.on_frame();
    }

    #[tokio::test]
    async fn test_jump_to_top_does_not_show_badge() {
        let clock = ManualClock::new();
        let (mut view, _source, _surface) = view(FeedKind::Social, &clock);
        scrolled_to_bottom(&mut view).await;
        clock.advance(1_000);
        view.on_frame();
        assert!(view.offset_px() > 0.0);
        assert!(view.is_sticky());

        view.jump_to_top();
        for _ in 0..3 {
            view.on_frame();
            clock.advance(400);
        }
        view.on_frame();

        assert_eq!(view.offset_px(), 0.0);
        assert!(!view.controller.is_suppressed());
        let sticky = view.snapshot().sticky;
        assert!(!sticky.badge_visible);
        assert_eq!(sticky.badge_scale, 0.0);
    }

    #[tokio::test]
    async fn test_slow_jump_stays_suppressed_past_window() {
        let clock = ManualClock::new();
        let mut config = config();
        config.controller.programmatic_scroll_ms = 800;
        config.ui.smooth_scroll.animation_duration_ms = 2_000;
        let (mut view, _source, _surface) = view_with(FeedKind::Shop, &clock, &config);
        scrolled_to_bottom(&mut view).await;

        view.jump_to_top();
        view.on_frame();
        clock.advance(1_200);
        view.on_frame();
        // The controller window elapsed but the feed is still travelling
        assert!(view.offset_px() > 0.0);
        assert!(view.controller.is_suppressed());

        clock.advance(800);
        view.on_frame();
        assert_eq!(view.offset_px(), 0.0);
        assert!(!view.controller.is_suppressed());
        assert!(!view.snapshot().sticky.badge_visible);
    }

    #[tokio::test]
    async fn test_focus_lost_cancels_pull_without_refresh() {
        let clock = ManualClock::new();
        let (mut social, source, _surface) = view(FeedKind::Social, &clock);
        social.on_frame();
        settle(&mut social).await;
        let mut app = App::new(vec![social]);

        app.handle_pointer(PointerInput::Press { row: 2 });
        clock.advance(50);
        app.handle_pointer(PointerInput::Drag { row: 6 });
        clock.advance(50);
        app.handle_pointer(PointerInput::Drag { row: 14 });
        assert_eq!(app.views()[0].snapshot().pull.phase, PullPhase::Pulling);

        app.focus_lost();
        assert_eq!(app.views()[0].snapshot().pull.phase, PullPhase::Resetting);
        // Release after focus returns belongs to no gesture
        app.handle_pointer(PointerInput::Release);

        settle(app.active_view_mut().unwrap()).await;
        clock.advance(300);
        app.on_frame();
        assert_eq!(app.views()[0].snapshot().pull.phase, PullPhase::Idle);
        assert_eq!(source.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_switch_feed_remounts_views() {
        let clock = ManualClock::new();
        let (social, _, social_surface) = view(FeedKind::Social, &clock);
        let (shop, _, shop_surface) = view(FeedKind::Shop, &clock);
        let mut app = App::new(vec![social, shop]);

        assert!(app.views()[0].is_mounted());
        assert!(!app.views()[1].is_mounted());
        assert_eq!(shop_surface.attached_count(), 0);

        app.handle_action(Action::SwitchFeed);
        assert_eq!(app.active_view().map(|v| v.kind), Some(FeedKind::Shop));
        assert!(!app.views()[0].is_mounted());
        assert_eq!(social_surface.attached_count(), 0);
        assert_eq!(shop_surface.attached_count(), 5);
        assert_eq!(app.status_message.as_deref(), Some("Switched to Shop"));

        // Mounting starts with a programmatic scroll to the top
        assert!(app.views()[1].controller.is_suppressed());
        app.on_frame();
        assert!(!app.views()[1].controller.is_suppressed());

        app.handle_action(Action::SwitchFeed);
        assert_eq!(app.active_view().map(|v| v.kind), Some(FeedKind::Social));
        assert_eq!(social_surface.attached_count(), 5);
        assert_eq!(shop_surface.attached_count(), 0);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_switch_keeps_old_view_when_mount_fails() {
        let clock = ManualClock::new();
        let (social, _, _) = view(FeedKind::Social, &clock);
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Arc::new(CountingSource {
            tx,
            pages: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            last_page: 1,
        });
        // Mounts once, then refuses when switched back in
        let surface = HeadlessSurface::new();
        let shop = FeedView::mount(
            FeedKind::Shop,
            &config(),
            source,
            rx,
            surface.clone(),
            Arc::new(clock.clone()),
        )
        .unwrap();
        let mut app = App::new(vec![social, shop]);
        surface.refuse(ListenerKind::Proximity);

        app.handle_action(Action::SwitchFeed);
        assert_eq!(app.active_view().map(|v| v.kind), Some(FeedKind::Social));
        assert!(app.views()[0].is_mounted());
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Could not switch feed")));
        assert!(app.status_is_error);
    }

    #[tokio::test]
    async fn test_dispose_releases_surface() {
        let clock = ManualClock::new();
        let (social, _, surface) = view(FeedKind::Social, &clock);
        let mut app = App::new(vec![social]);
        assert_eq!(surface.attached_count(), 5);

        app.dispose();
        assert_eq!(surface.attached_count(), 0);
    }

    impl FeedView {
        fn set_offset_for_test(&mut self, offset: f64) {
            self.animator.set_offset(offset);
            self.report_scroll();
        }
    }
}
