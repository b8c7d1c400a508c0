//! Sticky action affordance and the "new content" badge

use serde::{Deserialize, Serialize};

use crate::clock::Deadline;
use crate::config::StickyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StickyState {
    /// Scrolled past the activation line; render the floating action element
    pub active: bool,
    pub badge_visible: bool,
    /// Badge size in `[0, 1]`, from the scroll velocity that returned to top
    pub badge_scale: f64,
}

#[derive(Debug, Clone)]
pub struct StickyAffordanceTracker {
    config: StickyConfig,
    state: StickyState,
    /// `|offset delta|` of the most recent scroll event
    last_delta: Option<f64>,
    hide_deadline: Deadline,
}

impl StickyAffordanceTracker {
    pub fn new(config: StickyConfig) -> Self {
        Self {
            config,
            state: StickyState::default(),
            last_delta: None,
            hide_deadline: Deadline::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> StickyState {
        self.state
    }

    /// Process one scroll event
    pub fn on_scroll(
        &mut self,
        offset_y: f64,
        viewport_height: f64,
        prev_offset_y: f64,
        now: u64,
    ) -> StickyState {
        if !offset_y.is_finite() || !viewport_height.is_finite() || !prev_offset_y.is_finite() {
            return self.state;
        }

        let delta = (offset_y - prev_offset_y).abs();
        self.state.active = offset_y > self.config.activation_ratio * viewport_height;

        if offset_y == 0.0 && prev_offset_y > 0.0 {
            let velocity = self.last_delta.unwrap_or(delta);
            self.state.badge_scale = (velocity / self.config.badge_velocity_divisor).clamp(0.0, 1.0);
            self.state.badge_visible = true;
            self.hide_deadline.arm(now, self.config.badge_duration_ms);
            tracing::debug!(velocity, scale = self.state.badge_scale, "Returned to top, showing badge");
        }

        self.last_delta = Some(delta);
        self.state
    }

    /// Hide the badge before its timeout (the caller acted on it)
    pub fn dismiss_badge(&mut self) -> bool {
        self.hide_deadline.disarm();
        self.hide_badge()
    }

    /// Advance timers. Returns true when the badge was hidden.
    pub fn tick(&mut self, now: u64) -> bool {
        if self.hide_deadline.fire(now) {
            return self.hide_badge();
        }
        false
    }

    pub fn teardown(&mut self) {
        self.hide_deadline.disarm();
        self.last_delta = None;
        self.state = StickyState::default();
    }

    fn hide_badge(&mut self) -> bool {
        let was_visible = self.state.badge_visible;
        self.state.badge_visible = false;
        self.state.badge_scale = 0.0;
        was_visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> StickyAffordanceTracker {
        StickyAffordanceTracker::new(StickyConfig::default())
    }

    #[test]
    fn test_activation_boundary_both_directions() {
        let mut tracker = tracker();
        // 0.3 * 1000 = 300
        assert!(!tracker.on_scroll(300.0, 1000.0, 0.0, 0).active);
        assert!(tracker.on_scroll(300.5, 1000.0, 300.0, 1).active);
        assert!(tracker.on_scroll(900.0, 1000.0, 300.5, 2).active);
        assert!(!tracker.on_scroll(299.0, 1000.0, 900.0, 3).active);
    }

    #[test]
    fn test_badge_uses_preceding_delta() {
        let mut tracker = tracker();
        tracker.on_scroll(500.0, 1000.0, 0.0, 0);
        // Preceding event moved 20px
        tracker.on_scroll(480.0, 1000.0, 500.0, 10);
        let state = tracker.on_scroll(0.0, 1000.0, 480.0, 20);

        assert!(state.badge_visible);
        assert!((state.badge_scale - 0.4).abs() < 1e-9);
        assert!(!state.active);
    }

    #[test]
    fn test_badge_scale_clamped() {
        let mut tracker = tracker();
        tracker.on_scroll(400.0, 1000.0, 0.0, 0);
        let state = tracker.on_scroll(0.0, 1000.0, 400.0, 5);
        assert_eq!(state.badge_scale, 1.0);
    }

    #[test]
    fn test_badge_first_event_falls_back_to_current_delta() {
        let mut tracker = tracker();
        let state = tracker.on_scroll(0.0, 1000.0, 10.0, 0);
        assert!(state.badge_visible);
        assert!((state.badge_scale - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_badge_auto_hides() {
        let mut tracker = tracker();
        tracker.on_scroll(100.0, 1000.0, 0.0, 0);
        tracker.on_scroll(0.0, 1000.0, 100.0, 1000);

        assert!(!tracker.tick(3999));
        assert!(tracker.state().badge_visible);
        assert!(tracker.tick(4000));
        assert!(!tracker.state().badge_visible);
        assert_eq!(tracker.state().badge_scale, 0.0);
    }

    #[test]
    fn test_dismiss_cancels_timer() {
        let mut tracker = tracker();
        tracker.on_scroll(100.0, 1000.0, 0.0, 0);
        tracker.on_scroll(0.0, 1000.0, 100.0, 0);

        assert!(tracker.dismiss_badge());
        assert!(!tracker.dismiss_badge());
        assert!(!tracker.tick(10_000));
    }

    #[test]
    fn test_staying_at_top_does_not_rearm_badge() {
        let mut tracker = tracker();
        let state = tracker.on_scroll(0.0, 1000.0, 0.0, 0);
        assert!(!state.badge_visible);
    }

    #[test]
    fn test_non_finite_offsets_ignored() {
        let mut tracker = tracker();
        tracker.on_scroll(500.0, 1000.0, 0.0, 0);
        let state = tracker.on_scroll(f64::NAN, 1000.0, 500.0, 1);
        assert!(state.active);
    }
}
