//! Viewport offset controller
//!
//! User scrolling moves the offset immediately. Programmatic jumps
//! (`scroll_to`) animate with the configured easing so the feed visibly
//! travels; the host tells the scroll controller to stand aside for the
//! duration.

use std::sync::Arc;

use swipefeed_core::{Clock, EasingType};

use super::config::{ScrollConfig, ScrollConfigExt};

/// One eased run from `from` to `to`, timed on clock milliseconds
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start_ms: u64,
    from: f64,
    to: f64,
    duration_ms: u64,
    easing: EasingType,
}

impl ActiveAnimation {
    fn is_done(&self, now: u64) -> bool {
        now.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Offset in px at `now`; a clock behind `start_ms` stays at `from`
    fn offset_at(&self, now: u64) -> f64 {
        if self.duration_ms == 0 {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.start_ms) as f64;
        let t = (elapsed / self.duration_ms as f64).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * eased(self.easing, t)
    }
}

/// Ease-out curves over `t` in [0, 1]
fn eased(easing: EasingType, t: f64) -> f64 {
    let remaining = 1.0 - t;
    match easing {
        EasingType::None if t < 1.0 => 0.0,
        EasingType::None => 1.0,
        EasingType::Linear => t,
        EasingType::Cubic => 1.0 - remaining.powi(3),
        EasingType::Quintic => 1.0 - remaining.powi(5),
        EasingType::EaseOut if t >= 1.0 => 1.0,
        EasingType::EaseOut => 1.0 - 2.0_f64.powf(-10.0 * t),
    }
}

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    /// Current active animation (if any)
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    /// Current offset in px (always up-to-date)
    current: f64,
    clock: Arc<dyn Clock>,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
            clock,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final offset once any running animation completes
    pub fn target(&self) -> f64 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current)
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Move immediately, cancelling any animation
    pub fn set_offset(&mut self, offset: f64) {
        self.animation = None;
        self.current = offset.max(0.0);
    }

    /// User scroll by `delta` px, applied immediately
    pub fn scroll_by(&mut self, delta: f64, max_offset: f64) {
        self.set_offset((self.current + delta).clamp(0.0, max_offset.max(0.0)));
    }

    /// Animate to `target`. Jumps when smooth scrolling is disabled.
    pub fn scroll_to(&mut self, target: f64, max_offset: f64) {
        let target = target.clamp(0.0, max_offset.max(0.0));

        if !self.config.is_smooth() {
            self.set_offset(target);
            return;
        }

        if (self.current - target).abs() < f64::EPSILON {
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveAnimation {
            start_ms: self.clock.now_ms(),
            from: self.current,
            to: target,
            duration_ms: self.config.animation_duration().as_millis() as u64,
            easing: self.config.easing,
        });
    }

    /// Advance the animation; returns the current offset
    pub fn update(&mut self, max_offset: f64) -> f64 {
        let max_offset = max_offset.max(0.0);
        let now = self.clock.now_ms();

        match self.animation.take() {
            Some(anim) if anim.is_done(now) => self.current = anim.to.min(max_offset),
            Some(anim) => {
                self.current = anim.offset_at(now).min(max_offset);
                self.animation = Some(anim);
            }
            None => self.current = self.current.min(max_offset),
        }

        self.current
    }

    /// Stop at the current position
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipefeed_core::ManualClock;

    fn animator(config: ScrollConfig) -> (ScrollAnimator, ManualClock) {
        let clock = ManualClock::new();
        (ScrollAnimator::new(config, Arc::new(clock.clone())), clock)
    }

    fn jump(easing: EasingType) -> ActiveAnimation {
        ActiveAnimation {
            start_ms: 1_000,
            from: 1_000.0,
            to: 0.0,
            duration_ms: 800,
            easing,
        }
    }

    #[test]
    fn test_instant_when_disabled() {
        let (mut animator, _) = animator(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });
        animator.scroll_to(300.0, 1000.0);
        assert_eq!(animator.current(), 300.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_reaches_target_on_clock() {
        let (mut animator, clock) = animator(ScrollConfig {
            animation_duration_ms: 800,
            easing: EasingType::Linear,
            ..Default::default()
        });
        animator.set_offset(800.0);
        animator.scroll_to(0.0, 1000.0);
        assert!(animator.is_animating());
        assert_eq!(animator.target(), 0.0);

        clock.advance(400);
        assert_eq!(animator.update(1000.0), 400.0);

        clock.advance(400);
        assert_eq!(animator.update(1000.0), 0.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_halfway_offset_per_curve() {
        let halfway = 1_400;
        assert_eq!(jump(EasingType::None).offset_at(halfway), 1_000.0);
        assert_eq!(jump(EasingType::Linear).offset_at(halfway), 500.0);
        // 1 - 0.5^3 of the way there
        assert_eq!(jump(EasingType::Cubic).offset_at(halfway), 125.0);
        assert!((jump(EasingType::Quintic).offset_at(halfway) - 31.25).abs() < 1e-9);
        assert!((jump(EasingType::EaseOut).offset_at(halfway) - 31.25).abs() < 1e-9);
    }

    #[test]
    fn test_offset_moves_one_way_and_lands() {
        for easing in [
            EasingType::Linear,
            EasingType::Cubic,
            EasingType::Quintic,
            EasingType::EaseOut,
        ] {
            let anim = jump(easing);
            assert_eq!(anim.offset_at(1_000), 1_000.0, "{:?} start", easing);
            let mut prev = f64::MAX;
            for ms in (1_000..=1_800).step_by(40) {
                let offset = anim.offset_at(ms);
                assert!(offset <= prev, "{:?} went backwards at {}ms", easing, ms);
                prev = offset;
            }
            assert_eq!(anim.offset_at(1_800), 0.0, "{:?} end", easing);
            assert!(anim.is_done(1_800));
        }
    }

    #[test]
    fn test_clock_behind_start_holds_position() {
        let anim = jump(EasingType::Cubic);
        assert_eq!(anim.offset_at(500), 1_000.0);
        assert!(!anim.is_done(500));
    }

    #[test]
    fn test_user_scroll_clamped() {
        let (mut animator, _) = animator(ScrollConfig::default());
        animator.scroll_by(-50.0, 500.0);
        assert_eq!(animator.current(), 0.0);
        animator.scroll_by(900.0, 500.0);
        assert_eq!(animator.current(), 500.0);
    }

    #[test]
    fn test_user_scroll_cancels_animation() {
        let (mut animator, _) = animator(ScrollConfig::default());
        animator.set_offset(600.0);
        animator.scroll_to(0.0, 1000.0);
        animator.scroll_by(20.0, 1000.0);
        assert!(!animator.is_animating());
        assert_eq!(animator.current(), 620.0);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let (mut animator, _) = animator(ScrollConfig::default());
        animator.set_offset(900.0);
        assert_eq!(animator.update(300.0), 300.0);
    }
}
