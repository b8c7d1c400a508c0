//! Pull-to-refresh lifecycle
//!
//! `Idle -> Pulling -> {Refreshing | Resetting} -> Idle`. The engine never
//! starts the refresh itself; [`PullToRefreshEngine::release`] tells the
//! caller to, and the caller reports back through
//! [`PullToRefreshEngine::complete_refresh`].

use serde::{Deserialize, Serialize};

use super::sampler::{GestureSample, GestureSampler, PullReading};
use crate::clock::Deadline;
use crate::config::PullConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullPhase {
    #[default]
    Idle,
    Pulling,
    Refreshing,
    Resetting,
}

/// Caller-visible pull indicator state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PullState {
    pub phase: PullPhase,
    pub distance: f64,
    pub velocity: f64,
    /// Indicator height held while refreshing; 0 in every other phase
    pub locked_height: f64,
}

/// What a touch release resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// No pull was in progress
    Ignored,
    /// Below threshold; springing back
    Reset,
    /// Threshold reached; the caller must start exactly one refresh
    Refresh,
}

#[derive(Debug, Clone)]
pub struct PullToRefreshEngine {
    config: PullConfig,
    sampler: GestureSampler,
    state: PullState,
    reset_deadline: Deadline,
}

impl PullToRefreshEngine {
    pub fn new(config: PullConfig) -> Self {
        Self {
            sampler: GestureSampler::new(config.clone()),
            config,
            state: PullState::default(),
            reset_deadline: Deadline::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> PullState {
        self.state
    }

    #[inline]
    pub fn phase(&self) -> PullPhase {
        self.state.phase
    }

    /// Start tracking a touch. Ignored while a previous gesture or refresh
    /// is still resolving.
    pub fn begin(&mut self, sample: GestureSample, scroll_offset: f64) -> bool {
        if self.state.phase != PullPhase::Idle {
            tracing::trace!(phase = ?self.state.phase, "Ignoring touch start while busy");
            return false;
        }
        self.sampler.begin(sample, scroll_offset)
    }

    pub fn update(&mut self, sample: GestureSample) -> Option<PullReading> {
        let reading = self.sampler.update(sample)?;

        match self.state.phase {
            PullPhase::Idle if reading.distance > 0.0 => {
                tracing::debug!(distance = reading.distance, "Pull started");
                self.state.phase = PullPhase::Pulling;
                self.state.distance = reading.distance;
                self.state.velocity = reading.velocity;
            }
            PullPhase::Pulling => {
                self.state.distance = reading.distance;
                self.state.velocity = reading.velocity;
            }
            _ => {}
        }

        Some(reading)
    }

    /// Resolve the gesture on touch release
    pub fn release(&mut self, now: u64) -> Release {
        self.sampler.end();

        if self.state.phase != PullPhase::Pulling {
            return Release::Ignored;
        }

        if self.state.distance >= self.config.refresh_threshold {
            tracing::debug!(distance = self.state.distance, "Pull released past threshold");
            self.state = PullState {
                phase: PullPhase::Refreshing,
                distance: self.config.locked_height,
                velocity: 0.0,
                locked_height: self.config.locked_height,
            };
            Release::Refresh
        } else {
            tracing::debug!(distance = self.state.distance, "Pull released below threshold");
            self.start_reset(now);
            Release::Reset
        }
    }

    /// Abandon a live pull (touch cancel, scroll moved, programmatic scroll).
    /// An in-flight refresh is left alone.
    pub fn cancel(&mut self, now: u64) -> bool {
        self.sampler.end();
        if self.state.phase == PullPhase::Pulling {
            tracing::debug!("Pull cancelled");
            self.start_reset(now);
            true
        } else {
            false
        }
    }

    /// Refresh settled (either way); spring back
    pub fn complete_refresh(&mut self, now: u64) -> bool {
        if self.state.phase != PullPhase::Refreshing {
            return false;
        }
        self.start_reset(now);
        true
    }

    /// Advance timers. Returns true when the phase changed.
    pub fn tick(&mut self, now: u64) -> bool {
        if self.state.phase == PullPhase::Resetting && self.reset_deadline.fire(now) {
            self.state = PullState::default();
            return true;
        }
        false
    }

    /// Hard reset on teardown, including from Refreshing
    pub fn teardown(&mut self) {
        self.sampler.end();
        self.reset_deadline.disarm();
        self.state = PullState::default();
    }

    fn start_reset(&mut self, now: u64) {
        if self.config.reset_duration_ms == 0 {
            self.reset_deadline.disarm();
            self.state = PullState::default();
            return;
        }
        self.state = PullState {
            phase: PullPhase::Resetting,
            ..PullState::default()
        };
        self.reset_deadline.arm(now, self.config.reset_duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PullToRefreshEngine {
        PullToRefreshEngine::new(PullConfig::default())
    }

    fn pull(engine: &mut PullToRefreshEngine, from: f64, to: f64) {
        assert!(engine.begin(GestureSample::new(from, 0.0), 0.0));
        engine.update(GestureSample::new(to, 200.0));
    }

    #[test]
    fn test_below_threshold_resets_scenario_a() {
        let mut engine = engine();
        pull(&mut engine, 100.0, 220.0);
        assert_eq!(engine.phase(), PullPhase::Pulling);
        assert_eq!(engine.state().distance, 60.0);

        assert_eq!(engine.release(1000), Release::Reset);
        assert_eq!(engine.phase(), PullPhase::Resetting);
        assert_eq!(engine.state().distance, 0.0);

        assert!(!engine.tick(1299));
        assert!(engine.tick(1300));
        assert_eq!(engine.state(), PullState::default());
    }

    #[test]
    fn test_past_threshold_refreshes_scenario_b() {
        let mut engine = engine();
        pull(&mut engine, 100.0, 400.0);
        assert_eq!(engine.state().distance, 120.0);

        assert_eq!(engine.release(500), Release::Refresh);
        let state = engine.state();
        assert_eq!(state.phase, PullPhase::Refreshing);
        assert_eq!(state.locked_height, 60.0);

        // Refreshing waits for completion, not for time
        assert!(!engine.tick(100_000));
        assert_eq!(engine.phase(), PullPhase::Refreshing);

        assert!(engine.complete_refresh(100_000));
        assert_eq!(engine.phase(), PullPhase::Resetting);
        assert_eq!(engine.state().locked_height, 0.0);
        engine.tick(100_300);
        assert_eq!(engine.phase(), PullPhase::Idle);
    }

    #[test]
    fn test_exact_threshold_refreshes() {
        let mut engine = engine();
        pull(&mut engine, 0.0, 160.0);
        assert_eq!(engine.state().distance, 80.0);
        assert_eq!(engine.release(0), Release::Refresh);
    }

    #[test]
    fn test_begin_ignored_while_not_idle() {
        let mut engine = engine();
        pull(&mut engine, 0.0, 400.0);
        engine.release(0);

        assert!(!engine.begin(GestureSample::new(0.0, 10.0), 0.0));
        assert!(engine.update(GestureSample::new(300.0, 20.0)).is_none());
        assert_eq!(engine.release(30), Release::Ignored);
        assert_eq!(engine.phase(), PullPhase::Refreshing);
    }

    #[test]
    fn test_cancel_leaves_refresh_running() {
        let mut engine = engine();
        pull(&mut engine, 0.0, 400.0);
        engine.release(0);

        assert!(!engine.cancel(10));
        assert_eq!(engine.phase(), PullPhase::Refreshing);
    }

    #[test]
    fn test_cancel_mid_pull_resets() {
        let mut engine = engine();
        pull(&mut engine, 0.0, 100.0);
        assert!(engine.cancel(10));
        assert_eq!(engine.phase(), PullPhase::Resetting);
        // A release after cancel has nothing to resolve
        assert_eq!(engine.release(20), Release::Ignored);
    }

    #[test]
    fn test_release_without_positive_sample_is_ignored() {
        let mut engine = engine();
        engine.begin(GestureSample::new(200.0, 0.0), 0.0);
        engine.update(GestureSample::new(150.0, 16.0));
        assert_eq!(engine.phase(), PullPhase::Idle);
        assert_eq!(engine.release(16), Release::Ignored);
    }

    #[test]
    fn test_teardown_from_refreshing() {
        let mut engine = engine();
        pull(&mut engine, 0.0, 400.0);
        engine.release(0);
        engine.teardown();
        assert_eq!(engine.state(), PullState::default());
        assert!(!engine.complete_refresh(5));
    }

    #[test]
    fn test_zero_reset_duration_returns_to_idle_immediately() {
        let config = PullConfig {
            reset_duration_ms: 0,
            ..Default::default()
        };
        let mut engine = PullToRefreshEngine::new(config);
        pull(&mut engine, 0.0, 40.0);
        engine.release(0);
        assert_eq!(engine.phase(), PullPhase::Idle);
    }
}
