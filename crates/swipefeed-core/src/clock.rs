//! Injectable time source and one-shot deadlines
//!
//! Every timing-dependent behavior of the controller (badge auto-hide, the
//! Resetting phase, programmatic scroll suppression) is expressed as a
//! [`Deadline`] checked against a [`Clock`], so tests can drive time with
//! [`ManualClock`] instead of sleeping.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock: Debug + Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Jump to an absolute time. Going backwards is ignored.
    pub fn set(&self, ms: u64) {
        self.now.fetch_max(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A one-shot timer expressed as an absolute expiry time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<u64>,
}

impl Deadline {
    /// Arm (or re-arm) the deadline `duration_ms` after `now`
    pub fn arm(&mut self, now: u64, duration_ms: u64) {
        self.at = Some(now.saturating_add(duration_ms));
    }

    pub fn disarm(&mut self) {
        self.at = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Armed and not yet expired
    #[inline]
    pub fn is_pending(&self, now: u64) -> bool {
        matches!(self.at, Some(at) if now < at)
    }

    /// Returns true exactly once when the deadline has passed, disarming it
    pub fn fire(&mut self, now: u64) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds left before expiry
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.at.map(|at| at.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(250);
        assert_eq!(other.now_ms(), 250);

        other.set(100);
        assert_eq!(clock.now_ms(), 250);
        other.set(900);
        assert_eq!(clock.now_ms(), 900);
    }

    #[test]
    fn test_deadline_fires_once() {
        let mut deadline = Deadline::default();
        assert!(!deadline.fire(0));

        deadline.arm(1000, 3000);
        assert!(deadline.is_pending(3999));
        assert!(!deadline.fire(3999));
        assert_eq!(deadline.remaining(3500), Some(500));
        assert!(deadline.fire(4000));
        assert!(!deadline.fire(5000));
        assert!(!deadline.is_armed());
    }

    #[test]
    fn test_rearm_extends_deadline() {
        let mut deadline = Deadline::default();
        deadline.arm(0, 100);
        deadline.arm(80, 100);
        assert!(!deadline.fire(150));
        assert!(deadline.fire(180));
    }
}
