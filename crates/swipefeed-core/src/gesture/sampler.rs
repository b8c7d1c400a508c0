//! Raw pointer samples to resisted pull distance and velocity

use serde::{Deserialize, Serialize};

use crate::config::PullConfig;

/// One pointer position reported during a touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub y: f64,
    pub timestamp_ms: f64,
}

impl GestureSample {
    pub fn new(y: f64, timestamp_ms: f64) -> Self {
        Self { y, timestamp_ms }
    }

    /// Drop non-finite samples and clamp negative timestamps to zero
    fn sanitize(self) -> Option<Self> {
        if !self.y.is_finite() || !self.timestamp_ms.is_finite() {
            return None;
        }
        Some(Self {
            y: self.y,
            timestamp_ms: self.timestamp_ms.max(0.0),
        })
    }
}

/// Result of feeding one sample into the sampler
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PullReading {
    /// Resisted distance in `[0, max_pull]`
    pub distance: f64,
    /// Instantaneous velocity of the resisted distance
    pub velocity: f64,
    /// The host must prevent the native scroll for this sample
    pub suppress_native: bool,
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    start_y: f64,
    last: GestureSample,
    last_distance: f64,
}

/// Tracks one pull gesture anchored at the top of the scroll range
#[derive(Debug, Clone)]
pub struct GestureSampler {
    config: PullConfig,
    anchor: Option<Anchor>,
}

/// Resisted pull distance for a raw drag of `diff` px
#[inline]
pub fn resisted_distance(diff: f64, config: &PullConfig) -> f64 {
    if diff <= 0.0 {
        return 0.0;
    }
    (diff * config.resistance).min(config.max_pull)
}

impl GestureSampler {
    pub fn new(config: PullConfig) -> Self {
        Self {
            config,
            anchor: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// Anchor a gesture. Refused unless the viewport sits exactly at the top
    /// and no gesture is already being tracked.
    pub fn begin(&mut self, sample: GestureSample, scroll_offset: f64) -> bool {
        if self.anchor.is_some() || scroll_offset != 0.0 {
            return false;
        }
        let Some(sample) = sample.sanitize() else {
            return false;
        };

        self.anchor = Some(Anchor {
            start_y: sample.y,
            last: sample,
            last_distance: 0.0,
        });
        true
    }

    /// Feed a move sample. Returns `None` when no gesture is active or the
    /// sample is rejected (non-finite, or older than the previous one).
    pub fn update(&mut self, sample: GestureSample) -> Option<PullReading> {
        let config = &self.config;
        let anchor = self.anchor.as_mut()?;
        let sample = sample.sanitize()?;
        if sample.timestamp_ms < anchor.last.timestamp_ms {
            tracing::trace!(
                previous = anchor.last.timestamp_ms,
                current = sample.timestamp_ms,
                "Dropping out-of-order gesture sample"
            );
            return None;
        }

        let diff = sample.y - anchor.start_y;
        let distance = resisted_distance(diff, config);
        let dt = (sample.timestamp_ms - anchor.last.timestamp_ms).max(1.0);
        let velocity = (distance - anchor.last_distance).abs() / dt * config.velocity_scale;

        anchor.last = sample;
        anchor.last_distance = distance;

        Some(PullReading {
            distance,
            velocity,
            suppress_native: diff > config.native_scroll_guard,
        })
    }

    /// Forget the current gesture
    pub fn end(&mut self) {
        self.anchor = None;
    }
}
