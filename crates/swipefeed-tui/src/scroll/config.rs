//! Configuration helpers for programmatic scrolling

use std::time::Duration;

pub use swipefeed_core::ScrollConfig;

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Row step for one j/k press or wheel notch
    fn step_rows(&self) -> u16;

    /// Check if smooth scrolling is effectively enabled
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn step_rows(&self) -> u16 {
        self.scroll_lines.max(1)
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipefeed_core::EasingType;

    #[test]
    fn test_default_config() {
        let config = ScrollConfig::default();
        assert!(config.smooth_enabled);
        assert_eq!(config.animation_duration(), Duration::from_millis(800));
        assert_eq!(config.easing, EasingType::Cubic);
        assert_eq!(config.step_rows(), 1);
    }

    #[test]
    fn test_is_smooth() {
        let mut config = ScrollConfig::default();
        assert!(config.is_smooth());

        config.smooth_enabled = false;
        assert!(!config.is_smooth());

        config.smooth_enabled = true;
        config.animation_duration_ms = 0;
        assert!(!config.is_smooth());
    }

    #[test]
    fn test_step_rows_never_zero() {
        let config = ScrollConfig {
            scroll_lines: 0,
            ..Default::default()
        };
        assert_eq!(config.step_rows(), 1);
    }
}
