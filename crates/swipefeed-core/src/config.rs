use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Tuning for one mounted scroll controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub pull: PullConfig,
    #[serde(default)]
    pub sticky: StickyConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// How long scroll/touch input is ignored after a programmatic scroll starts
    #[serde(default = "default_programmatic_scroll_ms")]
    pub programmatic_scroll_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Damping factor applied to the raw drag distance
    #[serde(default = "default_resistance")]
    pub resistance: f64,
    /// Upper bound of the resisted pull distance (px)
    #[serde(default = "default_max_pull")]
    pub max_pull: f64,
    /// Multiplier turning px/ms into the reported velocity
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,
    /// Resisted distance at which a release triggers a refresh (px)
    #[serde(default = "default_refresh_threshold")]
    pub refresh_threshold: f64,
    /// Indicator height held while refreshing (px)
    #[serde(default = "default_locked_height")]
    pub locked_height: f64,
    /// Raw drag beyond which native scrolling must be suppressed (px)
    #[serde(default = "default_native_scroll_guard")]
    pub native_scroll_guard: f64,
    /// Length of the Resetting phase (0 = immediate)
    #[serde(default = "default_reset_duration_ms")]
    pub reset_duration_ms: u64,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            resistance: default_resistance(),
            max_pull: default_max_pull(),
            velocity_scale: default_velocity_scale(),
            refresh_threshold: default_refresh_threshold(),
            locked_height: default_locked_height(),
            native_scroll_guard: default_native_scroll_guard(),
            reset_duration_ms: default_reset_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyConfig {
    /// Fraction of the viewport height past which the affordance turns sticky
    #[serde(default = "default_activation_ratio")]
    pub activation_ratio: f64,
    /// Scroll delta (px per event) that maps to a full-size badge
    #[serde(default = "default_badge_velocity_divisor")]
    pub badge_velocity_divisor: f64,
    /// Badge auto-hide delay
    #[serde(default = "default_badge_duration_ms")]
    pub badge_duration_ms: u64,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            activation_ratio: default_activation_ratio(),
            badge_velocity_divisor: default_badge_velocity_divisor(),
            badge_duration_ms: default_badge_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Distance below the viewport bottom at which the sentinel counts as visible (px)
    #[serde(default = "default_proximity_margin")]
    pub proximity_margin: f64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            proximity_margin: default_proximity_margin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Logical pixels represented by one terminal row
    #[serde(default = "default_row_height_px")]
    pub row_height_px: f64,
    /// Terminal rows per feed item
    #[serde(default = "default_item_rows")]
    pub item_rows: u16,
    /// Programmatic scroll animation
    #[serde(default)]
    pub smooth_scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            row_height_px: default_row_height_px(),
            item_rows: default_item_rows(),
            smooth_scroll: ScrollConfig::default(),
        }
    }
}

/// Easing curve for programmatic scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Kept equal to `controller.programmatic_scroll_ms` by default so the
    /// controller stays suppressed for the whole animation
    #[serde(default = "default_programmatic_scroll_ms")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows moved per j/k press
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_programmatic_scroll_ms(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
        }
    }
}

/// Demo data layer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Items per loaded page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Pages available before the feed reports exhaustion
    #[serde(default = "default_pages")]
    pub pages: usize,
    /// Simulated latency of refresh/load operations
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Fail every Nth operation (0 = never)
    #[serde(default)]
    pub fail_every: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            pages: default_pages(),
            latency_ms: default_latency_ms(),
            fail_every: 0,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swipefeed")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_resistance() -> f64 {
    0.5
}

fn default_max_pull() -> f64 {
    120.0
}

fn default_velocity_scale() -> f64 {
    100.0
}

fn default_refresh_threshold() -> f64 {
    80.0
}

fn default_locked_height() -> f64 {
    60.0
}

fn default_native_scroll_guard() -> f64 {
    10.0
}

fn default_reset_duration_ms() -> u64 {
    300
}

fn default_activation_ratio() -> f64 {
    0.3
}

fn default_badge_velocity_divisor() -> f64 {
    50.0
}

fn default_badge_duration_ms() -> u64 {
    3000
}

fn default_proximity_margin() -> f64 {
    100.0
}

fn default_programmatic_scroll_ms() -> u64 {
    800
}

fn default_tick_rate() -> u64 {
    16 // ~60fps so pull feedback tracks the pointer
}

fn default_row_height_px() -> f64 {
    20.0
}

fn default_item_rows() -> u16 {
    3
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_page_size() -> usize {
    12
}

fn default_pages() -> usize {
    4
}

fn default_latency_ms() -> u64 {
    600
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl ControllerConfig {
    /// Reject values that would make a sub-machine unreachable or degenerate
    pub fn validate(&self) -> crate::Result<()> {
        let pull = &self.pull;
        let finite_positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(crate::Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )))
            }
        };

        finite_positive("pull.resistance", pull.resistance)?;
        finite_positive("pull.max_pull", pull.max_pull)?;
        finite_positive("pull.velocity_scale", pull.velocity_scale)?;
        finite_positive("pull.refresh_threshold", pull.refresh_threshold)?;
        finite_positive("sticky.activation_ratio", self.sticky.activation_ratio)?;
        finite_positive("sticky.badge_velocity_divisor", self.sticky.badge_velocity_divisor)?;

        if pull.refresh_threshold > pull.max_pull {
            return Err(crate::Error::Config(format!(
                "pull.refresh_threshold ({}) exceeds pull.max_pull ({}); refresh could never trigger",
                pull.refresh_threshold, pull.max_pull
            )));
        }
        if !(pull.locked_height.is_finite() && pull.locked_height >= 0.0) {
            return Err(crate::Error::Config(format!(
                "pull.locked_height must be >= 0, got {}",
                pull.locked_height
            )));
        }
        if !(pull.native_scroll_guard.is_finite() && pull.native_scroll_guard >= 0.0) {
            return Err(crate::Error::Config(format!(
                "pull.native_scroll_guard must be >= 0, got {}",
                pull.native_scroll_guard
            )));
        }
        if !(self.pagination.proximity_margin.is_finite() && self.pagination.proximity_margin >= 0.0) {
            return Err(crate::Error::Config(format!(
                "pagination.proximity_margin must be >= 0, got {}",
                self.pagination.proximity_margin
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.controller.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/swipefeed/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("swipefeed")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("swipefeed.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_controller_constants() {
        let config = ControllerConfig::default();
        assert_eq!(config.pull.resistance, 0.5);
        assert_eq!(config.pull.max_pull, 120.0);
        assert_eq!(config.pull.velocity_scale, 100.0);
        assert_eq!(config.pull.refresh_threshold, 80.0);
        assert_eq!(config.pull.locked_height, 60.0);
        assert_eq!(config.pull.native_scroll_guard, 10.0);
        assert_eq!(config.sticky.activation_ratio, 0.3);
        assert_eq!(config.sticky.badge_velocity_divisor, 50.0);
        assert_eq!(config.sticky.badge_duration_ms, 3000);
        assert_eq!(config.pagination.proximity_margin, 100.0);
        assert_eq!(config.programmatic_scroll_ms, 800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [controller.pull]
            refresh_threshold = 100.0

            [ui.smooth_scroll]
            easing = "quintic"
            "#,
        )
        .unwrap();

        assert_eq!(config.controller.pull.refresh_threshold, 100.0);
        assert_eq!(config.controller.pull.max_pull, 120.0);
        assert_eq!(config.ui.smooth_scroll.easing, EasingType::Quintic);
        assert_eq!(config.feed.pages, 4);
    }

    #[test]
    fn test_unreachable_threshold_rejected() {
        let mut config = ControllerConfig::default();
        config.pull.refresh_threshold = 200.0;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        let mut config = ControllerConfig::default();
        config.pull.resistance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_keeps_sections() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[controller.pull]"));
        assert!(rendered.contains("[feed]"));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        let path = PathBuf::from("/tmp/swipefeed");
        assert_eq!(expand_tilde(&path), path);
    }
}
