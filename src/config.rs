//! Configuration file support for the lightbox viewer.
//!
//! This module provides serialization and deserialization of viewer tuning,
//! so hosts can ship their own thresholds and timings as JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::*;

/// Log level setting for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Viewer configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Zoom/pan gesture tuning
    #[serde(default)]
    pub gestures: GestureConfig,

    /// Swipe, tap and transition tuning
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Thumbnail strip layout
    #[serde(default)]
    pub thumbnails: ThumbnailConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Gesture section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Smallest scale (identity)
    pub min_scale: f32,
    /// Largest scale
    pub max_scale: f32,
    /// Scale reached by a double-tap from rest
    pub double_tap_scale: f32,
    /// Scale change per wheel pixel
    pub wheel_sensitivity: f32,
    /// Apply two-finger rotation
    pub enable_rotation: bool,
    /// Snap back to identity after every interaction
    pub elastic: bool,
    /// Allow panning while at the minimum scale
    pub pan_at_rest: bool,
    /// Double-tap zoom transition (ms)
    pub double_tap_duration_ms: u64,
    /// Reset transition (ms)
    pub reset_duration_ms: u64,
    /// Delay before an elastic reset (ms)
    pub elastic_delay_ms: u64,
    /// Wheel quiet period before an elastic reset (ms)
    pub wheel_settle_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            double_tap_scale: DOUBLE_TAP_SCALE,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            enable_rotation: false,
            elastic: false,
            pan_at_rest: false,
            double_tap_duration_ms: DOUBLE_TAP_ZOOM_DURATION_MS,
            reset_duration_ms: RESET_DURATION_MS,
            elastic_delay_ms: ELASTIC_RESET_DELAY_MS,
            wheel_settle_ms: WHEEL_SETTLE_DELAY_MS,
        }
    }
}

impl GestureConfig {
    pub fn double_tap_duration(&self) -> Duration {
        Duration::from_millis(self.double_tap_duration_ms)
    }

    pub fn reset_duration(&self) -> Duration {
        Duration::from_millis(self.reset_duration_ms)
    }

    pub fn elastic_delay(&self) -> Duration {
        Duration::from_millis(self.elastic_delay_ms)
    }

    pub fn wheel_settle(&self) -> Duration {
        Duration::from_millis(self.wheel_settle_ms)
    }
}

/// Navigation section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Horizontal travel before a drag becomes a swipe (px)
    pub swipe_activation_px: f32,
    /// Swipe distance needed to change image (px)
    pub commit_threshold_px: f32,
    /// Shortest slide transition (ms)
    pub min_transition_ms: u64,
    /// Longest slide transition (ms)
    pub max_transition_ms: u64,
    /// Longest press that still counts as a tap (ms)
    pub tap_max_duration_ms: u64,
    /// Largest travel that still counts as a tap (px)
    pub tap_max_movement_px: f32,
    /// Delay before a tap toggles the chrome (ms)
    pub chrome_toggle_delay_ms: u64,
    /// Close animation before the host is notified (ms)
    pub close_animation_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            swipe_activation_px: SWIPE_ACTIVATION_PX,
            commit_threshold_px: COMMIT_THRESHOLD_PX,
            min_transition_ms: MIN_TRANSITION_MS,
            max_transition_ms: MAX_TRANSITION_MS,
            tap_max_duration_ms: TAP_MAX_DURATION_MS,
            tap_max_movement_px: TAP_MAX_MOVEMENT_PX,
            chrome_toggle_delay_ms: CHROME_TOGGLE_DELAY_MS,
            close_animation_ms: CLOSE_ANIMATION_MS,
        }
    }
}

impl NavigationConfig {
    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }

    pub fn chrome_toggle_delay(&self) -> Duration {
        Duration::from_millis(self.chrome_toggle_delay_ms)
    }

    pub fn close_animation(&self) -> Duration {
        Duration::from_millis(self.close_animation_ms)
    }

    /// Slide duration for `distance` px on a track `width` px wide.
    ///
    /// Proportional to the distance, a full width taking the maximum, and
    /// clamped to `[min_transition_ms, max_transition_ms]`.
    pub fn transition_duration(&self, distance: f32, width: f32) -> Duration {
        let min = self.min_transition_ms as f32;
        let max = self.max_transition_ms.max(self.min_transition_ms) as f32;
        let ratio = if width > 0.0 && distance.is_finite() {
            (distance.abs() / width).min(1.0)
        } else {
            1.0
        };
        let millis = (max * ratio).clamp(min, max);
        Duration::from_millis(millis.round() as u64)
    }
}

/// Thumbnail strip section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Width of one thumbnail (px)
    pub item_width: f32,
    /// Space between thumbnails (px)
    pub gap: f32,
    /// Space before the first and after the last thumbnail (px)
    pub padding: f32,
    /// Smooth-scroll duration (ms)
    pub scroll_duration_ms: u64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            item_width: THUMBNAIL_WIDTH,
            gap: THUMBNAIL_GAP,
            padding: THUMBNAIL_STRIP_PADDING,
            scroll_duration_ms: THUMBNAIL_SCROLL_DURATION_MS,
        }
    }
}

impl ThumbnailConfig {
    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            gestures: GestureConfig::default(),
            navigation: NavigationConfig::default(),
            thumbnails: ThumbnailConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the values are usable together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gestures;
        let finite_positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, "must be finite and positive"))
            }
        };

        finite_positive("gestures.min_scale", g.min_scale)?;
        finite_positive("gestures.max_scale", g.max_scale)?;
        finite_positive("gestures.wheel_sensitivity", g.wheel_sensitivity)?;
        if g.max_scale < g.min_scale {
            return Err(ConfigError::invalid(
                "gestures.max_scale",
                "must not be smaller than min_scale",
            ));
        }
        if !(g.min_scale..=g.max_scale).contains(&g.double_tap_scale) {
            return Err(ConfigError::invalid(
                "gestures.double_tap_scale",
                "must lie between min_scale and max_scale",
            ));
        }

        let n = &self.navigation;
        finite_positive("navigation.swipe_activation_px", n.swipe_activation_px)?;
        finite_positive("navigation.commit_threshold_px", n.commit_threshold_px)?;
        finite_positive("navigation.tap_max_movement_px", n.tap_max_movement_px)?;
        if n.max_transition_ms < n.min_transition_ms {
            return Err(ConfigError::invalid(
                "navigation.max_transition_ms",
                "must not be smaller than min_transition_ms",
            ));
        }

        let t = &self.thumbnails;
        finite_positive("thumbnails.item_width", t.item_width)?;
        if !(t.gap.is_finite() && t.gap >= 0.0 && t.padding.is_finite() && t.padding >= 0.0) {
            return Err(ConfigError::invalid(
                "thumbnails.gap",
                "gap and padding must be finite and non-negative",
            ));
        }

        Ok(())
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "lightbox-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("lightbox").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("lightbox")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load_from_path(&path)
    }

    /// Try to load configuration from `path`, logging any failure.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to_path(&path)
    }

    /// Save configuration to `path`, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is out of range or inconsistent with another value
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}
