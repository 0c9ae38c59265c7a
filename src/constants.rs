//! Global constants for the lightbox viewer
//!
//! These are the defaults behind `ViewerConfig`; the engine and the controller
//! read the configured values, never these constants directly.

// =============================================================================
// Scale
// =============================================================================

/// Smallest scale the engine allows (identity)
pub const MIN_SCALE: f32 = 1.0;

/// Largest scale the engine allows
pub const MAX_SCALE: f32 = 4.0;

/// Scale reached by a double-click/double-tap from rest
pub const DOUBLE_TAP_SCALE: f32 = 2.0;

/// Scale differences below this are treated as "unchanged"
pub const SCALE_EPSILON: f32 = 0.001;

// =============================================================================
// Wheel zoom
// =============================================================================

/// Scale change per wheel pixel (`scale' = scale - delta_y * k`)
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.0015;

/// Fraction of the remaining distance covered per animation frame
pub const WHEEL_BLEND_FACTOR: f32 = 0.18;

/// The blend loop stops once the scale delta falls below this
pub const WHEEL_SCALE_TOLERANCE: f32 = 0.0025;

/// The blend loop stops once the position delta (px) falls below this
pub const WHEEL_POSITION_TOLERANCE: f32 = 0.8;

/// Quiet period after the last wheel event before an elastic reset
pub const WHEEL_SETTLE_DELAY_MS: u64 = 120;

// =============================================================================
// Eased snaps
// =============================================================================

/// Double-click/double-tap zoom transition
pub const DOUBLE_TAP_ZOOM_DURATION_MS: u64 = 280;

/// Reset-to-identity transition; `is_zooming` stays set for this long
pub const RESET_DURATION_MS: u64 = 220;

/// Delay between the end of an interaction and an elastic reset
pub const ELASTIC_RESET_DELAY_MS: u64 = 150;

// =============================================================================
// Navigation
// =============================================================================

/// Horizontal movement (px) before a drag becomes a swipe
pub const SWIPE_ACTIVATION_PX: f32 = 8.0;

/// Swipe distance (px) needed to advance instead of snapping back
pub const COMMIT_THRESHOLD_PX: f32 = 80.0;

/// Shortest slide transition
pub const MIN_TRANSITION_MS: u64 = 120;

/// Longest slide transition (a full viewport width)
pub const MAX_TRANSITION_MS: u64 = 360;

/// Maximum press duration for a tap
pub const TAP_MAX_DURATION_MS: u64 = 200;

/// Maximum pointer travel (px) for a tap
pub const TAP_MAX_MOVEMENT_PX: f32 = 8.0;

/// Delay before a single tap toggles the chrome, leaving room for a double-tap
pub const CHROME_TOGGLE_DELAY_MS: u64 = 200;

/// Close animation played before the host is notified
pub const CLOSE_ANIMATION_MS: u64 = 180;

// =============================================================================
// Thumbnail strip
// =============================================================================

/// Default thumbnail width in the strip
pub const THUMBNAIL_WIDTH: f32 = 64.0;

/// Default spacing between thumbnails
pub const THUMBNAIL_GAP: f32 = 8.0;

/// Default padding at both ends of the strip
pub const THUMBNAIL_STRIP_PADDING: f32 = 8.0;

/// Smooth-scroll duration when the active thumbnail changes
pub const THUMBNAIL_SCROLL_DURATION_MS: u64 = 250;
