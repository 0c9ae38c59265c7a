//! Centralized constants for lightbox_ui
//!
//! Values shared by every component that consumes host input.

// =============================================================================
// Input
// =============================================================================

/// Pixels per line for `WheelDelta::Lines` (the browser default line height)
pub const WHEEL_LINE_HEIGHT: f32 = 16.0;

/// Smallest distance treated as non-zero.
/// Degenerate pinch distances and vectors are floored to this value.
pub const MIN_DISTANCE_EPSILON: f32 = 0.0001;
