//! Two-finger pinch/rotate tracking.

use crate::config::GestureConfig;
use crate::constants::SCALE_EPSILON;
use crate::zoom_math::{TransformState, normalize_angle};
use lightbox_ui::constants::MIN_DISTANCE_EPSILON;
use lightbox_ui::{Point, Touch, TouchId, Vector};

/// Snapshot taken when two fingers land, plus the running rotation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PinchTracker {
    ids: (TouchId, TouchId),
    start: TransformState,
    start_distance: f32,
    /// Midpoint at pinch start, relative to the viewport center
    start_midpoint: Vector,
    last_angle: f32,
    /// Sum of per-frame angle deltas (radians)
    rotation: f32,
}

impl PinchTracker {
    pub fn new(a: Touch, b: Touch, center: Point, start: TransformState) -> Self {
        Self {
            ids: (a.id, b.id),
            start,
            start_distance: a.position.distance(b.position).max(MIN_DISTANCE_EPSILON),
            start_midpoint: a.position.midpoint(b.position) - center,
            last_angle: (b.position - a.position).angle(),
            rotation: 0.0,
        }
    }

    /// Whether this tracker follows exactly the touches `a` and `b`.
    pub fn tracks(&self, a: &Touch, b: &Touch) -> bool {
        self.ids == (a.id, b.id)
    }

    /// Accumulated rotation in degrees.
    pub fn rotation_deg(&self) -> f32 {
        self.rotation.to_degrees()
    }

    /// Unclamped transform for the current finger positions.
    ///
    /// The local point under the starting midpoint follows the current
    /// midpoint, so a two-finger drag pans while it zooms.
    pub fn update(
        &mut self,
        a: Touch,
        b: Touch,
        center: Point,
        config: &GestureConfig,
    ) -> Option<TransformState> {
        if !a.position.is_finite() || !b.position.is_finite() {
            log::trace!("Ignoring non-finite pinch input");
            return None;
        }

        let distance = a.position.distance(b.position).max(MIN_DISTANCE_EPSILON);
        let scale = (self.start.scale * distance / self.start_distance)
            .clamp(config.min_scale, config.max_scale);

        if config.enable_rotation {
            let angle = (b.position - a.position).angle();
            self.rotation += normalize_angle(angle - self.last_angle);
            self.last_angle = angle;
        }
        let rotation_deg = if config.enable_rotation {
            self.start.rotation_deg + self.rotation_deg()
        } else {
            self.start.rotation_deg
        };

        let midpoint = a.position.midpoint(b.position) - center;
        let at_rest = |s: f32| s <= config.min_scale + SCALE_EPSILON;
        let translation = if !config.pan_at_rest && at_rest(self.start.scale) && at_rest(scale) {
            // Horizontal movement at rest belongs to slide navigation
            Vector::ZERO
        } else {
            self.start
                .zoom_about_moved(self.start_midpoint, midpoint, scale, rotation_deg)
        };

        Some(TransformState {
            scale,
            translation,
            rotation_deg,
            fit_mode: self.start.fit_mode,
        })
    }
}
