//! Zoom-to-anchor and bounds mathematics.
//!
//! This module contains the geometry behind every zoom and pan operation,
//! extracted for testability and reusability.
//!
//! Coordinates: the image is laid out centered in the viewport at its
//! "display size" (the fitted size at scale 1), then transformed by
//! `translate(translation) rotate(rotation) scale(scale)` about its center.
//! "Local" coordinates are offsets from the image center before rotation and
//! scaling; "relative" coordinates are screen offsets from the viewport
//! center.

use lightbox_ui::constants::MIN_DISTANCE_EPSILON;
use lightbox_ui::{Size, Vector};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Which viewport dimension constrains the image at scale 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// The image spans the viewport width
    #[default]
    FitWidth,
    /// The image spans the viewport height
    FitHeight,
}

/// Pan/zoom/rotate transform of the active image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub scale: f32,
    /// Offset of the image center from the viewport center (px)
    pub translation: Vector,
    pub rotation_deg: f32,
    pub fit_mode: FitMode,
}

impl TransformState {
    /// Create an identity transform (scale=1, no pan, no rotation).
    pub fn identity() -> Self {
        Self::identity_with_fit(FitMode::default())
    }

    /// Identity transform that keeps a known fit mode.
    pub fn identity_with_fit(fit_mode: FitMode) -> Self {
        Self {
            scale: 1.0,
            translation: Vector::ZERO,
            rotation_deg: 0.0,
            fit_mode,
        }
    }

    pub fn rotation_rad(&self) -> f32 {
        self.rotation_deg.to_radians()
    }

    /// Whether this is the identity transform, within `epsilon`.
    pub fn is_identity(&self, epsilon: f32) -> bool {
        (self.scale - 1.0).abs() < epsilon
            && self.translation.length() < epsilon
            && self.rotation_deg.abs() < epsilon
    }

    /// Scale floored away from zero so it can be divided by.
    fn safe_scale(&self) -> f32 {
        if self.scale.is_finite() {
            self.scale.max(MIN_DISTANCE_EPSILON)
        } else {
            1.0
        }
    }

    /// Map a local image point to its offset from the viewport center.
    pub fn to_relative(&self, local: Vector) -> Vector {
        self.translation + local.rotated(self.rotation_rad()) * self.scale
    }

    /// Map an offset from the viewport center back to local image coordinates.
    pub fn to_local(&self, relative: Vector) -> Vector {
        (relative - self.translation).rotated(-self.rotation_rad()) * (1.0 / self.safe_scale())
    }

    /// Translation that keeps the point under `anchor` fixed while moving to
    /// `new_scale` and `new_rotation_deg`.
    ///
    /// `anchor` is relative to the viewport center. The vector from the image
    /// center to the anchor is expressed in local coordinates, scaled by the
    /// scale ratio, rotated by the rotation delta, and the translation is
    /// solved so the anchor maps onto itself again.
    pub fn zoom_about(&self, anchor: Vector, new_scale: f32, new_rotation_deg: f32) -> Vector {
        self.zoom_about_moved(anchor, anchor, new_scale, new_rotation_deg)
    }

    /// Like [`zoom_about`](Self::zoom_about), but the local point under
    /// `from_anchor` ends up under `to_anchor` (pinch with a moving midpoint).
    pub fn zoom_about_moved(
        &self,
        from_anchor: Vector,
        to_anchor: Vector,
        new_scale: f32,
        new_rotation_deg: f32,
    ) -> Vector {
        let local = self.to_local(from_anchor);
        let moved = local.rotated(new_rotation_deg.to_radians()) * new_scale;
        let translation = to_anchor - moved;
        if translation.is_finite() {
            translation
        } else {
            self.translation
        }
    }

    /// Linear interpolation of every component towards `target`.
    pub fn lerp(&self, target: &TransformState, t: f32) -> TransformState {
        TransformState {
            scale: self.scale + (target.scale - self.scale) * t,
            translation: self.translation.lerp(target.translation, t),
            rotation_deg: self.rotation_deg + (target.rotation_deg - self.rotation_deg) * t,
            fit_mode: target.fit_mode,
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Decide whether an image of `natural` size is width- or height-constrained
/// inside `viewport`.
pub fn compute_fit_mode(natural: Size, viewport: Size) -> FitMode {
    match (natural.aspect_ratio(), viewport.aspect_ratio()) {
        (Some(image), Some(view)) if image < view => FitMode::FitHeight,
        _ => FitMode::FitWidth,
    }
}

/// Size of the image at scale 1 (contain-fit into the viewport).
///
/// Without a known natural size the image is assumed to fill the viewport.
pub fn display_size(natural: Option<Size>, viewport: Size) -> Size {
    let Some(aspect) = natural.and_then(|n| n.aspect_ratio()) else {
        return viewport;
    };
    if !viewport.is_usable() {
        return viewport;
    }
    match compute_fit_mode(natural.unwrap_or(viewport), viewport) {
        FitMode::FitWidth => Size::new(viewport.width, viewport.width / aspect),
        FitMode::FitHeight => Size::new(viewport.height * aspect, viewport.height),
    }
}

/// Half extents of the axis-aligned bounding box of the displayed image at
/// `scale` and `rotation_deg`.
pub fn rotated_half_extents(display: Size, scale: f32, rotation_deg: f32) -> Vector {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let w = display.width * scale;
    let h = display.height * scale;
    Vector::new((w * cos + h * sin) / 2.0, (w * sin + h * cos) / 2.0)
}

/// Correct `candidate` so the rotated bounding box respects the centered
/// viewport frame on every edge.
///
/// On an axis where the box is larger than the viewport, neither edge may be
/// pulled inside the frame. On an axis where it is smaller, neither edge may
/// leave it. Non-finite components collapse to 0.
pub fn clamp_translation(
    candidate: Vector,
    scale: f32,
    rotation_deg: f32,
    display: Size,
    viewport: Size,
) -> Vector {
    if !viewport.is_usable() || !display.is_usable() || !scale.is_finite() {
        return Vector::ZERO;
    }
    let rotation_deg = if rotation_deg.is_finite() {
        rotation_deg
    } else {
        0.0
    };
    let half = rotated_half_extents(display, scale, rotation_deg);
    let clamp_axis = |value: f32, half_extent: f32, half_view: f32| {
        if !value.is_finite() {
            return 0.0;
        }
        let limit = (half_extent - half_view).abs();
        value.clamp(-limit, limit)
    };
    Vector::new(
        clamp_axis(candidate.x, half.x, viewport.width / 2.0),
        clamp_axis(candidate.y, half.y, viewport.height / 2.0),
    )
}

/// Normalize an angle to `(-PI, PI]`. Non-finite input maps to 0.
pub fn normalize_angle(radians: f32) -> f32 {
    if !radians.is_finite() {
        return 0.0;
    }
    let mut angle = radians % TAU;
    if angle <= -PI {
        angle += TAU;
    } else if angle > PI {
        angle -= TAU;
    }
    angle
}
