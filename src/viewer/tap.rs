//! Single-pointer press tracking for tap and swipe detection.

use crate::config::NavigationConfig;
use lightbox_ui::{Point, TouchId, Vector};
use web_time::Instant;

/// What drives the pointer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerSource {
    Mouse,
    Touch(TouchId),
}

/// One press from down to up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PointerSession {
    pub source: PointerSource,
    pub start: Point,
    pub last: Point,
    pub started_at: Instant,
    /// Moved further than the tap slop at some point
    pub exceeded_slop: bool,
    /// The gesture engine is panning with this pointer
    pub panning: bool,
    /// A second finger joined; never a tap or a swipe
    pub multi_touch: bool,
}

impl PointerSession {
    pub fn new(source: PointerSource, position: Point, now: Instant) -> Self {
        Self {
            source,
            start: position,
            last: position,
            started_at: now,
            exceeded_slop: false,
            panning: false,
            multi_touch: false,
        }
    }

    /// Record a move and return the displacement since the press.
    pub fn move_to(&mut self, position: Point, slop: f32) -> Vector {
        self.last = position;
        let delta = position - self.start;
        if delta.length() >= slop {
            self.exceeded_slop = true;
        }
        delta
    }

    /// Whether releasing at `now` completes a tap.
    pub fn is_tap(&self, now: Instant, config: &NavigationConfig) -> bool {
        !self.exceeded_slop
            && !self.multi_touch
            && now.saturating_duration_since(self.started_at) < config.tap_max_duration()
            && self.last.distance(self.start) < config.tap_max_movement_px
    }
}
