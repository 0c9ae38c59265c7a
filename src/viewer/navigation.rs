//! Slide navigation state.

use lightbox_ui::Tween;
use serde::Serialize;
use web_time::Instant;

/// Direction the image track travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideDirection {
    /// Track moves left, bringing in a higher index
    Left,
    /// Track moves right, bringing in a lower index
    Right,
}

impl SlideDirection {
    /// Direction for a track move from `from` to `to` (px).
    pub fn of_move(from: f32, to: f32) -> Self {
        if to < from {
            SlideDirection::Left
        } else {
            SlideDirection::Right
        }
    }
}

/// An in-flight horizontal move of the image track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideTransition {
    pub direction: SlideDirection,
    /// Index that becomes active on completion; `None` snaps back
    pub target_index: Option<usize>,
    /// Track offset over time (px)
    pub track: Tween,
}

impl SlideTransition {
    pub fn track_offset(&self, now: Instant) -> f32 {
        self.track.value(now)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.track.is_finished(now)
    }
}

/// Navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NavState {
    #[default]
    Idle,
    /// Single-pointer horizontal drag past the activation threshold
    SwipeArmed { offset: f32 },
    /// Two or more fingers down; the gesture engine owns the input
    PinchActive,
    AnimatingTransition(SlideTransition),
}

impl NavState {
    pub fn name(&self) -> &'static str {
        match self {
            NavState::Idle => "idle",
            NavState::SwipeArmed { .. } => "swipe-armed",
            NavState::PinchActive => "pinch-active",
            NavState::AnimatingTransition(_) => "animating",
        }
    }

    /// Track offset at `now` (px, negative = moved left).
    pub fn track_offset(&self, now: Instant) -> f32 {
        match self {
            NavState::SwipeArmed { offset } => *offset,
            NavState::AnimatingTransition(transition) => transition.track_offset(now),
            NavState::Idle | NavState::PinchActive => 0.0,
        }
    }
}

/// Constrain a raw swipe offset so the first and last image cannot be
/// dragged past.
pub fn bounded_offset(delta_x: f32, active: usize, last: usize) -> f32 {
    if (delta_x > 0.0 && active == 0) || (delta_x < 0.0 && active >= last) {
        0.0
    } else {
        delta_x
    }
}
