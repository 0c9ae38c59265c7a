//! Small interaction state types shared by the viewer components

use crate::{Point, Vector};

/// Pointer drag interaction state.
///
/// Remembers where the drag started and the offset the dragged content had at
/// that moment, so the current offset is always `start_offset + delta` and
/// never accumulates per-event rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging since `start_pos` (screen space) from `start_offset`
    Dragging {
        start_pos: Point,
        start_offset: Vector,
    },
}

impl DragState {
    /// Start dragging at `pos` with the content currently at `offset`
    pub fn start_drag(&mut self, pos: Point, offset: Vector) {
        *self = DragState::Dragging {
            start_pos: pos,
            start_offset: offset,
        };
    }

    /// Offset the content should have with the pointer at `current`
    pub fn offset_for(&self, current: Point) -> Option<Vector> {
        match *self {
            DragState::Dragging {
                start_pos,
                start_offset,
            } => Some(start_offset + (current - start_pos)),
            DragState::Idle => None,
        }
    }
}

/// State for a one-axis scrollable strip
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Horizontal scroll offset (positive = scrolled right)
    pub offset: f32,
    /// Largest reachable offset
    pub max_offset: f32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scrollable range from content and viewport extents.
    pub fn set_extent(&mut self, content: f32, viewport: f32) {
        self.max_offset = (content - viewport).max(0.0);
        self.offset = self.clamp(self.offset);
    }

    /// Clamp an offset into the scrollable range.
    pub fn clamp(&self, offset: f32) -> f32 {
        if offset.is_finite() {
            offset.clamp(0.0, self.max_offset)
        } else {
            0.0
        }
    }

    /// Scroll to a specific offset (clamped)
    pub fn scroll_to(&mut self, offset: f32) {
        self.offset = self.clamp(offset);
    }
}
