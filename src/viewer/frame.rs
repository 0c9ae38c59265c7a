//! Render snapshot handed to the host.

use crate::model::ImageRef;
use crate::zoom_math::TransformState;
use serde::Serialize;
use std::ops::Range;

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerFrame {
    pub active_index: usize,
    pub active_image: ImageRef,
    /// Presented transform of the active image
    pub transform: TransformState,
    /// Horizontal offset of the image track (px)
    pub track_offset: f32,
    /// Image to draw left of the active one, only while a move is in flight
    pub previous_panel: Option<ImageRef>,
    /// Image to draw right of the active one, only while a move is in flight
    pub next_panel: Option<ImageRef>,
    pub chrome_visible: bool,
    pub closing: bool,
    pub transition_active: bool,
    pub wheeling: bool,
    pub zooming: bool,
    pub thumbnail_offset: f32,
    pub visible_thumbnails: Range<usize>,
}
