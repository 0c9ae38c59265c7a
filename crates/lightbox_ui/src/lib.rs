//! lightbox_ui - host-agnostic UI primitives for the lightbox viewer
//!
//! This crate provides geometry, input events, small interaction state types
//! and the frame/timer scheduling used by the gesture engine and the viewer.

mod animation;
pub mod constants;
mod event;
mod layout;
mod state;

pub use animation::{Easing, FrameScheduler, Generation, Tween};
pub use event::{ChromeElement, Event, HitTarget, KeyCode, MouseButton, Touch, TouchId, WheelDelta};
pub use layout::{Point, Size, Vector};
pub use state::{DragState, ScrollState};

