//! Lightbox - full-screen image viewer core
//!
//! Pan/zoom/rotate gestures, slide navigation between images and thumbnail
//! strip synchronisation, driven by host events and an animation-frame tick.

pub mod config;
pub mod constants;
mod error;
mod gesture;
mod model;
mod thumbnails;
mod viewer;
pub mod zoom_math;

pub use config::{ConfigError, GestureConfig, LogLevel, NavigationConfig, ThumbnailConfig, ViewerConfig};
pub use error::ViewerError;
pub use gesture::GestureTransformEngine;
pub use model::{ImageRef, ImageSet};
pub use thumbnails::ThumbnailSynchronizer;
pub use viewer::{CloseCallback, NavState, SlideDirection, SlideTransition, ViewerController, ViewerFrame};
pub use zoom_math::{FitMode, TransformState};

pub use lightbox_ui;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
