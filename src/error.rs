//! Error types for constructing a viewer.

use thiserror::Error;

/// Errors that can occur when opening a viewer.
///
/// Event handling never fails; these only guard construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// The host supplied no images
    #[error("Cannot open a viewer on an empty image set")]
    EmptyImageSet,
}
