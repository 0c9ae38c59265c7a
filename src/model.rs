//! Image set supplied by the host.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::rc::Rc;

/// A single image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Source URL of the full-size image
    pub url: String,
    /// Optional alternative text
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }
}

/// Ordered, immutable list of images for one viewer session.
///
/// Cloning is cheap: every clone shares the host's allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ImageRef>", into = "Vec<ImageRef>")]
pub struct ImageSet(Rc<[ImageRef]>);

impl ImageSet {
    pub fn new(images: Vec<ImageRef>) -> Self {
        Self(images.into())
    }

    /// Build a set from bare URLs.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(urls.into_iter().map(ImageRef::new).collect())
    }

    /// Index of the last image, or `None` for an empty set.
    pub fn last_index(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }
}

impl Deref for ImageSet {
    type Target = [ImageRef];

    fn deref(&self) -> &[ImageRef] {
        &self.0
    }
}

impl From<Vec<ImageRef>> for ImageSet {
    fn from(images: Vec<ImageRef>) -> Self {
        Self::new(images)
    }
}

impl From<ImageSet> for Vec<ImageRef> {
    fn from(set: ImageSet) -> Self {
        set.0.to_vec()
    }
}
