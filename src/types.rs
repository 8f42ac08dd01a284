//! Core catalog types shared by every layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// Opaque puzzle identifier.
///
/// The backend reports ids as strings or numbers; both normalize to the
/// same textual form so `42` and `"42"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PuzzleId(String);

impl PuzzleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PuzzleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PuzzleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for PuzzleId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Schema.org style metadata carried by some backend variants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    pub content_url: Option<String>,
    pub identifier: Option<String>,
    pub dominant_feature: Option<String>,
}

/// A puzzle image as received from the backend. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub id: PuzzleId,
    /// Filename under the image path, or an absolute content URL
    pub display_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

impl Image {
    pub fn new(id: impl Into<PuzzleId>, display_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_ref: display_ref.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Resolve a displayable URL for this image.
    ///
    /// Absolute content URLs are returned as is; bare filenames are resolved
    /// against `images_base` (which must end with a slash).
    pub fn image_url(&self, images_base: &Url) -> Result<Url> {
        if let Ok(url) = Url::parse(&self.display_ref) {
            return Ok(url);
        }
        Ok(images_base.join(&self.display_ref)?)
    }
}

/// Collect the ids of `images` in order.
pub fn ids_of(images: &[Image]) -> Vec<PuzzleId> {
    images.iter().map(|image| image.id.clone()).collect()
}
