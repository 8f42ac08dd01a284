//! Puzzle backend boundary.
//!
//! The backend is a black box from request to image list. This module holds
//! the [`Backend`] trait the browser runtime drives, the routing toggles that
//! select between the RDF and ML variants, and the normalization of the two
//! wire shapes the backend answers with into [`Image`] records.

pub mod http;

use std::fmt;
use std::str::FromStr;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BrowserError, Result};
use crate::filter::FilterSelection;
use crate::types::{Image, ImageMetadata, PuzzleId};

pub use http::HttpBackend;

/// Which backend variant serves a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Ontology (SPARQL) scoring
    #[default]
    Rdf,
    /// Learned model scoring
    Ml,
}

impl Strategy {
    pub fn toggle(self) -> Self {
        match self {
            Strategy::Rdf => Strategy::Ml,
            Strategy::Ml => Strategy::Rdf,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Rdf => write!(f, "rdf"),
            Strategy::Ml => write!(f, "ml"),
        }
    }
}

impl FromStr for Strategy {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rdf" => Ok(Strategy::Rdf),
            "ml" => Ok(Strategy::Ml),
            _ => Err(BrowserError::Config(format!(
                "unknown strategy '{s}', expected 'rdf' or 'ml'"
            ))),
        }
    }
}

/// Independent routing choices for recommendations and game-state filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyToggle {
    pub recommendations: Strategy,
    pub game_state: Strategy,
}

/// Backend URLs derived from a single base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse `base_url`; a trailing slash is added so relative joins nest
    /// under it.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(BrowserError::Config(format!(
                "backend URL must use http or https, got '{base_url}'"
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn initial(&self) -> Result<Url> {
        Ok(self.base.join("initial")?)
    }

    pub fn search(&self) -> Result<Url> {
        Ok(self.base.join("search")?)
    }

    pub fn filter(&self) -> Result<Url> {
        Ok(self.base.join("filter")?)
    }

    pub fn recommendations(&self, strategy: Strategy) -> Result<Url> {
        let path = match strategy {
            Strategy::Rdf => "rdf-recommendations",
            Strategy::Ml => "ml-recommendations",
        };
        Ok(self.base.join(path)?)
    }

    /// Endpoint the filter service forwards game-state filtering to
    pub fn game_state_filter(&self, strategy: Strategy) -> Result<Url> {
        let path = match strategy {
            Strategy::Rdf => "filter/game-state-rdf",
            Strategy::Ml => "filter/game-state-ml",
        };
        Ok(self.base.join(path)?)
    }

    /// Base that image filenames resolve against
    pub fn images(&self) -> Result<Url> {
        Ok(self.base.join("images/")?)
    }
}

/// A filter request: the pending selection applied to candidate ids
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub filters: FilterSelection,
    pub puzzle_ids: Vec<PuzzleId>,
    pub game_state: Strategy,
}

/// Future returned by every backend call
pub type ImagesFuture = BoxFuture<'static, Result<Vec<Image>>>;

/// Common interface for puzzle backends
///
/// Calls start eagerly and return an owned future, so the caller can keep
/// many requests in flight and poll them from one task.
pub trait Backend: Send + Sync {
    /// Unfiltered initial listing
    fn initial(&self) -> ImagesFuture;

    fn search(&self, query: &str) -> ImagesFuture;

    fn filter(&self, request: FilterRequest) -> ImagesFuture;

    fn recommendations(&self, strategy: Strategy, puzzle_ids: Vec<PuzzleId>) -> ImagesFuture;
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for PuzzleId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => PuzzleId::new(text),
            WireId::Number(n) => PuzzleId::new(n.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
    #[serde(default)]
    content_url: Option<String>,
    #[serde(default)]
    identifier: Option<WireId>,
    #[serde(default)]
    dominant_feature: Option<String>,
    #[serde(default)]
    recommended_feature: Option<String>,
}

/// One image as the backend sends it: either `{ puzzle_id, filename }` or a
/// schema.org `metadata` block, possibly both. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WireImage {
    #[serde(default)]
    puzzle_id: Option<WireId>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    dominant_feature: Option<String>,
    #[serde(default)]
    metadata: Option<WireMetadata>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl WireImage {
    /// Normalize into an [`Image`]; `None` when no id or display ref exists.
    pub fn into_image(self) -> Option<Image> {
        let metadata = self.metadata.unwrap_or_default();
        let identifier = metadata.identifier.map(PuzzleId::from);

        let id = self.puzzle_id.map(PuzzleId::from).or_else(|| identifier.clone())?;
        let content_url = non_empty(metadata.content_url);
        let display_ref = non_empty(self.filename).or_else(|| content_url.clone())?;

        let dominant_feature = self
            .dominant_feature
            .or(metadata.dominant_feature)
            .or(metadata.recommended_feature);

        let mut image = Image::new(id, display_ref);
        if content_url.is_some() || identifier.is_some() || dominant_feature.is_some() {
            image = image.with_metadata(ImageMetadata {
                content_url,
                identifier: identifier.map(|id| id.to_string()),
                dominant_feature,
            });
        }
        Some(image)
    }
}

/// Normalize a response body, dropping entries that cannot be displayed.
pub fn normalize_images(wire: Vec<WireImage>) -> Vec<Image> {
    let total = wire.len();
    let images: Vec<Image> = wire.into_iter().filter_map(WireImage::into_image).collect();
    if images.len() < total {
        tracing::warn!(
            "Dropped {} of {} images without an id or display reference",
            total - images.len(),
            total
        );
    }
    images
}
