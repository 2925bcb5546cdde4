use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

/// Which fallback tier produced a poster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PosterTier {
    /// Fetched from the remote image-metadata API
    Remote,
    /// Found in the static local mapping
    Cache,
    /// Generated SVG
    Placeholder,
}

impl PosterTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterTier::Remote => "remote",
            PosterTier::Cache => "cache",
            PosterTier::Placeholder => "placeholder",
        }
    }
}

/// A resolved image source for one movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PosterReference {
    pub movie_id: MovieId,
    /// Either an image URL or a `data:` URI
    pub url: String,
    pub tier: PosterTier,
    pub resolved_at: DateTime<Utc>,
}

impl PosterReference {
    pub fn new(movie_id: MovieId, url: String, tier: PosterTier) -> Self {
        Self {
            movie_id,
            url,
            tier,
            resolved_at: Utc::now(),
        }
    }
}
