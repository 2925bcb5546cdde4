use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Dataset identifier for a movie (TMDB numeric id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single row of the movie table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    #[serde(rename = "movie_id", alias = "id")]
    pub id: MovieId,
    pub title: String,
    /// Concatenated genres, keywords, cast and director the similarity matrix was built from
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
}

impl MovieRecord {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: MovieId(id),
            title: title.into(),
            tags: String::new(),
            overview: None,
            genres: None,
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = Some(genres.into());
        self
    }

    /// Overview shortened for recommendation cards
    pub fn short_overview(&self, max_chars: usize) -> Option<String> {
        self.overview.as_deref().map(|text| truncate(text, max_chars))
    }
}

/// Cuts `text` to `max_chars` characters, appending "..." when anything was dropped
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
