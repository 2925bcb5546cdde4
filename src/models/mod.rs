use serde::{Deserialize, Serialize};

pub mod movie;
pub mod poster;

pub use movie::{truncate, MovieId, MovieRecord};
pub use poster::{PosterReference, PosterTier};

/// Card overviews are cut to this many characters
pub const CARD_OVERVIEW_CHARS: usize = 100;

/// One recommended movie as rendered in the UI grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCard {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub poster: PosterReference,
}

/// Response for a recommendation request
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// The title as stored in the dataset (may differ in case from the query)
    pub query: String,
    pub recommendations: Vec<MovieCard>,
}

/// Full detail for the "About" panel of a selected movie
#[derive(Debug, Serialize, Deserialize)]
pub struct MovieDetail {
    pub movie_id: MovieId,
    pub title: String,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub poster: PosterReference,
}

/// A search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleMatch {
    pub movie_id: MovieId,
    pub title: String,
}

impl From<&MovieRecord> for TitleMatch {
    fn from(movie: &MovieRecord) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `GET /movie/{id}` payload used for posters
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}
