//! Content-based similarity lookup over a precomputed cosine-similarity matrix
//!
//! The matrix is produced offline from TF-IDF vectors of each movie's tags and shipped
//! alongside the movie table in a single JSON artifact. At runtime we only read rows of it.
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord},
};

/// On-disk layout of the movie artifact
#[derive(Debug, Deserialize)]
struct CatalogFile {
    movies: Vec<MovieRecord>,
    similarity: Vec<Vec<f32>>,
}

/// A recommended movie together with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
    pub movie: &'a MovieRecord,
    pub score: f32,
}

/// Dataset statistics shown in the sidebar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_movies: usize,
    pub unique_genres: usize,
}

/// Immutable movie table plus its similarity matrix
#[derive(Debug)]
pub struct Catalog {
    movies: Vec<MovieRecord>,
    similarity: Vec<Vec<f32>>,
    /// Exact title → first row with that title
    by_title: HashMap<String, usize>,
    /// Lowercased title → first row with that title
    by_title_folded: HashMap<String, usize>,
    by_id: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Builds a catalog, checking that the matrix is square and matches the movie table
    pub fn new(movies: Vec<MovieRecord>, similarity: Vec<Vec<f32>>) -> AppResult<Self> {
        if movies.is_empty() {
            return Err(AppError::MalformedDataFile(
                "movie table is empty".to_string(),
            ));
        }

        if similarity.len() != movies.len() {
            return Err(AppError::MalformedDataFile(format!(
                "similarity matrix has {} rows but there are {} movies",
                similarity.len(),
                movies.len()
            )));
        }

        if let Some((row, values)) = similarity
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != movies.len())
        {
            return Err(AppError::MalformedDataFile(format!(
                "similarity row {} has {} columns, expected {}",
                row,
                values.len(),
                movies.len()
            )));
        }

        let mut by_title = HashMap::with_capacity(movies.len());
        let mut by_title_folded = HashMap::with_capacity(movies.len());
        let mut by_id = HashMap::with_capacity(movies.len());

        for (row, movie) in movies.iter().enumerate() {
            by_title.entry(movie.title.clone()).or_insert(row);
            by_title_folded
                .entry(movie.title.to_lowercase())
                .or_insert(row);
            by_id.entry(movie.id).or_insert(row);
        }

        Ok(Self {
            movies,
            similarity,
            by_title,
            by_title_folded,
            by_id,
        })
    }

    /// Loads the artifact at `path`
    ///
    /// A missing file is reported as [`AppError::MissingDataFile`] so startup can fail loudly.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::MissingDataFile(path.display().to_string()),
            _ => AppError::Internal(format!("Cannot open {}: {}", path.display(), e)),
        })?;

        let catalog = Self::from_reader(BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            "Loaded movie catalog"
        );

        Ok(catalog)
    }

    /// Parses an artifact from any reader
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let file: CatalogFile = serde_json::from_reader(reader)
            .map_err(|e| AppError::MalformedDataFile(e.to_string()))?;
        Self::new(file.movies, file.similarity)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// Row of `title`: exact match first, then case-insensitive
    fn position(&self, title: &str) -> Option<usize> {
        self.by_title
            .get(title)
            .or_else(|| self.by_title_folded.get(&title.to_lowercase()))
            .copied()
    }

    pub fn find_by_title(&self, title: &str) -> Option<&MovieRecord> {
        self.position(title).map(|row| &self.movies[row])
    }

    pub fn get(&self, id: MovieId) -> Option<&MovieRecord> {
        self.by_id.get(&id).map(|&row| &self.movies[row])
    }

    /// Returns up to `k` movies most similar to `title`, most similar first
    ///
    /// Ties keep dataset order. The query movie itself is never part of the result.
    pub fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<Recommendation<'_>>> {
        let row = self
            .position(title)
            .ok_or_else(|| AppError::UnknownTitle(title.to_string()))?;

        let mut ranked: Vec<(usize, f32)> = self.similarity[row]
            .iter()
            .copied()
            .enumerate()
            .filter(|&(other, _)| other != row)
            .collect();

        // sort_by is stable, so equal scores stay in row order
        ranked.sort_by(|a, b| by_descending_score(a.1, b.1));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(other, score)| Recommendation {
                movie: &self.movies[other],
                score,
            })
            .collect())
    }

    /// Case-insensitive substring search over titles, in dataset order
    ///
    /// A blank query lists the catalog from the top.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&MovieRecord> {
        let needle = query.trim().to_lowercase();

        self.movies
            .iter()
            .filter(|movie| needle.is_empty() || movie.title.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let unique_genres = self
            .movies
            .iter()
            .filter_map(|movie| movie.genres.as_deref())
            .filter(|genres| !genres.trim().is_empty())
            .collect::<HashSet<_>>()
            .len();

        CatalogStats {
            total_movies: self.movies.len(),
            unique_genres,
        }
    }
}

/// Orders scores high to low with NaN last
fn by_descending_score(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
