use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::MovieId,
};

/// Static movie_id → poster URL mapping shipped next to the dataset
#[derive(Debug, Clone, Default)]
pub struct LocalPosterCache {
    entries: HashMap<MovieId, String>,
}

impl LocalPosterCache {
    pub fn new(entries: HashMap<MovieId, String>) -> Self {
        Self { entries }
    }

    /// Loads a JSON object of `{"<movie_id>": "<url>"}`
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::MissingDataFile(path.display().to_string()),
            _ => AppError::Internal(format!("Cannot open {}: {}", path.display(), e)),
        })?;

        let raw: HashMap<u64, String> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                AppError::MalformedDataFile(format!("poster cache {}: {}", path.display(), e))
            })?;

        let cache = Self::new(
            raw.into_iter()
                .map(|(id, url)| (MovieId(id), url))
                .collect(),
        );

        tracing::info!(
            path = %path.display(),
            entries = cache.len(),
            "Loaded local poster cache"
        );

        Ok(cache)
    }

    /// An unset path means no local tier entries
    pub fn from_optional_path(path: Option<&str>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn get(&self, id: MovieId) -> Option<&str> {
        self.entries
            .get(&id)
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
