//! TMDB poster provider
//!
//! Looks a movie up with `GET /movie/{id}` and turns the returned `poster_path` into a
//! full image URL. Several API keys may be configured; each gets exactly one attempt,
//! in order, and the first key that yields a poster wins.
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, MovieRecord, TmdbMovie},
    services::posters::PosterSource,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_keys: Vec<String>,
    api_url: String,
    image_base_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests are bounded by `timeout`
    pub fn new(
        api_keys: Vec<String>,
        api_url: String,
        image_base_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            http_client,
            api_keys,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn key_count(&self) -> usize {
        self.api_keys.len()
    }

    /// Joins the image base URL with a TMDB `poster_path`
    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.image_base_url,
            poster_path.trim_start_matches('/')
        )
    }

    /// One attempt with one key
    async fn fetch_with_key(&self, movie_id: MovieId, api_key: &str) -> AppResult<String> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", "en-US")])
            .send()
            .await
            .map_err(AppError::from_request)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PosterFetch(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await.map_err(AppError::from_request)?;

        let movie: TmdbMovie = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(
                error = %e,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::PosterFetch(format!("Failed to parse TMDB response: {}", e))
        })?;

        match movie.poster_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Ok(self.poster_url(path)),
            _ => Err(AppError::PosterFetch(format!(
                "TMDB has no poster for movie {}",
                movie_id
            ))),
        }
    }
}

#[async_trait::async_trait]
impl PosterSource for TmdbProvider {
    async fn fetch_poster(&self, movie: &MovieRecord) -> AppResult<String> {
        let mut last_error = None;

        for (key_index, api_key) in self.api_keys.iter().enumerate() {
            match self.fetch_with_key(movie.id, api_key).await {
                Ok(url) => {
                    tracing::debug!(
                        movie_id = %movie.id,
                        key_index,
                        provider = "tmdb",
                        "Poster fetched"
                    );
                    return Ok(url);
                }
                Err(e) => {
                    tracing::warn!(
                        movie_id = %movie.id,
                        key_index,
                        error = %e,
                        provider = "tmdb",
                        "Poster fetch failed, trying next key"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::PosterFetch("No TMDB API key configured".to_string())
        }))
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
