//! Poster resolution with a three-tier fallback
//!
//! Remote API → static local mapping → generated placeholder. The first tier that
//! produces an image wins and the result is memoized per movie id for the lifetime
//! of the process, so a memo hit never touches the network.
use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    error::AppResult,
    models::{MovieRecord, PosterReference, PosterTier},
};

pub mod local;
pub mod placeholder;
pub mod tmdb;

pub use local::LocalPosterCache;
pub use placeholder::placeholder_data_uri;
pub use tmdb::TmdbProvider;

/// Remote image-metadata source
///
/// Implementations own their failover policy (e.g. multiple API keys) and report
/// any failure as an error; the resolver treats every error as "try the next tier".
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterSource: Send + Sync {
    /// Returns a poster image URL for `movie`
    async fn fetch_poster(&self, movie: &MovieRecord) -> AppResult<String>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

pub struct PosterResolver {
    remote: Option<Arc<dyn PosterSource>>,
    local: LocalPosterCache,
    memo: Cache<PosterReference>,
}

impl PosterResolver {
    pub fn new(remote: Option<Arc<dyn PosterSource>>, local: LocalPosterCache) -> Self {
        Self {
            remote,
            local,
            memo: Cache::new(),
        }
    }

    /// Resolver with neither a remote source nor local entries; always yields placeholders
    pub fn offline() -> Self {
        Self::new(None, LocalPosterCache::default())
    }

    /// Resolves a poster for `movie`. Never fails.
    pub async fn resolve(&self, movie: &MovieRecord) -> PosterReference {
        let key = CacheKey::Poster(movie.id);

        if let Some(poster) = self.memo.get_from_cache(&key).await {
            tracing::debug!(movie_id = %movie.id, tier = poster.tier.as_str(), "Poster memo hit");
            return poster;
        }

        let poster = self.resolve_uncached(movie).await;

        tracing::info!(
            movie_id = %movie.id,
            tier = poster.tier.as_str(),
            "Poster resolved"
        );

        self.memo.insert(key, poster).await
    }

    /// Resolves posters for several movies concurrently, preserving input order
    pub async fn resolve_batch(self: &Arc<Self>, movies: Vec<MovieRecord>) -> Vec<PosterReference> {
        let mut tasks = Vec::with_capacity(movies.len());

        for movie in movies {
            let resolver = Arc::clone(self);
            let fallback = movie.clone();
            let task = tokio::spawn(async move { resolver.resolve(&movie).await });
            tasks.push((fallback, task));
        }

        let mut posters = Vec::with_capacity(tasks.len());
        for (movie, task) in tasks {
            match task.await {
                Ok(poster) => posters.push(poster),
                Err(e) => {
                    tracing::error!(movie_id = %movie.id, error = %e, "Poster task join error");
                    posters.push(PosterReference::new(
                        movie.id,
                        placeholder_data_uri(&movie),
                        PosterTier::Placeholder,
                    ));
                }
            }
        }

        posters
    }

    async fn resolve_uncached(&self, movie: &MovieRecord) -> PosterReference {
        if let Some(url) = self.try_remote(movie).await {
            return PosterReference::new(movie.id, url, PosterTier::Remote);
        }

        if let Some(url) = self.local.get(movie.id) {
            return PosterReference::new(movie.id, url.to_string(), PosterTier::Cache);
        }

        PosterReference::new(
            movie.id,
            placeholder_data_uri(movie),
            PosterTier::Placeholder,
        )
    }

    async fn try_remote(&self, movie: &MovieRecord) -> Option<String> {
        let remote = self.remote.as_ref()?;

        match remote.fetch_poster(movie).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(
                    movie_id = %movie.id,
                    source = remote.name(),
                    error = %e,
                    "Remote poster unavailable, falling back"
                );
                None
            }
        }
    }
}
