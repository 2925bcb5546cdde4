use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    services::{
        posters::{LocalPosterCache, TmdbProvider},
        Catalog, PosterResolver, PosterSource,
    },
};

/// Process-scoped state shared by all handlers
///
/// Built once at startup; the catalog is read-only and the resolver owns the only
/// mutable piece (its poster memo).
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub posters: Arc<PosterResolver>,
}

impl AppState {
    pub fn new(catalog: Catalog, posters: PosterResolver) -> Self {
        Self {
            catalog: Arc::new(catalog),
            posters: Arc::new(posters),
        }
    }

    /// Loads the catalog and poster tiers described by `config`
    ///
    /// Fails if the movie artifact (or a configured poster cache file) is missing or malformed.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let catalog = Catalog::load(&config.data_path)?;
        let local = LocalPosterCache::from_optional_path(config.poster_cache_path.as_deref())?;

        let api_keys = config.api_keys();
        let remote: Option<Arc<dyn PosterSource>> = if api_keys.is_empty() {
            tracing::warn!("No TMDB API key configured, remote posters disabled");
            None
        } else {
            let provider = TmdbProvider::new(
                api_keys,
                config.tmdb_api_url.clone(),
                config.tmdb_image_base_url.clone(),
                Duration::from_secs(config.poster_timeout_secs),
            )?;
            tracing::info!(keys = provider.key_count(), "Remote poster source enabled");
            Some(Arc::new(provider) as Arc<dyn PosterSource>)
        };

        Ok(Self::new(catalog, PosterResolver::new(remote, local)))
    }
}
