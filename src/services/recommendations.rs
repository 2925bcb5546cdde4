use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieCard, RecommendationResponse, CARD_OVERVIEW_CHARS},
    services::{posters::PosterResolver, similarity::Catalog},
};

/// Recommends movies similar to `title`, each with a resolved poster
///
/// Lookup errors (unknown title) surface before any poster is resolved, so a failed
/// request leaves the poster memo untouched.
pub async fn get_recommendations(
    catalog: &Catalog,
    resolver: &Arc<PosterResolver>,
    title: &str,
    k: usize,
) -> AppResult<RecommendationResponse> {
    let query = catalog
        .find_by_title(title)
        .map(|movie| movie.title.clone())
        .unwrap_or_else(|| title.to_string());

    let recommendations = catalog.recommend(title, k)?;

    let posters = resolver
        .resolve_batch(recommendations.iter().map(|r| r.movie.clone()).collect())
        .await;

    let cards = recommendations
        .iter()
        .zip(posters)
        .map(|(rec, poster)| MovieCard {
            movie_id: rec.movie.id,
            title: rec.movie.title.clone(),
            score: rec.score,
            overview: rec.movie.short_overview(CARD_OVERVIEW_CHARS),
            genres: rec.movie.genres.clone(),
            poster,
        })
        .collect();

    Ok(RecommendationResponse {
        query,
        recommendations: cards,
    })
}
