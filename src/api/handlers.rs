use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MovieDetail, MovieId, PosterReference, RecommendationResponse, TitleMatch},
    services::{recommendations, similarity::CatalogStats, title_search},
};

use super::AppState;

pub const DEFAULT_RECOMMENDATIONS: usize = 10;
pub const MAX_RECOMMENDATIONS: usize = 50;
pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const MAX_SEARCH_LIMIT: usize = 500;

const INDEX_HTML: &str = include_str!("../../static/index.html");

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

// Handlers

/// Single-page UI
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Dataset statistics
pub async fn stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog.stats())
}

/// Case-insensitive title search
///
/// A blank query is the complete title list, so the limit cap only applies to real
/// searches.
pub async fn search_titles(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<Vec<TitleMatch>>> {
    let Query(params) = query?;

    let limit = match params.limit {
        Some(limit) if params.q.trim().is_empty() => limit,
        Some(limit) => limit.min(MAX_SEARCH_LIMIT),
        None => DEFAULT_SEARCH_LIMIT,
    };

    Ok(Json(title_search::search_titles(&state.catalog, &params.q, limit)))
}

/// Movie detail with poster
pub async fn get_movie(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<MovieDetail>> {
    let Path(id) = path?;
    let detail = title_search::movie_detail(&state.catalog, &state.posters, MovieId(id)).await?;
    Ok(Json(detail))
}

/// Poster only, with the tier that produced it
pub async fn get_poster(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<PosterReference>> {
    let Path(id) = path?;
    let movie = state
        .catalog
        .get(MovieId(id))
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))?;

    Ok(Json(state.posters.resolve(movie).await))
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(params) = query?;
    let title = params.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "title must not be empty".to_string(),
        ));
    }

    let k = params.k.unwrap_or(DEFAULT_RECOMMENDATIONS);
    if !(1..=MAX_RECOMMENDATIONS).contains(&k) {
        return Err(AppError::InvalidInput(format!(
            "k must be between 1 and {}",
            MAX_RECOMMENDATIONS
        )));
    }

    tracing::info!(
        request_id = %request_id,
        title = %title,
        k,
        "Processing recommendation request"
    );

    let response =
        recommendations::get_recommendations(&state.catalog, &state.posters, title, k).await?;

    tracing::info!(
        request_id = %request_id,
        results = response.recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}
