use crate::{
    error::{AppError, AppResult},
    models::{MovieDetail, MovieId, TitleMatch},
    services::{posters::PosterResolver, similarity::Catalog},
};

/// Service function for title search
///
/// Keeps HTTP routing separate from catalog access.
pub fn search_titles(catalog: &Catalog, query: &str, limit: usize) -> Vec<TitleMatch> {
    catalog
        .search(query, limit)
        .into_iter()
        .map(TitleMatch::from)
        .collect()
}

/// Full detail for one movie, with its poster
pub async fn movie_detail(
    catalog: &Catalog,
    resolver: &PosterResolver,
    id: MovieId,
) -> AppResult<MovieDetail> {
    let movie = catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))?;

    let poster = resolver.resolve(movie).await;

    Ok(MovieDetail {
        movie_id: movie.id,
        title: movie.title.clone(),
        overview: movie.overview.clone(),
        genres: movie.genres.clone(),
        poster,
    })
}
