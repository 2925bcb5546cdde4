use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::Value;

use cinematch::api::{create_router, AppState};
use cinematch::error::{AppError, AppResult};
use cinematch::models::{MovieId, MovieRecord, PosterTier};
use cinematch::services::posters::LocalPosterCache;
use cinematch::services::{Catalog, PosterResolver, PosterSource};

/// Remote source that serves posters for even ids and counts every call
struct CountingSource {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl PosterSource for CountingSource {
    async fn fetch_poster(&self, movie: &MovieRecord) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if movie.id.0.is_multiple_of(2) {
            Ok(format!("https://image.test/{}.jpg", movie.id))
        } else {
            Err(AppError::PosterFetch("no poster".to_string()))
        }
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

fn create_test_catalog() -> Catalog {
    let movies = vec![
        MovieRecord::new(19995, "Avatar")
            .with_overview("In the 22nd century, a paraplegic Marine is dispatched to the moon Pandora on a unique mission, but becomes torn between following orders and protecting an alien civilization.")
            .with_genres("Action Adventure Fantasy Science Fiction"),
        MovieRecord::new(285, "Pirates of the Caribbean: At World's End")
            .with_genres("Adventure Fantasy Action"),
        MovieRecord::new(206647, "Spectre").with_genres("Action Adventure Crime"),
        MovieRecord::new(49026, "The Dark Knight Rises").with_genres("Action Crime Drama Thriller"),
        MovieRecord::new(49529, "John Carter")
            .with_overview("John Carter is a war-weary, former military captain who's inexplicably transported to the mysterious and exotic planet of Barsoom (Mars) and reluctantly becomes embroiled in an epic conflict.")
            .with_genres("Action Adventure Science Fiction"),
        MovieRecord::new(559, "Spider-Man 3").with_genres("Fantasy Action Adventure"),
        MovieRecord::new(38757, "Tangled").with_genres("Animation Family"),
    ];

    let similarity = vec![
        vec![1.00, 0.30, 0.10, 0.05, 0.45, 0.30, 0.02],
        vec![0.30, 1.00, 0.20, 0.10, 0.25, 0.15, 0.05],
        vec![0.10, 0.20, 1.00, 0.40, 0.05, 0.10, 0.00],
        vec![0.05, 0.10, 0.40, 1.00, 0.05, 0.20, 0.00],
        vec![0.45, 0.25, 0.05, 0.05, 1.00, 0.10, 0.03],
        vec![0.30, 0.15, 0.10, 0.20, 0.10, 1.00, 0.01],
        vec![0.02, 0.05, 0.00, 0.00, 0.03, 0.01, 1.00],
    ];

    Catalog::new(movies, similarity).unwrap()
}

fn create_test_server_with(resolver: PosterResolver) -> TestServer {
    let state = AppState::new(create_test_catalog(), resolver);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(PosterResolver::offline())
}

fn counting_resolver(calls: Arc<AtomicUsize>) -> PosterResolver {
    let mut local = HashMap::new();
    local.insert(MovieId(49529), "https://cdn.local/john-carter.jpg".to_string());
    PosterResolver::new(
        Some(Arc::new(CountingSource { calls })),
        LocalPosterCache::new(local),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_index_serves_ui() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("CineMatch"));
}

#[tokio::test]
async fn test_stats() {
    let server = create_test_server();
    let response = server.get("/api/v1/stats").await;
    response.assert_status_ok();

    let stats: Value = response.json();
    assert_eq!(stats["total_movies"], 7);
    assert_eq!(stats["unique_genres"], 7);
}

#[tokio::test]
async fn test_recommend_avatar_five() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar")
        .add_query_param("k", 5)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "Avatar");

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 5);
    assert!(recs.iter().all(|r| r["title"] != "Avatar"));
    assert_eq!(recs[0]["title"], "John Carter");

    let scores: Vec<f64> = recs
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_recommend_defaults_to_ten_capped_by_catalog() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "spectre")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["query"], "Spectre");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_recommend_cards_truncate_overview() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar")
        .add_query_param("k", 1)
        .await;

    let body: Value = response.json();
    let overview = body["recommendations"][0]["overview"].as_str().unwrap();
    assert!(overview.ends_with("..."));
    assert_eq!(overview.chars().count(), 103);
}

#[tokio::test]
async fn test_recommend_unknown_title() {
    let calls = Arc::new(AtomicUsize::new(0));
    let server = create_test_server_with(counting_resolver(calls.clone()));

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar 9")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Movie 'Avatar 9' not found in database");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recommend_rejects_bad_k() {
    let server = create_test_server();

    for k in [0, 51] {
        let response = server
            .get("/api/v1/recommendations")
            .add_query_param("title", "Avatar")
            .add_query_param("k", k)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_recommend_rejects_blank_title() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "   ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_posters_use_each_tier() {
    let calls = Arc::new(AtomicUsize::new(0));
    let server = create_test_server_with(counting_resolver(calls.clone()));

    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Avatar")
        .add_query_param("k", 5)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recs = body["recommendations"].as_array().unwrap();

    // John Carter has a local entry, Pirates has nothing, The Dark Knight Rises has an even id
    assert_eq!(recs[0]["title"], "John Carter");
    assert_eq!(recs[0]["poster"]["tier"], "cache");
    assert_eq!(recs[0]["poster"]["url"], "https://cdn.local/john-carter.jpg");

    assert_eq!(recs[1]["title"], "Pirates of the Caribbean: At World's End");
    assert_eq!(recs[1]["poster"]["tier"], "placeholder");
    assert!(recs[1]["poster"]["url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));

    assert_eq!(recs[4]["title"], "The Dark Knight Rises");
    assert_eq!(recs[4]["poster"]["tier"], "remote");
    assert_eq!(recs[4]["poster"]["url"], "https://image.test/49026.jpg");

    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_poster_memoized_across_requests() {
    let calls = Arc::new(AtomicUsize::new(0));
    let server = create_test_server_with(counting_resolver(calls.clone()));

    let first = server.get("/api/v1/movies/49026/poster").await;
    first.assert_status_ok();
    let second = server.get("/api/v1/movies/49026/poster").await;
    second.assert_status_ok();

    let first: Value = first.json();
    let second: Value = second.json();
    assert_eq!(first, second);
    assert_eq!(first["tier"], "remote");
    assert_eq!(first["url"], "https://image.test/49026.jpg");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_offline_poster_is_placeholder() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/19995/poster").await;
    response.assert_status_ok();

    let poster: Value = response.json();
    assert_eq!(poster["tier"], PosterTier::Placeholder.as_str());
    assert_eq!(poster["movie_id"], 19995);
}

#[tokio::test]
async fn test_movie_detail() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/49529").await;
    response.assert_status_ok();

    let movie: Value = response.json();
    assert_eq!(movie["title"], "John Carter");
    assert!(movie["overview"].as_str().unwrap().len() > 100);
    assert_eq!(movie["genres"], "Action Adventure Science Fiction");
    assert_eq!(movie["poster"]["tier"], "placeholder");
}

#[tokio::test]
async fn test_movie_detail_not_found() {
    let server = create_test_server();
    let response = server.get("/api/v1/movies/1").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_titles() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "SP")
        .await;
    response.assert_status_ok();

    let hits: Vec<Value> = response.json();
    let titles: Vec<&str> = hits
        .iter()
        .map(|h| h["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Spectre", "Spider-Man 3"]);
}

#[tokio::test]
async fn test_search_without_query_lists_catalog() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("limit", 2)
        .await;
    response.assert_status_ok();

    let hits: Vec<Value> = response.json();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["movie_id"], 19995);
}

#[tokio::test]
async fn test_search_complete_list_is_not_capped() {
    let movies: Vec<MovieRecord> = (1..=600)
        .map(|i| MovieRecord::new(i, format!("Movie {}", i)))
        .collect();
    let similarity = (0..600)
        .map(|row| (0..600).map(|col| if row == col { 1.0 } else { 0.0 }).collect())
        .collect();
    let catalog = Catalog::new(movies, similarity).unwrap();
    let server =
        TestServer::new(create_router(AppState::new(catalog, PosterResolver::offline()))).unwrap();

    let everything = server
        .get("/api/v1/titles/search")
        .add_query_param("limit", 600)
        .await;
    everything.assert_status_ok();
    assert_eq!(everything.json::<Vec<Value>>().len(), 600);

    let searched = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "movie")
        .add_query_param("limit", 600)
        .await;
    searched.assert_status_ok();
    assert_eq!(searched.json::<Vec<Value>>().len(), 500);
}

#[tokio::test]
async fn test_missing_title_is_json_error() {
    let server = create_test_server();

    let response = server.get("/api/v1/recommendations").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_non_numeric_movie_id_is_json_error() {
    let server = create_test_server();

    for path in ["/api/v1/movies/abc", "/api/v1/movies/abc/poster"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_bad_search_limit_is_json_error() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/titles/search")
        .add_query_param("limit", "lots")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_request_id_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-me-123"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "trace-me-123");
}

#[tokio::test]
async fn test_request_id_generated() {
    let server = create_test_server();
    let response = server.get("/health").await;

    let id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
}
