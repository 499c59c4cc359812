//! Search and details flows against a mock TMDB server

use std::sync::Arc;
use std::time::Duration;

use marquee::features::{
    GetMovieDetailsUseCase, MovieError, RemoteDetailsRepository, RemoteSearchRepository,
    SearchMovieRepository, SearchMoviesUseCase,
};
use marquee::network::{ApiConfig, DefaultRequestBuilder, ReqwestHttpClient, RequestExecutor};
use marquee::storage::{CachedMovie, JsonMovieCache, MovieCacheStore};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor(base: &str, client: reqwest::Client) -> Arc<RequestExecutor> {
    let config = ApiConfig::new(base, "test-token").unwrap();
    Arc::new(RequestExecutor::new(
        Arc::new(DefaultRequestBuilder::new(config)),
        Arc::new(ReqwestHttpClient::with_client(client)),
    ))
}

fn search_body() -> serde_json::Value {
    serde_json::json!({
        "page": 1,
        "total_pages": 4,
        "total_results": 61,
        "results": [
            {"id": 348, "title": "Alien", "release_date": "1979-05-25", "poster_path": "/alien.jpg", "vote_average": 8.1},
            {"id": 679, "title": "Aliens", "release_date": "1986-07-18", "poster_path": "/aliens.jpg", "vote_average": 7.9}
        ]
    })
}

/// Port with nothing listening on it
fn dead_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/3", port)
}

#[tokio::test]
async fn test_search_sends_expected_request_and_caches_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "alien"))
        .and(query_param("page", "1"))
        .and(query_param("include_adult", "false"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("cache.json");
    let cache = Arc::new(JsonMovieCache::open(&cache_path).unwrap());
    let repo = RemoteSearchRepository::new(
        executor(&format!("{}/3", server.uri()), reqwest::Client::new()),
        cache.clone(),
        "en-US".to_string(),
    );
    let use_case = SearchMoviesUseCase::new(Arc::new(repo));

    let page = use_case.execute(" alien ", 1).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.has_more);
    assert_eq!(page.total_results, Some(61));
    assert!(cache_path.exists());
    assert_eq!(cache.fetch("alien", 1).unwrap().len(), 2);
}

#[tokio::test]
async fn test_offline_search_serves_cached_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let cache = Arc::new(JsonMovieCache::open(temp_dir.path().join("cache.json")).unwrap());

    let online = RemoteSearchRepository::new(
        executor(&format!("{}/3", server.uri()), reqwest::Client::new()),
        cache.clone(),
        "en-US".to_string(),
    );
    online.search("alien", 1).await.unwrap();
    cache
        .set_favorite(&CachedMovie {
            id: 679,
            title: Some("Aliens".to_string()),
            is_favorite: true,
            ..CachedMovie::default()
        })
        .unwrap();

    let offline = RemoteSearchRepository::new(
        executor(&dead_base(), reqwest::Client::new()),
        cache,
        "en-US".to_string(),
    );
    let page = offline.search("alien", 1).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(!page.has_more);
    let aliens = page.items.iter().find(|m| m.id == Some(679)).unwrap();
    assert_eq!(aliens.is_favorite, Some(true));

    let miss = offline.search("predator", 1).await.unwrap_err();
    assert_eq!(miss, MovieError::NoInternet);
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let repo = RemoteSearchRepository::new(
        executor(&format!("{}/3", server.uri()), client),
        Arc::new(JsonMovieCache::in_memory()),
        "en-US".to_string(),
    );
    assert_eq!(repo.search("alien", 1).await.unwrap_err(), MovieError::Timeout);
}

#[tokio::test]
async fn test_invalid_key_surfaces_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key.",
            "success": false
        })))
        .mount(&server)
        .await;

    let repo = RemoteSearchRepository::new(
        executor(&format!("{}/3", server.uri()), reqwest::Client::new()),
        Arc::new(JsonMovieCache::in_memory()),
        "en-US".to_string(),
    );
    let err = repo.search("alien", 1).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid API key: You must be granted a valid key.");
}

#[tokio::test]
async fn test_details_fetch_and_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/348"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 348,
            "title": "Alien",
            "runtime": 117,
            "tagline": "In space no one can hear you scream.",
            "genres": [{"id": 27, "name": "Horror"}, {"id": 878, "name": "Science Fiction"}],
            "status": "Released"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let repo = RemoteDetailsRepository::new(
        executor(&format!("{}/3", server.uri()), reqwest::Client::new()),
        Arc::new(JsonMovieCache::in_memory()),
        "en-US".to_string(),
    );
    let use_case = GetMovieDetailsUseCase::new(Arc::new(repo));

    let details = use_case.execute(348).await.unwrap();
    assert_eq!(details.genres, vec!["Horror", "Science Fiction"]);
    assert_eq!(details.runtime_minutes, Some(117));
    assert_eq!(details.movie.is_favorite, Some(false));

    assert_eq!(use_case.execute(1).await.unwrap_err(), MovieError::NotFound);
}
