//! Movie search - remote repository with offline cache fallback

use async_trait::async_trait;
use std::sync::Arc;

use crate::features::endpoint::MovieEndpoint;
use crate::features::error::MovieError;
use crate::models::{Movie, Paged, SearchResponseDto};
use crate::network::RequestExecutor;
use crate::storage::{CachedMovie, MovieCacheStore};

#[async_trait]
pub trait SearchMovieRepository: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<Paged<Movie>, MovieError>;
}

pub struct RemoteSearchRepository {
    executor: Arc<RequestExecutor>,
    cache: Arc<dyn MovieCacheStore>,
    language: String,
}

impl RemoteSearchRepository {
    pub fn new(executor: Arc<RequestExecutor>, cache: Arc<dyn MovieCacheStore>, language: String) -> Self {
        RemoteSearchRepository {
            executor,
            cache,
            language,
        }
    }

    fn with_favorites(&self, mut movies: Vec<Movie>) -> Vec<Movie> {
        for movie in movies.iter_mut() {
            let Some(id) = movie.id else { continue };
            let favorite = self.cache.is_favorite(id).unwrap_or_else(|e| {
                tracing::warn!(id, error = %e, "favorite lookup failed");
                false
            });
            movie.is_favorite = Some(favorite);
        }
        movies
    }

    /// Write the page under the requested page number, off the async workers
    async fn save_page(&self, rows: Vec<CachedMovie>, query: &str, page: u32) {
        let cache = self.cache.clone();
        let key = query.to_string();
        match tokio::task::spawn_blocking(move || cache.save(&rows, &key, page)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(query, page, error = %e, "failed to cache search page"),
            Err(e) => tracing::warn!(query, page, error = %e, "cache write task failed"),
        }
    }

    fn cached_page(&self, query: &str, page: u32) -> Option<Paged<Movie>> {
        let rows = match self.cache.fetch(query, page) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(query, page, error = %e, "cache read failed");
                return None;
            }
        };
        if rows.is_empty() {
            return None;
        }
        Some(Paged {
            items: self.with_favorites(rows.into_iter().map(CachedMovie::into_movie).collect()),
            page,
            has_more: false,
            total_pages: None,
            total_results: None,
        })
    }
}

#[async_trait]
impl SearchMovieRepository for RemoteSearchRepository {
    async fn search(&self, query: &str, page: u32) -> Result<Paged<Movie>, MovieError> {
        let endpoint = MovieEndpoint::Search {
            query: query.to_string(),
            page,
            language: self.language.clone(),
        };

        match self.executor.call::<SearchResponseDto>(&endpoint).await {
            Ok(dto) => {
                let mut paged: Paged<Movie> = dto.into();
                paged.items = self.with_favorites(paged.items);

                let rows: Vec<CachedMovie> = paged.items.iter().filter_map(CachedMovie::from_movie).collect();
                self.save_page(rows, query, page).await;
                Ok(paged)
            }
            Err(e) if e.serves_cache() => match self.cached_page(query, page) {
                Some(cached) => {
                    tracing::info!(query, page, count = cached.items.len(), error = %e, "serving cached search page");
                    Ok(cached)
                }
                None => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }
}

/// Input policy in front of the repository
pub struct SearchMoviesUseCase {
    repository: Arc<dyn SearchMovieRepository>,
}

impl SearchMoviesUseCase {
    pub fn new(repository: Arc<dyn SearchMovieRepository>) -> Self {
        SearchMoviesUseCase { repository }
    }

    pub async fn execute(&self, query: &str, page: u32) -> Result<Paged<Movie>, MovieError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Paged::empty());
        }
        self.repository.search(query, page.max(1)).await
    }
}
