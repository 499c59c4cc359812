use async_trait::async_trait;
use std::sync::Arc;

use crate::features::endpoint::MovieEndpoint;
use crate::features::error::MovieError;
use crate::models::{MovieDetails, MovieDetailsDto};
use crate::network::RequestExecutor;
use crate::storage::MovieCacheStore;

#[async_trait]
pub trait MovieDetailsRepository: Send + Sync {
    async fn details(&self, id: i64) -> Result<MovieDetails, MovieError>;
}

pub struct RemoteDetailsRepository {
    executor: Arc<RequestExecutor>,
    cache: Arc<dyn MovieCacheStore>,
    language: String,
}

impl RemoteDetailsRepository {
    pub fn new(executor: Arc<RequestExecutor>, cache: Arc<dyn MovieCacheStore>, language: String) -> Self {
        RemoteDetailsRepository {
            executor,
            cache,
            language,
        }
    }
}

#[async_trait]
impl MovieDetailsRepository for RemoteDetailsRepository {
    async fn details(&self, id: i64) -> Result<MovieDetails, MovieError> {
        let endpoint = MovieEndpoint::Details {
            id,
            language: self.language.clone(),
        };
        let dto: MovieDetailsDto = self.executor.call(&endpoint).await?;
        let mut details = MovieDetails::from(dto);
        let favorite = self.cache.is_favorite(id).unwrap_or_else(|e| {
            tracing::warn!(id, error = %e, "favorite lookup failed");
            false
        });
        details.movie.is_favorite = Some(favorite);
        Ok(details)
    }
}

pub struct GetMovieDetailsUseCase {
    repository: Arc<dyn MovieDetailsRepository>,
}

impl GetMovieDetailsUseCase {
    pub fn new(repository: Arc<dyn MovieDetailsRepository>) -> Self {
        GetMovieDetailsUseCase { repository }
    }

    pub async fn execute(&self, id: i64) -> Result<MovieDetails, MovieError> {
        self.repository.details(id).await
    }
}
