use anyhow::{anyhow, Result};
use std::sync::Arc;

use crate::models::Movie;
use crate::storage::{CachedMovie, MovieCacheStore};

pub trait FavoritesRepository: Send + Sync {
    fn is_favorite(&self, id: i64) -> Result<bool>;
    fn set_favorite(&self, movie: &Movie, favorite: bool) -> Result<()>;
    fn favorites(&self) -> Result<Vec<Movie>>;
}

/// Favorites stored as flags in the movie cache
pub struct CachedFavoritesRepository {
    cache: Arc<dyn MovieCacheStore>,
}

impl CachedFavoritesRepository {
    pub fn new(cache: Arc<dyn MovieCacheStore>) -> Self {
        CachedFavoritesRepository { cache }
    }
}

impl FavoritesRepository for CachedFavoritesRepository {
    fn is_favorite(&self, id: i64) -> Result<bool> {
        self.cache.is_favorite(id)
    }

    fn set_favorite(&self, movie: &Movie, favorite: bool) -> Result<()> {
        let mut row = CachedMovie::from_movie(movie).ok_or_else(|| anyhow!("movie has no id"))?;
        row.is_favorite = favorite;
        self.cache.set_favorite(&row)
    }

    fn favorites(&self) -> Result<Vec<Movie>> {
        Ok(self
            .cache
            .fetch_favorites()?
            .into_iter()
            .map(CachedMovie::into_movie)
            .collect())
    }
}

pub struct FavoriteMovieUseCase {
    repository: Arc<dyn FavoritesRepository>,
}

impl FavoriteMovieUseCase {
    pub fn new(repository: Arc<dyn FavoritesRepository>) -> Self {
        FavoriteMovieUseCase { repository }
    }

    pub fn is_favorite(&self, id: i64) -> Result<bool> {
        self.repository.is_favorite(id)
    }

    pub fn set_favorite(&self, movie: &Movie, favorite: bool) -> Result<()> {
        self.repository.set_favorite(movie, favorite)
    }

    /// Flip the stored flag; returns the new value
    pub fn toggle(&self, movie: &Movie) -> Result<bool> {
        let id = movie.id.ok_or_else(|| anyhow!("movie has no id"))?;
        let favorite = !self.repository.is_favorite(id)?;
        self.repository.set_favorite(movie, favorite)?;
        Ok(favorite)
    }

    pub fn favorites(&self) -> Result<Vec<Movie>> {
        self.repository.favorites()
    }
}
