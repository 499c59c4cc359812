//! Domain features - movie endpoints, repositories and use cases
//!
//! Repositories sit between the network executor and the movie cache;
//! use cases hold the small amount of input policy the screens rely on.

pub mod details;
pub mod endpoint;
pub mod error;
pub mod favorites;
pub mod search;

pub use details::{GetMovieDetailsUseCase, MovieDetailsRepository, RemoteDetailsRepository};
pub use endpoint::MovieEndpoint;
pub use error::MovieError;
pub use favorites::{CachedFavoritesRepository, FavoriteMovieUseCase, FavoritesRepository};
pub use search::{RemoteSearchRepository, SearchMovieRepository, SearchMoviesUseCase};
