//! Network messages - communication between App and Network layers

use crate::features::MovieError;
use crate::models::{Movie, MovieDetails, Paged};
use crate::ui::PosterArt;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Search one page; `debounce` delays the call so a newer keystroke can cancel it
    SearchMovies {
        id: u64,
        query: String,
        page: u32,
        debounce: bool,
    },
    FetchDetails {
        id: u64,
        movie_id: i64,
    },
    /// Download a poster and rasterize it to `width` x `height` cells
    LoadPoster {
        id: u64,
        url: String,
        width: u16,
        height: u16,
    },
    /// Warm the image cache for upcoming rows
    PrefetchPosters {
        urls: Vec<String>,
    },
    /// Cancel a pending request
    CancelRequest(u64),
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    SearchResults {
        id: u64,
        query: String,
        page: Paged<Movie>,
    },
    Details {
        id: u64,
        details: MovieDetails,
    },
    Poster {
        id: u64,
        art: PosterArt,
    },
    PosterFailed {
        id: u64,
        message: String,
    },
    Failed {
        id: u64,
        error: MovieError,
    },
    /// Request was cancelled
    Cancelled {
        id: u64,
    },
    /// Reachability of the API host changed
    Connectivity {
        online: bool,
    },
}

impl NetworkResponse {
    /// Request id, if the response answers a request
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkResponse::SearchResults { id, .. }
            | NetworkResponse::Details { id, .. }
            | NetworkResponse::Poster { id, .. }
            | NetworkResponse::PosterFailed { id, .. }
            | NetworkResponse::Failed { id, .. }
            | NetworkResponse::Cancelled { id } => Some(*id),
            NetworkResponse::Connectivity { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ids() {
        assert_eq!(NetworkResponse::Cancelled { id: 4 }.id(), Some(4));
        assert_eq!(NetworkResponse::Connectivity { online: false }.id(), None);
    }
}
