//! App state - pure data plus the favorites store handle

use reqwest::Url;
use std::sync::Arc;

use crate::features::FavoriteMovieUseCase;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::{Movie, MovieDetails};
use crate::ui::PosterArt;

pub const SEARCH_TITLE: &str = "Search Movies";

/// Search screen lifecycle
#[derive(Clone, Debug, PartialEq, Default)]
pub enum SearchPhase {
    /// Empty query
    #[default]
    Idle,
    /// Query too short to search
    Initial,
    Loading,
    LoadingMore,
    Loaded,
    Error(String),
}

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub cursor: usize,
    pub movies: Vec<Movie>,
    pub page: u32,
    pub has_more: bool,
    pub phase: SearchPhase,
    pub title: String,
    pub selected: usize,
    pub pending: Option<u64>,
}

impl SearchState {
    pub fn new() -> Self {
        SearchState {
            page: 1,
            title: SEARCH_TITLE.to_string(),
            ..SearchState::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading | SearchPhase::LoadingMore)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum PosterStatus {
    #[default]
    Missing,
    Loading,
    Ready(PosterArt),
    Failed(String),
}

#[derive(Clone, Debug, Default)]
pub struct DetailsState {
    /// Row the screen was opened from; shown until details arrive
    pub movie: Movie,
    pub details: Option<MovieDetails>,
    pub loading: bool,
    pub error: Option<String>,
    pub poster: PosterStatus,
    pub request_id: Option<u64>,
    pub poster_request_id: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct FavoritesState {
    pub movies: Vec<Movie>,
    pub selected: usize,
    pub error: Option<String>,
}

/// Main application state
pub struct AppState {
    pub screens: Vec<Screen>,
    pub input_mode: InputMode,
    pub search: SearchState,
    pub details: Option<DetailsState>,
    pub favorites: FavoritesState,
    pub online: bool,
    pub show_help: bool,
    pub status: Option<String>,
    pub next_request_id: u64,
    pub image_base: Url,
    pub poster_size: (u16, u16),
    pub favorite_movies: Arc<FavoriteMovieUseCase>,
}

impl AppState {
    pub fn new(favorite_movies: Arc<FavoriteMovieUseCase>, image_base: Url, poster_size: (u16, u16)) -> Self {
        AppState {
            screens: vec![Screen::Search],
            input_mode: InputMode::Editing,
            search: SearchState::new(),
            details: None,
            favorites: FavoritesState::default(),
            online: true,
            show_help: false,
            status: None,
            next_request_id: 1,
            image_base,
            poster_size,
            favorite_movies,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn screen(&self) -> Screen {
        self.screens.last().copied().unwrap_or_default()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screens: self.screens.clone(),
            input_mode: self.input_mode,
            search: self.search.clone(),
            details: self.details.clone(),
            favorites: self.favorites.clone(),
            online: self.online,
            show_help: self.show_help,
            status: self.status.clone(),
        }
    }
}
