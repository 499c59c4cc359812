//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{DetailsState, FavoritesState, SearchState};
use crate::messages::ui_events::{InputMode, Screen};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Navigation stack, root first
    pub screens: Vec<Screen>,
    pub input_mode: InputMode,
    pub search: SearchState,
    pub details: Option<DetailsState>,
    pub favorites: FavoritesState,
    pub online: bool,
    pub show_help: bool,
    /// One-line feedback such as a failed favorite write
    pub status: Option<String>,
}

impl RenderState {
    pub fn screen(&self) -> Screen {
        self.screens.last().copied().unwrap_or_default()
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screens: vec![Screen::Search],
            input_mode: InputMode::Editing,
            search: SearchState::new(),
            details: None,
            favorites: FavoritesState::default(),
            online: true,
            show_help: false,
            status: None,
        }
    }
}
