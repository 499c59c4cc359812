//! # Marquee
//!
//! A terminal movie browser for TMDB-compatible APIs.
//!
//! ## Features
//! - Debounced movie search with infinite scrolling
//! - Movie details with poster art rendered in the terminal
//! - Favorites that survive restarts and work offline
//! - Offline fallback to previously cached search pages
//! - Connectivity banner
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (navigation stack and screen state)
//! - Network Layer (Tokio runtime)
//!
//! The three frameworks each export `VERSION_NUMBER` and `VERSION_STRING`:
//! Core in [`network`], Persistence in [`storage`] and UI in [`ui`].

pub mod constants;
pub mod models;
pub mod storage;
pub mod ui;
pub mod features;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Movie, MovieDetails, Paged};
pub use features::MovieError;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiConfig, NetworkActor, NetworkError};
pub use storage::{JsonMovieCache, MovieCacheStore};
