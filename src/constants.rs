//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Default TMDB API base (v3)
pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";

/// Poster base used when the config does not override it
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w200/";

/// Default response language for search queries
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Directory under the home directory holding config.yaml
pub const CONFIG_DIR_NAME: &str = ".marquee";

/// Directory under the platform data/cache dirs
pub const DATA_DIR_NAME: &str = "marquee";

/// Log file name
pub const LOG_FILE_NAME: &str = "marquee.log";

/// Query value marking a favorite anchor row in the movie cache
pub const FAVORITE_ANCHOR_QUERY: &str = "__favorite__";

/// Distinct search queries kept in the offline cache
pub const MAX_CACHED_QUERIES: usize = 40;

/// Minimum characters before a typed query triggers a search
pub const MIN_QUERY_CHARS: usize = 3;

/// Delay between the last keystroke and the search request
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Timeout for API and image requests
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connectivity probe interval and timeout
pub const CONNECTIVITY_INTERVAL: Duration = Duration::from_secs(5);
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(3);

/// Application name
pub const APP_NAME: &str = "Marquee";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project version number shared by the Core, Persistence and UI layers
pub const PROJECT_VERSION_NUMBER: f64 = 1.0;

/// Poster size on the details screen, in terminal cells
pub const POSTER_WIDTH: u16 = 24;
pub const POSTER_HEIGHT: u16 = 18;
