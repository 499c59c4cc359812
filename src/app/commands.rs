//! Command handlers - business logic for processing UI events and responses
//!
//! Handlers mutate state and return the network commands to dispatch.

use crate::app::state::{DetailsState, PosterStatus, SearchPhase, SEARCH_TITLE};
use crate::app::AppState;
use crate::constants::MIN_QUERY_CHARS;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::Movie;

fn found_title(count: usize) -> String {
    match count {
        0 => "No results found".to_string(),
        1 => "Found 1 movie".to_string(),
        n => format!("Found {} movies", n),
    }
}

impl AppState {
    // ========================
    // Query editing
    // ========================

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        self.search.cursor = self.search.query.len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let query = &self.search.query;
        if self.search.cursor > 0 {
            self.search.cursor = query[..self.search.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let query = &self.search.query;
        if self.search.cursor < query.len() {
            self.search.cursor = query[self.search.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.search.cursor + i)
                .unwrap_or(query.len());
        }
    }

    pub fn enter_char(&mut self, c: char) -> Vec<NetworkCommand> {
        let cursor = self.search.cursor.min(self.search.query.len());
        self.search.query.insert(cursor, c);
        self.search.cursor = cursor + c.len_utf8();
        self.query_changed()
    }

    pub fn delete_char(&mut self) -> Vec<NetworkCommand> {
        if self.search.cursor == 0 {
            return Vec::new();
        }
        let cursor = self.search.cursor.min(self.search.query.len());
        let prev = self.search.query[..cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.search.query.remove(prev);
        self.search.cursor = prev;
        self.query_changed()
    }

    pub fn clear_query(&mut self) -> Vec<NetworkCommand> {
        if self.search.query.is_empty() {
            return Vec::new();
        }
        self.search.query.clear();
        self.search.cursor = 0;
        self.query_changed()
    }

    /// Reset paging and decide whether the new query searches
    fn query_changed(&mut self) -> Vec<NetworkCommand> {
        let mut commands = Vec::new();
        if let Some(id) = self.search.pending.take() {
            commands.push(NetworkCommand::CancelRequest(id));
        }

        self.search.movies.clear();
        self.search.page = 1;
        self.search.has_more = false;
        self.search.selected = 0;

        // Length counts the raw text; the search use case trims it
        let query = self.search.query.clone();
        if query.is_empty() {
            self.search.phase = SearchPhase::Idle;
            self.search.title = SEARCH_TITLE.to_string();
        } else if query.chars().count() < MIN_QUERY_CHARS {
            self.search.phase = SearchPhase::Initial;
        } else {
            let id = self.next_id();
            self.search.pending = Some(id);
            self.search.phase = SearchPhase::Loading;
            commands.push(NetworkCommand::SearchMovies {
                id,
                query,
                page: 1,
                debounce: true,
            });
        }
        commands
    }

    // ========================
    // Lists
    // ========================

    pub fn select_next(&mut self) -> Vec<NetworkCommand> {
        match self.screen() {
            Screen::Search => {
                if self.search.movies.is_empty() {
                    return Vec::new();
                }
                self.search.selected = (self.search.selected + 1).min(self.search.movies.len() - 1);
                self.load_more_if_needed()
            }
            Screen::Favorites => {
                if !self.favorites.movies.is_empty() {
                    self.favorites.selected =
                        (self.favorites.selected + 1).min(self.favorites.movies.len() - 1);
                }
                Vec::new()
            }
            Screen::Details => Vec::new(),
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen() {
            Screen::Search => self.search.selected = self.search.selected.saturating_sub(1),
            Screen::Favorites => self.favorites.selected = self.favorites.selected.saturating_sub(1),
            Screen::Details => {}
        }
    }

    /// Next page when the last row is selected, more exist and nothing is in flight
    fn load_more_if_needed(&mut self) -> Vec<NetworkCommand> {
        let at_last_row = self.search.selected + 1 == self.search.movies.len();
        if !at_last_row || !self.search.has_more || self.search.is_loading() || self.search.pending.is_some() {
            return Vec::new();
        }
        let id = self.next_id();
        let page = self.search.page + 1;
        self.search.pending = Some(id);
        self.search.phase = SearchPhase::LoadingMore;
        tracing::debug!(id, page, "loading next page");
        vec![NetworkCommand::SearchMovies {
            id,
            query: self.search.query.clone(),
            page,
            debounce: false,
        }]
    }

    // ========================
    // Navigation
    // ========================

    pub fn open_selected(&mut self) -> Vec<NetworkCommand> {
        let movie = match self.screen() {
            Screen::Search => self.search.movies.get(self.search.selected).cloned(),
            Screen::Favorites => self.favorites.movies.get(self.favorites.selected).cloned(),
            Screen::Details => None,
        };
        match movie {
            Some(movie) => self.open_details(movie),
            None => Vec::new(),
        }
    }

    fn open_details(&mut self, mut movie: Movie) -> Vec<NetworkCommand> {
        let Some(movie_id) = movie.id else {
            self.status = Some("This movie has no details".to_string());
            return Vec::new();
        };
        if let Ok(favorite) = self.favorite_movies.is_favorite(movie_id) {
            movie.is_favorite = Some(favorite);
        }

        let id = self.next_id();
        let mut commands = vec![NetworkCommand::FetchDetails { id, movie_id }];
        let mut details = DetailsState {
            movie,
            loading: true,
            request_id: Some(id),
            ..DetailsState::default()
        };
        if let Some(command) = self.poster_command(&mut details) {
            commands.push(command);
        }

        self.details = Some(details);
        self.screens.push(Screen::Details);
        self.status = None;
        commands
    }

    fn poster_command(&mut self, details: &mut DetailsState) -> Option<NetworkCommand> {
        let url = details.movie.poster_url(&self.image_base)?;
        let id = self.next_id();
        details.poster = PosterStatus::Loading;
        details.poster_request_id = Some(id);
        let (width, height) = self.poster_size;
        Some(NetworkCommand::LoadPoster {
            id,
            url: url.to_string(),
            width,
            height,
        })
    }

    pub fn show_favorites(&mut self) {
        if self.screen() == Screen::Favorites {
            return;
        }
        self.screens.push(Screen::Favorites);
        self.favorites.selected = 0;
        self.reload_favorites();
    }

    pub fn back(&mut self) -> Vec<NetworkCommand> {
        if self.screens.len() <= 1 {
            return Vec::new();
        }
        let mut commands = Vec::new();
        if self.screens.pop() == Some(Screen::Details) {
            if let Some(details) = self.details.take() {
                if details.loading {
                    commands.extend(details.request_id.map(NetworkCommand::CancelRequest));
                }
                if details.poster == PosterStatus::Loading {
                    commands.extend(details.poster_request_id.map(NetworkCommand::CancelRequest));
                }
            }
        }
        match self.screen() {
            Screen::Favorites => self.reload_favorites(),
            Screen::Search => self.refresh_search_flags(),
            Screen::Details => {}
        }
        self.status = None;
        commands
    }

    // ========================
    // Favorites
    // ========================

    pub fn toggle_favorite(&mut self) {
        match self.screen() {
            Screen::Search => {
                let Some(movie) = self.search.movies.get(self.search.selected).cloned() else {
                    return;
                };
                if let Some(favorite) = self.flip_favorite(&movie) {
                    if let Some(row) = self.search.movies.get_mut(self.search.selected) {
                        row.is_favorite = Some(favorite);
                    }
                }
            }
            Screen::Details => {
                let Some(movie) = self.details.as_ref().map(|d| d.movie.clone()) else {
                    return;
                };
                if let Some(favorite) = self.flip_favorite(&movie) {
                    if let Some(details) = self.details.as_mut() {
                        details.movie.is_favorite = Some(favorite);
                        if let Some(full) = details.details.as_mut() {
                            full.movie.is_favorite = Some(favorite);
                        }
                    }
                }
            }
            Screen::Favorites => {
                let Some(movie) = self.favorites.movies.get(self.favorites.selected).cloned() else {
                    return;
                };
                if self.write_favorite(&movie, false) {
                    self.reload_favorites();
                }
            }
        }
    }

    /// Flip the stored flag; the store decides the new value
    fn flip_favorite(&mut self, movie: &Movie) -> Option<bool> {
        match self.favorite_movies.toggle(movie) {
            Ok(favorite) => {
                self.status = None;
                Some(favorite)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to update favorite");
                self.status = Some(format!("Could not update favorite: {}", e));
                None
            }
        }
    }

    fn write_favorite(&mut self, movie: &Movie, favorite: bool) -> bool {
        match self.favorite_movies.set_favorite(movie, favorite) {
            Ok(()) => {
                self.status = None;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to update favorite");
                self.status = Some(format!("Could not update favorite: {}", e));
                false
            }
        }
    }

    fn reload_favorites(&mut self) {
        match self.favorite_movies.favorites() {
            Ok(movies) => {
                self.favorites.movies = movies;
                self.favorites.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load favorites");
                self.favorites.movies.clear();
                self.favorites.error = Some(e.to_string());
            }
        }
        let last = self.favorites.movies.len().saturating_sub(1);
        self.favorites.selected = self.favorites.selected.min(last);
    }

    /// Favorite flags may have changed on another screen
    fn refresh_search_flags(&mut self) {
        for movie in self.search.movies.iter_mut() {
            let Some(id) = movie.id else { continue };
            if let Ok(favorite) = self.favorite_movies.is_favorite(id) {
                movie.is_favorite = Some(favorite);
            }
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network responses
    // ========================

    /// Apply a response; stale ids are ignored
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        match response {
            NetworkResponse::SearchResults { id, page, .. } => {
                if self.search.pending != Some(id) {
                    tracing::trace!(id, "ignoring stale search results");
                    return Vec::new();
                }
                self.search.pending = None;

                let urls: Vec<String> = page
                    .items
                    .iter()
                    .filter_map(|m| m.poster_url(&self.image_base))
                    .map(|u| u.to_string())
                    .collect();

                if self.search.phase == SearchPhase::LoadingMore {
                    self.search.movies.extend(page.items);
                } else {
                    self.search.movies = page.items;
                    self.search.selected = 0;
                }
                self.search.page = page.page;
                self.search.has_more = page.has_more;
                self.search.phase = SearchPhase::Loaded;
                self.search.title = found_title(self.search.movies.len());

                if urls.is_empty() {
                    Vec::new()
                } else {
                    vec![NetworkCommand::PrefetchPosters { urls }]
                }
            }

            NetworkResponse::Failed { id, error } => {
                if self.search.pending == Some(id) {
                    self.search.pending = None;
                    self.search.phase = SearchPhase::Error(error.to_string());
                    self.search.title = SEARCH_TITLE.to_string();
                } else if let Some(details) = self.details.as_mut().filter(|d| d.request_id == Some(id)) {
                    details.request_id = None;
                    details.loading = false;
                    details.error = Some(error.to_string());
                }
                Vec::new()
            }

            NetworkResponse::Details { id, details: payload } => {
                let Some(mut details) = self.details.take() else {
                    return Vec::new();
                };
                if details.request_id != Some(id) {
                    self.details = Some(details);
                    return Vec::new();
                }
                details.request_id = None;
                details.loading = false;
                details.error = None;

                let mut movie = payload.movie.clone();
                if movie.is_favorite.is_none() {
                    movie.is_favorite = details.movie.is_favorite;
                }
                let needs_poster = details.poster == PosterStatus::Missing && movie.poster_path.is_some();
                details.movie = movie;
                details.details = Some(payload);

                let command = if needs_poster {
                    self.poster_command(&mut details)
                } else {
                    None
                };
                self.details = Some(details);
                command.into_iter().collect()
            }

            NetworkResponse::Poster { id, art } => {
                if let Some(details) = self.details.as_mut().filter(|d| d.poster_request_id == Some(id)) {
                    details.poster = PosterStatus::Ready(art);
                    details.poster_request_id = None;
                }
                Vec::new()
            }

            NetworkResponse::PosterFailed { id, message } => {
                if let Some(details) = self.details.as_mut().filter(|d| d.poster_request_id == Some(id)) {
                    details.poster = PosterStatus::Failed(message);
                    details.poster_request_id = None;
                }
                Vec::new()
            }

            NetworkResponse::Cancelled { id } => {
                tracing::trace!(id, "request cancelled");
                Vec::new()
            }

            NetworkResponse::Connectivity { online } => {
                let was_online = self.online;
                self.online = online;
                if online && !was_online && matches!(self.search.phase, SearchPhase::Error(_)) {
                    return self.retry_search();
                }
                Vec::new()
            }
        }
    }

    /// Re-run the failed search once the connection is back
    fn retry_search(&mut self) -> Vec<NetworkCommand> {
        let query = self.search.query.clone();
        if query.chars().count() < MIN_QUERY_CHARS || self.search.pending.is_some() {
            return Vec::new();
        }
        let id = self.next_id();
        self.search.pending = Some(id);
        let page = if self.search.movies.is_empty() {
            self.search.phase = SearchPhase::Loading;
            1
        } else {
            self.search.phase = SearchPhase::LoadingMore;
            self.search.page + 1
        };
        vec![NetworkCommand::SearchMovies {
            id,
            query,
            page,
            debounce: false,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{CachedFavoritesRepository, FavoriteMovieUseCase, MovieError};
    use crate::models::{MovieDetails, Paged};
    use crate::storage::JsonMovieCache;
    use reqwest::Url;
    use std::sync::Arc;

    fn state() -> AppState {
        let cache = Arc::new(JsonMovieCache::in_memory());
        let favorites = FavoriteMovieUseCase::new(Arc::new(CachedFavoritesRepository::new(cache)));
        AppState::new(
            Arc::new(favorites),
            Url::parse("https://img.example.com/w200/").unwrap(),
            (20, 15),
        )
    }

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id: Some(id),
            title: Some(title.to_string()),
            poster_path: Some(format!("/{}.jpg", id)),
            ..Movie::default()
        }
    }

    fn page(items: Vec<Movie>, page: u32, has_more: bool) -> Paged<Movie> {
        Paged {
            items,
            page,
            has_more,
            total_pages: None,
            total_results: None,
        }
    }

    fn type_query(state: &mut AppState, text: &str) -> Vec<NetworkCommand> {
        let mut last = Vec::new();
        for c in text.chars() {
            last = state.enter_char(c);
        }
        last
    }

    fn pending_search(commands: &[NetworkCommand]) -> u64 {
        commands
            .iter()
            .find_map(|c| match c {
                NetworkCommand::SearchMovies { id, .. } => Some(*id),
                _ => None,
            })
            .expect("search command")
    }

    #[test]
    fn test_short_query_is_initial() {
        let mut state = state();
        let commands = type_query(&mut state, "al");
        assert!(commands.is_empty());
        assert_eq!(state.search.phase, SearchPhase::Initial);
        assert_eq!(state.search.title, SEARCH_TITLE);
    }

    #[test]
    fn test_min_length_counts_raw_text() {
        let mut state = state();
        let commands = type_query(&mut state, "  a");
        match commands.as_slice() {
            [NetworkCommand::SearchMovies { query, page: 1, debounce: true, .. }] => {
                assert_eq!(query, "  a")
            }
            other => panic!("expected a search, got {:?}", other),
        }
        assert_eq!(state.search.phase, SearchPhase::Loading);
    }

    #[test]
    fn test_third_char_starts_debounced_search() {
        let mut state = state();
        let commands = type_query(&mut state, "ali");
        assert!(matches!(
            commands.as_slice(),
            [NetworkCommand::SearchMovies { page: 1, debounce: true, query, .. }] if query == "ali"
        ));
        assert_eq!(state.search.phase, SearchPhase::Loading);
    }

    #[test]
    fn test_next_keystroke_cancels_previous_search() {
        let mut state = state();
        let first = pending_search(&type_query(&mut state, "ali"));
        let commands = state.enter_char('e');
        assert!(matches!(commands[0], NetworkCommand::CancelRequest(id) if id == first));
        assert!(pending_search(&commands) != first);
    }

    #[test]
    fn test_empty_query_is_idle_and_cancels() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        let commands = state.clear_query();
        assert!(matches!(commands.as_slice(), [NetworkCommand::CancelRequest(c)] if *c == id));
        assert_eq!(state.search.phase, SearchPhase::Idle);
        assert_eq!(state.search.title, SEARCH_TITLE);
        assert!(state.search.pending.is_none());
    }

    #[test]
    fn test_results_set_title() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        let commands = state.handle_response(NetworkResponse::SearchResults {
            id,
            query: "alien".into(),
            page: page(vec![movie(1, "Alien"), movie(2, "Aliens")], 1, false),
        });
        assert_eq!(state.search.title, "Found 2 movies");
        assert_eq!(state.search.phase, SearchPhase::Loaded);
        assert!(matches!(commands.as_slice(), [NetworkCommand::PrefetchPosters { urls }] if urls.len() == 2));
    }

    #[test]
    fn test_single_and_zero_results_titles() {
        assert_eq!(found_title(1), "Found 1 movie");
        assert_eq!(found_title(0), "No results found");
    }

    #[test]
    fn test_stale_results_ignored() {
        let mut state = state();
        let stale = pending_search(&type_query(&mut state, "alien"));
        type_query(&mut state, "s");
        state.handle_response(NetworkResponse::SearchResults {
            id: stale,
            query: "alien".into(),
            page: page(vec![movie(1, "Alien")], 1, false),
        });
        assert!(state.search.movies.is_empty());
        assert_eq!(state.search.phase, SearchPhase::Loading);
    }

    #[test]
    fn test_error_sets_message_and_resets_title() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        state.handle_response(NetworkResponse::Failed {
            id,
            error: MovieError::Timeout,
        });
        assert_eq!(
            state.search.phase,
            SearchPhase::Error("The request timed out. Please try again.".into())
        );
        assert_eq!(state.search.title, SEARCH_TITLE);
    }

    #[test]
    fn test_last_row_loads_next_page_and_appends() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        state.handle_response(NetworkResponse::SearchResults {
            id,
            query: "alien".into(),
            page: page(vec![movie(1, "Alien"), movie(2, "Aliens")], 1, true),
        });

        let commands = state.select_next();
        assert!(matches!(
            commands.as_slice(),
            [NetworkCommand::SearchMovies { page: 2, debounce: false, .. }]
        ));
        assert_eq!(state.search.phase, SearchPhase::LoadingMore);

        // No duplicate request while loading
        assert!(state.select_next().is_empty());

        let next = pending_search(&commands);
        state.handle_response(NetworkResponse::SearchResults {
            id: next,
            query: "alien".into(),
            page: page(vec![movie(3, "Alien 3")], 2, false),
        });
        assert_eq!(state.search.movies.len(), 3);
        assert_eq!(state.search.page, 2);
        assert_eq!(state.search.title, "Found 3 movies");
        assert_eq!(state.search.selected, 1);
    }

    #[test]
    fn test_no_next_page_without_more() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        state.handle_response(NetworkResponse::SearchResults {
            id,
            query: "alien".into(),
            page: page(vec![movie(1, "Alien"), movie(2, "Aliens")], 1, false),
        });
        assert!(state.select_next().is_empty());
        assert_eq!(state.search.selected, 1);
    }

    #[test]
    fn test_toggle_favorite_updates_row_and_store() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        state.handle_response(NetworkResponse::SearchResults {
            id,
            query: "alien".into(),
            page: page(vec![movie(1, "Alien")], 1, false),
        });
        state.toggle_favorite();
        assert!(state.search.movies[0].favorite());
        assert!(state.favorite_movies.is_favorite(1).unwrap());

        state.toggle_favorite();
        assert!(!state.search.movies[0].favorite());
        assert!(!state.favorite_movies.is_favorite(1).unwrap());
    }

    #[test]
    fn test_toggle_follows_store_over_stale_row() {
        let mut state = state();
        state.favorite_movies.set_favorite(&movie(1, "Alien"), true).unwrap();
        // Row loaded before the flag was written elsewhere
        state.search.movies = vec![movie(1, "Alien")];

        state.toggle_favorite();
        assert_eq!(state.search.movies[0].is_favorite, Some(false));
        assert!(!state.favorite_movies.is_favorite(1).unwrap());
    }

    #[test]
    fn test_open_details_requests_details_and_poster() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        state.handle_response(NetworkResponse::SearchResults {
            id,
            query: "alien".into(),
            page: page(vec![movie(1, "Alien")], 1, false),
        });
        let commands = state.open_selected();
        assert_eq!(state.screen(), Screen::Details);
        assert!(matches!(commands[0], NetworkCommand::FetchDetails { movie_id: 1, .. }));
        assert!(matches!(
            &commands[1],
            NetworkCommand::LoadPoster { url, width: 20, height: 15, .. } if url == "https://img.example.com/w200/1.jpg"
        ));
        assert!(state.details.as_ref().unwrap().loading);
    }

    #[test]
    fn test_details_response_and_back_cancels_poster() {
        let mut state = state();
        state.search.movies = vec![movie(1, "Alien")];
        let commands = state.open_selected();
        let (details_id, poster_id) = match (&commands[0], &commands[1]) {
            (NetworkCommand::FetchDetails { id, .. }, NetworkCommand::LoadPoster { id: p, .. }) => (*id, *p),
            other => panic!("unexpected commands: {:?}", other),
        };

        state.handle_response(NetworkResponse::Details {
            id: details_id,
            details: MovieDetails {
                movie: movie(1, "Alien"),
                runtime_minutes: Some(117),
                ..MovieDetails::default()
            },
        });
        let details = state.details.as_ref().unwrap();
        assert!(!details.loading);
        assert_eq!(details.details.as_ref().unwrap().runtime_minutes, Some(117));

        let commands = state.back();
        assert!(matches!(commands.as_slice(), [NetworkCommand::CancelRequest(id)] if *id == poster_id));
        assert_eq!(state.screen(), Screen::Search);
        assert!(state.details.is_none());
    }

    #[test]
    fn test_details_not_found_message() {
        let mut state = state();
        state.search.movies = vec![movie(1, "Alien")];
        let commands = state.open_selected();
        let NetworkCommand::FetchDetails { id, .. } = commands[0] else {
            panic!("expected details request");
        };
        state.handle_response(NetworkResponse::Failed {
            id,
            error: MovieError::NotFound,
        });
        let details = state.details.as_ref().unwrap();
        assert_eq!(details.error.as_deref(), Some("Result not found"));
        assert!(!details.loading);
    }

    #[test]
    fn test_favorite_in_details_reflected_on_back() {
        let mut state = state();
        state.search.movies = vec![movie(1, "Alien")];
        state.open_selected();
        state.toggle_favorite();
        assert!(state.details.as_ref().unwrap().movie.favorite());
        state.back();
        assert!(state.search.movies[0].favorite());
    }

    #[test]
    fn test_favorites_screen_remove_and_open() {
        let mut state = state();
        state.favorite_movies.set_favorite(&movie(1, "Alien"), true).unwrap();
        state.favorite_movies.set_favorite(&movie(2, "Brazil"), true).unwrap();

        state.show_favorites();
        assert_eq!(state.screen(), Screen::Favorites);
        assert_eq!(state.favorites.movies.len(), 2);

        state.select_next();
        state.toggle_favorite();
        assert_eq!(state.favorites.movies.len(), 1);
        assert_eq!(state.favorites.selected, 0);

        let commands = state.open_selected();
        assert!(matches!(commands[0], NetworkCommand::FetchDetails { movie_id: 1, .. }));
        assert_eq!(state.screens, vec![Screen::Search, Screen::Favorites, Screen::Details]);

        state.back();
        assert_eq!(state.screen(), Screen::Favorites);
    }

    #[test]
    fn test_back_at_root_is_noop() {
        let mut state = state();
        assert!(state.back().is_empty());
        assert_eq!(state.screens, vec![Screen::Search]);
    }

    #[test]
    fn test_reconnect_retries_failed_search() {
        let mut state = state();
        let id = pending_search(&type_query(&mut state, "alien"));
        state.handle_response(NetworkResponse::Connectivity { online: false });
        state.handle_response(NetworkResponse::Failed {
            id,
            error: MovieError::NoInternet,
        });
        assert!(!state.online);

        let commands = state.handle_response(NetworkResponse::Connectivity { online: true });
        assert!(matches!(
            commands.as_slice(),
            [NetworkCommand::SearchMovies { page: 1, debounce: false, .. }]
        ));
        assert_eq!(state.search.phase, SearchPhase::Loading);
    }

    #[test]
    fn test_cursor_editing_mid_query() {
        let mut state = state();
        type_query(&mut state, "alen");
        state.move_cursor_left();
        state.move_cursor_left();
        state.enter_char('i');
        assert_eq!(state.search.query, "alien");
        state.move_cursor_right();
        state.move_cursor_right();
        state.delete_char();
        assert_eq!(state.search.query, "alie");
    }
}
