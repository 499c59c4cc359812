//! Marquee - actor-based terminal movie browser
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - navigation stack and screen state
//! - Network Layer (Tokio) - API calls, poster loading, connectivity

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use marquee::app::state::{DetailsState, PosterStatus, SearchPhase};
use marquee::app::{AppActor, AppState};
use marquee::constants::{
    APP_NAME, APP_VERSION, DATA_DIR_NAME, LOG_FILE_NAME, MIN_QUERY_CHARS, POSTER_HEIGHT, POSTER_WIDTH,
};
use marquee::features::{
    CachedFavoritesRepository, FavoriteMovieUseCase, GetMovieDetailsUseCase, RemoteDetailsRepository,
    RemoteSearchRepository, SearchMoviesUseCase,
};
use marquee::messages::ui_events::{key_to_ui_event, InputMode, Screen};
use marquee::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use marquee::network::{
    self, ApiConfig, DefaultRequestBuilder, ImageLoader, NetworkActor, ReqwestHttpClient, RequestExecutor,
    Services,
};
use marquee::storage::{self, JsonMovieCache, MovieCacheStore};
use marquee::ui::{self, empty_state, format_runtime, release_year, render_input, render_movie_list, render_tabs};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config errors should print on a normal terminal
    let config = ApiConfig::load()?;

    // Initialize logging to file
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(DATA_DIR_NAME);
    std::fs::create_dir_all(&data_dir).with_context(|| format!("creating {}", data_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&data_dir, LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(
        version = APP_VERSION,
        core = network::VERSION_STRING,
        persistence = storage::VERSION_STRING,
        ui = ui::VERSION_STRING,
        api = %config.base_url,
        "starting {}",
        APP_NAME
    );

    // Wire repositories and use cases
    let cache: Arc<dyn MovieCacheStore> = Arc::new(JsonMovieCache::open_default()?);
    let executor = Arc::new(RequestExecutor::new(
        Arc::new(DefaultRequestBuilder::new(config.clone())),
        Arc::new(ReqwestHttpClient::new()),
    ));
    let search = RemoteSearchRepository::new(executor.clone(), cache.clone(), config.language.clone());
    let details = RemoteDetailsRepository::new(executor, cache.clone(), config.language.clone());
    let favorites = FavoriteMovieUseCase::new(Arc::new(CachedFavoritesRepository::new(cache)));

    let services = Services::new(
        Arc::new(SearchMoviesUseCase::new(Arc::new(search))),
        Arc::new(GetMovieDetailsUseCase::new(Arc::new(details))),
        ImageLoader::new()?,
        config.probe_address(),
    );
    let state = AppState::new(
        Arc::new(favorites),
        config.image_base_url.clone(),
        (POSTER_WIDTH, POSTER_HEIGHT),
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(services, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("shutting down");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen(),
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let banner_height = if state.online { 0 } else { 1 };
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Breadcrumbs
            Constraint::Length(banner_height), // Offline banner
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    draw_breadcrumbs(f, state, main_chunks[0]);
    if !state.online {
        draw_offline_banner(f, main_chunks[1]);
    }

    match state.screen() {
        Screen::Search => draw_search(f, state, main_chunks[2]),
        Screen::Details => {
            if let Some(details) = &state.details {
                draw_details(f, details, main_chunks[2]);
            }
        }
        Screen::Favorites => draw_favorites(f, state, main_chunks[2]),
    }

    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_breadcrumbs(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles: Vec<&str> = state.screens.iter().map(|s| s.title()).collect();
    let selected = titles.len().saturating_sub(1);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(20)])
        .split(area);

    f.render_widget(render_tabs(&titles, selected), chunks[0]);
    f.render_widget(
        Paragraph::new(format!("{} v{}", APP_NAME, APP_VERSION))
            .alignment(Alignment::Right)
            .style(Style::default().fg(ui::MUTED)),
        chunks[1],
    );
}

fn draw_offline_banner(f: &mut Frame, area: Rect) {
    let banner = Paragraph::new("No Internet Connection — Trying to reconnect…")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).bg(Color::Red).bold());
    f.render_widget(banner, area);
}

fn draw_search(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let search = &state.search;
    let editing = state.input_mode == InputMode::Editing;
    let title = format!(" {} ", search.title);
    let input = render_input(&search.query, &title, "Type a movie title…", editing);
    f.render_widget(input, chunks[0]);

    if editing {
        let typed = search.query[..search.cursor.min(search.query.len())].chars().count() as u16;
        let cursor_x = (chunks[0].x + 1 + typed).min(chunks[0].right().saturating_sub(2));
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let list_area = chunks[1];
    if search.movies.is_empty() {
        let min_chars = format!("Enter at least {} characters to search.", MIN_QUERY_CHARS);
        let panel = match &search.phase {
            SearchPhase::Idle => empty_state("Search for a movie", "Start typing a title. Tab opens favorites.", ui::ACCENT),
            SearchPhase::Initial => empty_state("Keep typing…", &min_chars, ui::ACCENT),
            SearchPhase::Loading | SearchPhase::LoadingMore => empty_state("Searching…", "", ui::ACCENT),
            SearchPhase::Loaded => empty_state("No results found", "Try a different title.", ui::MUTED),
            SearchPhase::Error(message) => empty_state("Something went wrong", message, Color::Red),
        };
        f.render_widget(panel, list_area);
        return;
    }

    let mut list_title = format!(" {} ", search.title);
    match &search.phase {
        SearchPhase::LoadingMore => list_title.push_str("· loading more… "),
        SearchPhase::Error(message) => list_title.push_str(&format!("· {} ", message)),
        _ => {}
    }
    let list = render_movie_list(&search.movies, list_title, !editing);
    let mut list_state = ListState::default().with_selected(Some(search.selected));
    f.render_stateful_widget(list, list_area, &mut list_state);
}

fn draw_details(f: &mut Frame, details: &DetailsState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(POSTER_WIDTH + 2), Constraint::Min(0)])
        .split(area);

    draw_poster(f, &details.poster, chunks[0]);

    let movie = &details.movie;
    let mut lines = Vec::new();

    let mut heading = vec![Span::styled(
        movie.display_title().to_string(),
        Style::default().fg(ui::ACCENT).bold(),
    )];
    if movie.favorite() {
        heading.push(Span::styled("  ♥", Style::default().fg(ui::FAVORITE)));
    }
    lines.push(Line::from(heading));

    let mut facts = Vec::new();
    if let Some(year) = release_year(movie) {
        facts.push(year);
    }
    if let Some(minutes) = details.details.as_ref().and_then(|d| d.runtime_minutes) {
        facts.push(format_runtime(minutes));
    }
    if let Some(language) = &movie.original_language {
        facts.push(language.to_uppercase());
    }
    if let Some(rating) = movie.vote_average.filter(|r| *r > 0.0) {
        facts.push(format!("★ {:.1}", rating));
    }
    lines.push(Line::from(Span::styled(facts.join(" · "), Style::default().fg(ui::MUTED))));

    if let Some(full) = &details.details {
        if !full.genres.is_empty() {
            lines.push(Line::from(full.genres.join(", ")));
        }
        if let Some(tagline) = &full.tagline {
            lines.push(Line::from(Span::styled(tagline.clone(), Style::default().italic())));
        }
        if let Some(status) = &full.status {
            lines.push(Line::from(Span::styled(
                format!("Status: {}", status),
                Style::default().fg(ui::MUTED),
            )));
        }
        if let Some(homepage) = &full.homepage {
            lines.push(Line::from(Span::styled(
                homepage.clone(),
                Style::default().fg(Color::Cyan).underlined(),
            )));
        }
    }
    lines.push(Line::from(""));

    if details.loading {
        lines.push(Line::from(Span::styled("Loading details…", Style::default().fg(ui::ACCENT))));
    }
    if let Some(error) = &details.error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    match movie.overview.as_deref().filter(|o| !o.is_empty()) {
        Some(overview) => lines.push(Line::from(overview.to_string())),
        None if !details.loading => lines.push(Line::from(Span::styled(
            "No overview available.",
            Style::default().fg(ui::MUTED),
        ))),
        None => {}
    }

    let info = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(info, chunks[1]);
}

fn draw_poster(f: &mut Frame, poster: &PosterStatus, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Poster ");
    let content = match poster {
        PosterStatus::Ready(art) => Paragraph::new(art.to_lines()),
        PosterStatus::Loading => Paragraph::new("Loading…").alignment(Alignment::Center),
        PosterStatus::Missing => Paragraph::new("No poster").alignment(Alignment::Center),
        PosterStatus::Failed(message) => Paragraph::new(message.as_str())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(ui::MUTED)),
    };
    f.render_widget(content.block(block), area);
}

fn draw_favorites(f: &mut Frame, state: &RenderState, area: Rect) {
    let favorites = &state.favorites;
    if let Some(error) = &favorites.error {
        f.render_widget(empty_state("Could not load favorites", error, Color::Red), area);
        return;
    }
    if favorites.movies.is_empty() {
        f.render_widget(
            empty_state("No favorites yet", "Press f on a movie to add it here.", ui::MUTED),
            area,
        );
        return;
    }
    let list = render_movie_list(&favorites.movies, format!(" Favorites ({}) ", favorites.movies.len()), true);
    let mut list_state = ListState::default().with_selected(Some(favorites.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(status) = &state.status {
        let bar = Paragraph::new(format!(" {} ", status)).style(Style::default().fg(Color::Red));
        f.render_widget(bar, area);
        return;
    }

    let hints = match state.screen() {
        Screen::Search if state.input_mode == InputMode::Editing => {
            " Enter/Esc:results | ↑↓:select | Tab:favorites | Ctrl+U:clear | Ctrl+C:quit "
        }
        Screen::Search => " /:search | ↑↓:select | Enter:details | f:favorite | Tab:favorites | ?:help | q:quit ",
        Screen::Details => " f:favorite | Esc:back | ?:help | q:quit ",
        Screen::Favorites => " ↑↓:select | Enter:details | f:remove | Esc:back | ?:help | q:quit ",
    };

    let bar = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MARQUEE - Keyboard Shortcuts

 SEARCH
   type               Edit the query (searches from 3 characters)
   Enter / Esc        Move focus to the results
   / or i             Edit the query again
   Ctrl+U             Clear the query
   ↑ / ↓  (j / k)     Select a movie; the last row loads more
   Enter              Open details

 FAVORITES
   f                  Toggle favorite (remove on the favorites screen)
   Tab / v            Open the favorites screen

 NAVIGATION
   Esc / Backspace    Back

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
