//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Screens on the navigation stack
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Search,
    Details,
    Favorites,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Search => "Search",
            Screen::Details => "Details",
            Screen::Favorites => "Favorites",
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Query editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    ClearQuery,
    CursorLeft,
    CursorRight,

    // Lists
    SelectNext,
    SelectPrev,
    Open,

    // Navigation
    Back,
    ShowFavorites,

    ToggleFavorite,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    Normal,
    #[default]
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, screen: Screen, input_mode: InputMode, show_help: bool) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(UiEvent::Quit),
            KeyCode::Char('u') if screen == Screen::Search => Some(UiEvent::ClearQuery),
            _ => None,
        };
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match screen {
        Screen::Search => handle_search_keys(key, input_mode),
        Screen::Details => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('f') => Some(UiEvent::ToggleFavorite),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => Some(UiEvent::Back),
            _ => None,
        },
        Screen::Favorites => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('f') | KeyCode::Delete => Some(UiEvent::ToggleFavorite),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Enter | KeyCode::Right => Some(UiEvent::Open),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => Some(UiEvent::Back),
            _ => None,
        },
    }
}

/// Search screen: typing goes to the query while editing, list keys otherwise
fn handle_search_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Tab => Some(UiEvent::ShowFavorites),
            KeyCode::Up => Some(UiEvent::SelectPrev),
            KeyCode::Down => Some(UiEvent::SelectNext),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('/') | KeyCode::Char('i') | KeyCode::Esc => Some(UiEvent::StartEditing),
            KeyCode::Char('f') => Some(UiEvent::ToggleFavorite),
            KeyCode::Tab | KeyCode::Char('v') => Some(UiEvent::ShowFavorites),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Enter | KeyCode::Right => Some(UiEvent::Open),
            _ => None,
        },
    }
}
