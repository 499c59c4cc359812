//! UI layer - widgets and formatting shared by the screens
//!
//! Draw functions in the binary compose these; nothing here touches the
//! terminal directly.

use image::imageops::FilterType;
use ratatui::{prelude::*, widgets::*};

use crate::constants::PROJECT_VERSION_NUMBER;
use crate::models::Movie;

/// UI layer version number
pub const VERSION_NUMBER: f64 = PROJECT_VERSION_NUMBER;

/// UI layer version string
pub const VERSION_STRING: &str = concat!("MarqueeUI-", env!("CARGO_PKG_VERSION"));

pub const ACCENT: Color = Color::Yellow;
pub const MUTED: Color = Color::DarkGray;
pub const FAVORITE: Color = Color::Red;

/// Renders a text input field, showing a placeholder when empty
pub fn render_input<'a>(content: &'a str, title: &'a str, placeholder: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    if content.is_empty() {
        Paragraph::new(Span::styled(placeholder, Style::default().fg(MUTED).italic())).block(block)
    } else {
        Paragraph::new(content).block(block)
    }
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(ACCENT).bold())
        .divider(">")
}

/// One list row: favorite marker, title, year, rating
pub fn movie_row(movie: &Movie) -> Line<'static> {
    let heart = if movie.favorite() {
        Span::styled("♥ ", Style::default().fg(FAVORITE))
    } else {
        Span::raw("  ")
    };
    let mut spans = vec![heart, Span::raw(movie.display_title().to_string())];
    if let Some(year) = release_year(movie) {
        spans.push(Span::styled(format!(" ({})", year), Style::default().fg(MUTED)));
    }
    if let Some(rating) = movie.vote_average.filter(|r| *r > 0.0) {
        spans.push(Span::styled(
            format!("  ★ {:.1}", rating),
            Style::default().fg(rating_color(rating)),
        ));
    }
    Line::from(spans)
}

/// Renders a movie list with the selection highlighted
pub fn render_movie_list<'a>(movies: &[Movie], title: String, is_focused: bool) -> List<'a> {
    let items: Vec<ListItem> = movies.iter().map(|m| ListItem::new(movie_row(m))).collect();

    let border_style = if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };

    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(Style::default().fg(ACCENT).bold())
        .highlight_symbol("▶ ")
}

/// Centered message for empty, initial and error states
pub fn empty_state<'a>(headline: &'a str, detail: &'a str, color: Color) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(color).bold())),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(MUTED))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL))
}

/// Rating color
pub fn rating_color(rating: f64) -> Color {
    match rating {
        r if r >= 7.5 => Color::Green,
        r if r >= 6.0 => Color::Yellow,
        r if r >= 4.0 => Color::Magenta,
        _ => Color::Red,
    }
}

pub fn release_year(movie: &Movie) -> Option<String> {
    use chrono::Datelike;
    movie.release_date().map(|d| d.year().to_string())
}

/// "1h 57m" style runtime
pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Poster rasterized for the terminal: each cell is an upper half block
/// with the top pixel as foreground and the bottom pixel as background.
#[derive(Clone, Debug, PartialEq)]
pub struct PosterArt {
    width: u16,
    height: u16,
    pixels: Vec<[u8; 3]>,
}

impl PosterArt {
    /// Decode and scale to exactly `width` x `height` cells
    pub fn decode(data: &[u8], width: u16, height: u16) -> Result<Self, image::ImageError> {
        let width = width.max(1);
        let height = height.max(1);
        let img = image::load_from_memory(data)?;
        let rgb = img
            .resize_exact(u32::from(width), u32::from(height) * 2, FilterType::Triangle)
            .to_rgb8();
        Ok(PosterArt {
            width,
            height,
            pixels: rgb.pixels().map(|p| p.0).collect(),
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u16, y: u32) -> Color {
        let index = y as usize * self.width as usize + x as usize;
        match self.pixels.get(index) {
            Some([r, g, b]) => Color::Rgb(*r, *g, *b),
            None => Color::Reset,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..u32::from(self.height))
            .map(|row| {
                let spans: Vec<Span> = (0..self.width)
                    .map(|x| {
                        Span::styled(
                            "▀",
                            Style::default()
                                .fg(self.pixel(x, row * 2))
                                .bg(self.pixel(x, row * 2 + 1)),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
