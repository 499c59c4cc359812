//! Persistence layer - offline movie cache with favorites
//!
//! Search pages are stored per (query, page). Favorites are flags on the
//! cached rows plus an anchor row under a reserved query so they survive
//! cache clears and render offline.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::constants::{DATA_DIR_NAME, FAVORITE_ANCHOR_QUERY, MAX_CACHED_QUERIES, PROJECT_VERSION_NUMBER};
use crate::models::Movie;

/// Persistence layer version number
pub const VERSION_NUMBER: f64 = PROJECT_VERSION_NUMBER;

/// Persistence layer version string
pub const VERSION_STRING: &str = concat!("MarqueePersistence-", env!("CARGO_PKG_VERSION"));

/// Movie fields kept in the cache
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedMovie {
    pub id: i64,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date_text: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub original_language: Option<String>,
    pub is_favorite: bool,
}

impl CachedMovie {
    /// Movies without an id cannot be cached
    pub fn from_movie(movie: &Movie) -> Option<Self> {
        Some(CachedMovie {
            id: movie.id?,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            release_date_text: movie.release_date_text.clone(),
            overview: movie.overview.clone(),
            vote_average: movie.vote_average,
            original_language: movie.original_language.clone(),
            is_favorite: movie.favorite(),
        })
    }

    pub fn into_movie(self) -> Movie {
        Movie {
            id: Some(self.id),
            title: self.title,
            release_date_text: self.release_date_text,
            poster_path: self.poster_path,
            adult: None,
            original_language: self.original_language,
            vote_average: self.vote_average,
            overview: self.overview,
            is_favorite: Some(self.is_favorite),
        }
    }
}

/// Storage seam used by repositories
pub trait MovieCacheStore: Send + Sync {
    /// Replace the rows for (query, page), keeping existing favorite flags
    fn save(&self, movies: &[CachedMovie], query: &str, page: u32) -> Result<()>;
    fn clear(&self, query: &str) -> Result<()>;
    /// Rows for (query, page) sorted by title
    fn fetch(&self, query: &str, page: u32) -> Result<Vec<CachedMovie>>;
    /// One entry per favorite id, sorted by title
    fn fetch_favorites(&self) -> Result<Vec<CachedMovie>>;
    fn set_favorite(&self, item: &CachedMovie) -> Result<()>;
    fn is_favorite(&self, id: i64) -> Result<bool>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CachedRow {
    #[serde(flatten)]
    movie: CachedMovie,
    query: String,
    page: u32,
    cached_at: DateTime<Utc>,
}

impl CachedRow {
    fn is_anchor(&self) -> bool {
        self.query == FAVORITE_ANCHOR_QUERY
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    rows: Vec<CachedRow>,
}

/// JSON-file backed cache. All operations run against an in-memory table
/// and write the whole table through to disk.
pub struct JsonMovieCache {
    path: Option<PathBuf>,
    rows: Mutex<Vec<CachedRow>>,
    max_queries: usize,
}

impl JsonMovieCache {
    /// Cache at the default data location
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME);
        Self::open(dir.join("cache.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut rows = load_rows(&path);
        prune_queries(&mut rows, MAX_CACHED_QUERIES);
        tracing::info!(path = %path.display(), rows = rows.len(), "movie cache opened");
        Ok(JsonMovieCache {
            path: Some(path),
            rows: Mutex::new(rows),
            max_queries: MAX_CACHED_QUERIES,
        })
    }

    /// Cache that never touches disk
    pub fn in_memory() -> Self {
        JsonMovieCache {
            path: None,
            rows: Mutex::new(Vec::new()),
            max_queries: MAX_CACHED_QUERIES,
        }
    }

    /// Override how many distinct queries are kept
    pub fn with_query_limit(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries.max(1);
        self
    }

    /// Drop every row, favorites included
    pub fn reset(&self) -> Result<()> {
        let mut rows = self.lock()?;
        rows.clear();
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
            }
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<CachedRow>>> {
        self.rows.lock().map_err(|_| anyhow!("movie cache lock poisoned"))
    }

    fn persist(&self, rows: &[CachedRow]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_vec(&CacheFileRef { rows })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    rows: &'a [CachedRow],
}

fn load_rows(path: &Path) -> Vec<CachedRow> {
    let Ok(content) = fs::read(path) else {
        return Vec::new();
    };
    match serde_json::from_slice::<CacheFile>(&content) {
        Ok(file) => file.rows,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt movie cache, starting empty");
            Vec::new()
        }
    }
}

/// Drop pages of all but the `max_queries` most recently cached queries.
/// Favorite anchors are never evicted; ties in `cached_at` go to the later row.
fn prune_queries(rows: &mut Vec<CachedRow>, max_queries: usize) {
    let mut latest: HashMap<&str, (DateTime<Utc>, usize)> = HashMap::new();
    for (index, row) in rows.iter().enumerate().filter(|(_, r)| !r.is_anchor()) {
        let entry = latest.entry(row.query.as_str()).or_insert((row.cached_at, index));
        if (row.cached_at, index) > *entry {
            *entry = (row.cached_at, index);
        }
    }
    if latest.len() <= max_queries {
        return;
    }

    let mut ranked: Vec<(&str, (DateTime<Utc>, usize))> = latest.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let evicted: HashSet<String> = ranked[max_queries..].iter().map(|(q, _)| q.to_string()).collect();

    let before = rows.len();
    rows.retain(|r| r.is_anchor() || !evicted.contains(&r.query));
    tracing::debug!(queries = evicted.len(), rows = before - rows.len(), "evicted stale cache pages");
}

fn by_title(a: &CachedMovie, b: &CachedMovie) -> std::cmp::Ordering {
    match (&a.title, &b.title) {
        (Some(x), Some(y)) => x.cmp(y).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

fn fill_if_empty(slot: &mut Option<String>, value: &Option<String>) {
    if slot.as_deref().map_or(true, str::is_empty) {
        if let Some(v) = value {
            *slot = Some(v.clone());
        }
    }
}

impl MovieCacheStore for JsonMovieCache {
    fn save(&self, movies: &[CachedMovie], query: &str, page: u32) -> Result<()> {
        let mut rows = self.lock()?;

        let incoming: HashSet<i64> = movies.iter().map(|m| m.id).collect();
        let favorite_ids: HashSet<i64> = rows
            .iter()
            .filter(|r| r.movie.is_favorite && incoming.contains(&r.movie.id))
            .map(|r| r.movie.id)
            .collect();

        rows.retain(|r| !(r.query == query && r.page == page));

        let now = Utc::now();
        rows.extend(movies.iter().map(|m| {
            let mut movie = m.clone();
            movie.is_favorite = favorite_ids.contains(&m.id);
            CachedRow {
                movie,
                query: query.to_string(),
                page,
                cached_at: now,
            }
        }));

        prune_queries(&mut rows, self.max_queries);

        tracing::debug!(query, page, count = movies.len(), "cached search page");
        self.persist(&rows)
    }

    fn clear(&self, query: &str) -> Result<()> {
        let mut rows = self.lock()?;
        rows.retain(|r| r.query != query);
        self.persist(&rows)
    }

    fn fetch(&self, query: &str, page: u32) -> Result<Vec<CachedMovie>> {
        let rows = self.lock()?;
        let mut movies: Vec<CachedMovie> = rows
            .iter()
            .filter(|r| r.query == query && r.page == page)
            .map(|r| r.movie.clone())
            .collect();
        movies.sort_by(by_title);
        Ok(movies)
    }

    fn fetch_favorites(&self) -> Result<Vec<CachedMovie>> {
        let rows = self.lock()?;
        let mut seen = HashSet::new();
        let mut favorites = Vec::new();
        // Anchors first so they win the dedupe
        let anchors = rows.iter().filter(|r| r.is_anchor());
        let others = rows.iter().filter(|r| !r.is_anchor());
        for row in anchors.chain(others) {
            if row.movie.is_favorite && seen.insert(row.movie.id) {
                favorites.push(row.movie.clone());
            }
        }
        favorites.sort_by(by_title);
        Ok(favorites)
    }

    fn set_favorite(&self, item: &CachedMovie) -> Result<()> {
        let mut rows = self.lock()?;

        for row in rows.iter_mut().filter(|r| r.movie.id == item.id) {
            row.movie.is_favorite = item.is_favorite;
        }

        let anchor_index = rows
            .iter()
            .position(|r| r.is_anchor() && r.movie.id == item.id);
        let anchor_index = match anchor_index {
            Some(i) => Some(i),
            None if item.is_favorite => {
                rows.push(CachedRow {
                    movie: CachedMovie {
                        id: item.id,
                        ..CachedMovie::default()
                    },
                    query: FAVORITE_ANCHOR_QUERY.to_string(),
                    page: 0,
                    cached_at: Utc::now(),
                });
                Some(rows.len() - 1)
            }
            None => None,
        };

        if let Some(i) = anchor_index {
            let anchor = &mut rows[i].movie;
            anchor.is_favorite = item.is_favorite;
            fill_if_empty(&mut anchor.title, &item.title);
            fill_if_empty(&mut anchor.poster_path, &item.poster_path);
            fill_if_empty(&mut anchor.release_date_text, &item.release_date_text);
            fill_if_empty(&mut anchor.overview, &item.overview);
            fill_if_empty(&mut anchor.original_language, &item.original_language);
            if anchor.vote_average.is_none() {
                anchor.vote_average = item.vote_average;
            }
        }

        tracing::info!(id = item.id, favorite = item.is_favorite, "favorite updated");
        self.persist(&rows)
    }

    fn is_favorite(&self, id: i64) -> Result<bool> {
        let rows = self.lock()?;
        Ok(rows.iter().any(|r| r.movie.id == id && r.movie.is_favorite))
    }
}
