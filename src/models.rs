use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A movie as shown in lists and on the details screen
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub release_date_text: Option<String>,
    pub poster_path: Option<String>,
    pub adult: Option<bool>,
    pub original_language: Option<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    pub is_favorite: Option<bool>,
}

impl Movie {
    /// Poster URL relative to an image base such as `.../t/p/w200/`
    pub fn poster_url(&self, base: &Url) -> Option<Url> {
        let path = self.poster_path.as_deref()?.trim_matches('/');
        if path.is_empty() {
            return None;
        }
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path).ok()
    }

    /// Release date parsed from the API's `yyyy-MM-dd` text
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date_text
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled")
    }

    pub fn favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }
}

/// One page of results
#[derive(Clone, Debug, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub has_more: bool,
    pub total_pages: Option<u32>,
    pub total_results: Option<u32>,
}

impl<T> Paged<T> {
    pub fn empty() -> Self {
        Paged {
            items: Vec::new(),
            page: 1,
            has_more: false,
            total_pages: None,
            total_results: None,
        }
    }
}

/// Details screen payload: the movie plus details-only fields
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub tagline: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub homepage: Option<String>,
}

// ============================================================================
// API DTOs
// ============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchResponseDto {
    pub page: Option<u32>,
    pub results: Option<Vec<SearchMovieDto>>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchMovieDto {
    pub adult: Option<bool>,
    pub backdrop_path: Option<String>,
    pub genre_ids: Option<Vec<i64>>,
    pub id: Option<i64>,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub popularity: Option<f64>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub title: Option<String>,
    pub video: Option<bool>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MovieDetailsDto {
    pub adult: Option<bool>,
    pub backdrop_path: Option<String>,
    pub belongs_to_collection: Option<CollectionDto>,
    pub budget: Option<i64>,
    pub genres: Option<Vec<GenreDto>>,
    pub homepage: Option<String>,
    pub id: Option<i64>,
    pub imdb_id: Option<String>,
    pub origin_country: Option<Vec<String>>,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub popularity: Option<f64>,
    pub poster_path: Option<String>,
    pub production_companies: Option<Vec<ProductionCompanyDto>>,
    pub production_countries: Option<Vec<ProductionCountryDto>>,
    pub release_date: Option<String>,
    pub revenue: Option<i64>,
    pub runtime: Option<u32>,
    pub spoken_languages: Option<Vec<SpokenLanguageDto>>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub title: Option<String>,
    pub video: Option<bool>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollectionDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductionCompanyDto {
    pub id: Option<i64>,
    pub logo_path: Option<String>,
    pub name: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProductionCountryDto {
    pub iso_3166_1: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SpokenLanguageDto {
    pub english_name: Option<String>,
    pub iso_639_1: Option<String>,
    pub name: Option<String>,
}

// ============================================================================
// Mapping
// ============================================================================

impl From<SearchMovieDto> for Movie {
    fn from(dto: SearchMovieDto) -> Self {
        Movie {
            id: dto.id,
            title: dto.title,
            release_date_text: dto.release_date,
            poster_path: dto.poster_path,
            adult: dto.adult,
            original_language: dto.original_language,
            vote_average: dto.vote_average,
            overview: dto.overview,
            is_favorite: None,
        }
    }
}

impl From<SearchResponseDto> for Paged<Movie> {
    fn from(dto: SearchResponseDto) -> Self {
        let page = dto.page.unwrap_or(1);
        let has_more = dto.total_pages.is_some_and(|total| page < total);
        Paged {
            items: dto
                .results
                .unwrap_or_default()
                .into_iter()
                .map(Movie::from)
                .collect(),
            page,
            has_more,
            total_pages: dto.total_pages,
            total_results: dto.total_results,
        }
    }
}

impl From<MovieDetailsDto> for MovieDetails {
    fn from(dto: MovieDetailsDto) -> Self {
        MovieDetails {
            movie: Movie {
                id: dto.id,
                title: dto.title,
                release_date_text: dto.release_date,
                poster_path: dto.poster_path,
                adult: dto.adult,
                original_language: dto.original_language,
                vote_average: dto.vote_average,
                overview: dto.overview,
                is_favorite: None,
            },
            tagline: dto.tagline.filter(|t| !t.is_empty()),
            runtime_minutes: dto.runtime.filter(|r| *r > 0),
            genres: dto
                .genres
                .unwrap_or_default()
                .into_iter()
                .filter_map(|g| g.name)
                .collect(),
            status: dto.status,
            homepage: dto.homepage.filter(|h| !h.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url_trims_slashes() {
        let base = Url::parse("https://image.tmdb.org/t/p/w200/").unwrap();
        let movie = Movie {
            poster_path: Some("/abc.jpg".to_string()),
            ..Movie::default()
        };
        assert_eq!(
            movie.poster_url(&base).unwrap().as_str(),
            "https://image.tmdb.org/t/p/w200/abc.jpg"
        );

        let no_slash = Url::parse("https://image.tmdb.org/t/p/w200").unwrap();
        assert_eq!(
            movie.poster_url(&no_slash).unwrap().as_str(),
            "https://image.tmdb.org/t/p/w200/abc.jpg"
        );
    }

    #[test]
    fn test_poster_url_missing_path() {
        let base = Url::parse("https://image.tmdb.org/t/p/w200/").unwrap();
        assert!(Movie::default().poster_url(&base).is_none());
    }

    #[test]
    fn test_search_response_mapping() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 78, "title": "Blade Runner", "release_date": "1982-06-25",
                 "poster_path": "/p.jpg", "vote_average": 7.9, "original_language": "en"}
            ],
            "total_pages": 3,
            "total_results": 41
        }"#;
        let dto: SearchResponseDto = serde_json::from_str(json).unwrap();
        let paged: Paged<Movie> = dto.into();
        assert_eq!(paged.items.len(), 1);
        assert!(paged.has_more);
        assert_eq!(paged.total_results, Some(41));
        let movie = &paged.items[0];
        assert_eq!(movie.id, Some(78));
        assert_eq!(movie.release_date(), NaiveDate::from_ymd_opt(1982, 6, 25));
    }

    #[test]
    fn test_last_page_has_no_more() {
        let dto = SearchResponseDto {
            page: Some(3),
            results: Some(vec![]),
            total_pages: Some(3),
            total_results: Some(41),
        };
        let paged: Paged<Movie> = dto.into();
        assert!(!paged.has_more);
    }

    #[test]
    fn test_details_mapping() {
        let json = r#"{"id": 78, "title": "Blade Runner", "runtime": 117,
            "genres": [{"id": 878, "name": "Science Fiction"}, {"id": 18}],
            "tagline": "", "status": "Released", "homepage": "https://bladerunner.example"}"#;
        let dto: MovieDetailsDto = serde_json::from_str(json).unwrap();
        let details: MovieDetails = dto.into();
        assert_eq!(details.homepage.as_deref(), Some("https://bladerunner.example"));
        assert_eq!(details.runtime_minutes, Some(117));
        assert_eq!(details.genres, vec!["Science Fiction".to_string()]);
        assert!(details.tagline.is_none());
        assert_eq!(details.movie.display_title(), "Blade Runner");
    }
}
