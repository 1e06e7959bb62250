//! TMDB API response types and search parameters.

use serde::Deserialize;

/// Base URL for TMDB image assets.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Image size used for grid posters.
pub const POSTER_SIZE: &str = "w500";

/// Image size used for the detail backdrop.
pub const BACKDROP_SIZE: &str = "original";

/// Base URL for TMDB movie pages.
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie/";

/// Builds a full image URL from a TMDB image path (e.g. `/abc.jpg`).
#[must_use]
pub fn image_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE_URL}{size}/{}", path.trim_start_matches('/'))
}

// --- Search Movie ---

/// Response from `search/movie` endpoint.
///
/// Every field is optional on the wire; a response without `results`
/// decodes as an empty result set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchMovieResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Search results, in the order TMDB ranked them.
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie search result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average (0-10).
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Returns the release year, if the release date is known.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }

    /// Returns the non-empty overview text.
    #[must_use]
    pub fn overview_text(&self) -> Option<&str> {
        self.overview.as_deref().filter(|text| !text.trim().is_empty())
    }

    /// Full poster URL in grid size.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| image_url(path, POSTER_SIZE))
    }

    /// Full backdrop URL in original size.
    #[must_use]
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| image_url(path, BACKDROP_SIZE))
    }

    /// TMDB web page for this movie.
    #[must_use]
    pub fn tmdb_url(&self) -> String {
        format!("{MOVIE_PAGE_BASE_URL}{}", self.id)
    }
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}

// --- Search Parameters ---

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets whether adult titles are included.
    #[must_use]
    pub const fn include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }
}
