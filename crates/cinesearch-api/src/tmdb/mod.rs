//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 `search/movie` endpoint
//! and builds image and page URLs for the returned movies.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use types::{
    BACKDROP_SIZE, IMAGE_BASE_URL, Movie, POSTER_SIZE, SearchMovieParams, SearchMovieResponse,
    image_url,
};
