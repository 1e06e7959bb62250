//! API client library for cinesearch.
//!
//! Provides a client for the TMDB movie search API.

/// TMDB API client.
pub mod tmdb;
