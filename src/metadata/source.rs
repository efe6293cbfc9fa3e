//! Trait definition and record types for metadata sources.
//!
//! Records model the catalog's loosely-populated JSON as explicit optional
//! fields; nothing here assumes a field is present.

use async_trait::async_trait;
use cineref_common::{Result, UserId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lookup outcome
// ---------------------------------------------------------------------------

/// Outcome of a lookup that reached the metadata source.
///
/// `Error` is the source's error marker (not found, bad credentials, timeout).
/// It is data, not a failure: callers fall back on it. Failures of the
/// capability itself are reported through the outer `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Error(String),
}

impl<T> Lookup<T> {
    /// The record, discarding the error marker.
    #[cfg(test)]
    pub(crate) fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Error(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Error(message) => Lookup::Error(message),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Movie detail record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: Option<u64>,
    /// Localised title.
    pub title: Option<String>,
    /// Original-language title.
    pub original_title: Option<String>,
    pub overview: Option<String>,
    /// Path fragment for the poster image (e.g. `/abc123.jpg`).
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub imdb_id: Option<String>,
}

/// A movie search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieHit {
    pub id: u64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
}

/// A person search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonHit {
    pub id: u64,
    pub name: Option<String>,
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
}

/// A TV series search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesHit {
    pub id: u64,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Async capability fetching catalog records on behalf of a user.
///
/// The acting user selects credentials and language; `None` means the
/// deployment defaults.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Short, lowercase identifier for this source (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Fetch the movie detail record for the numeric catalog id `id`.
    async fn movie_info(&self, user: Option<&UserId>, id: &str) -> Result<Lookup<MovieRecord>>;

    /// Search movies; `page` is 1-based.
    async fn search_movies(
        &self,
        user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<MovieHit>>>;

    /// Search people; `page` is 1-based.
    async fn search_people(
        &self,
        user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<PersonHit>>>;

    /// Search TV series; `page` is 1-based.
    async fn search_series(
        &self,
        user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<SeriesHit>>>;
}
