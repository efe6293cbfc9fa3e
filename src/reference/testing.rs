//! Stub collaborators shared by the reference and search unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cineref_common::{Error, Result, UserId};
use parking_lot::Mutex;

use super::fallback::LinkPreviewer;
use super::preview::ResolvedPreview;
use crate::metadata::{Lookup, MetadataSource, MovieHit, MovieRecord, PersonHit, SeriesHit};
use crate::urls::UrlBuilder;

/// Formats URLs as `proxy:<size>:<path>` and `abs:<path>`.
pub struct TestUrls;

impl UrlBuilder for TestUrls {
    fn image_url(&self, size: &str, path: &str) -> String {
        format!("proxy:{size}:{path}")
    }

    fn absolute_url(&self, path: &str) -> String {
        format!("abs:{path}")
    }
}

enum MovieReply {
    Found(MovieRecord),
    Marker(String),
    Unavailable,
}

/// Metadata source returning canned results and recording calls.
pub struct StubSource {
    movie: MovieReply,
    movies: Vec<MovieHit>,
    people: Vec<PersonHit>,
    series: Vec<SeriesHit>,
    movie_calls: Mutex<Vec<String>>,
    search_calls: Mutex<Vec<(String, u32)>>,
}

impl StubSource {
    fn with(movie: MovieReply) -> Self {
        Self {
            movie,
            movies: Vec::new(),
            people: Vec::new(),
            series: Vec::new(),
            movie_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn movie(record: MovieRecord) -> Self {
        Self::with(MovieReply::Found(record))
    }

    pub fn movie_error(message: &str) -> Self {
        Self::with(MovieReply::Marker(message.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(MovieReply::Unavailable)
    }

    pub fn with_hits(
        mut self,
        movies: Vec<MovieHit>,
        people: Vec<PersonHit>,
        series: Vec<SeriesHit>,
    ) -> Self {
        self.movies = movies;
        self.people = people;
        self.series = series;
        self
    }

    pub fn movie_calls(&self) -> Vec<String> {
        self.movie_calls.lock().clone()
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().clone()
    }

    fn reply<T: Clone>(&self, hits: &[T], query: &str, page: u32) -> Result<Lookup<Vec<T>>> {
        self.search_calls.lock().push((query.to_string(), page));
        match self.movie {
            MovieReply::Unavailable => Err(Error::Internal("source offline".into())),
            _ => Ok(Lookup::Found(hits.to_vec())),
        }
    }
}

#[async_trait]
impl MetadataSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn movie_info(&self, _user: Option<&UserId>, id: &str) -> Result<Lookup<MovieRecord>> {
        self.movie_calls.lock().push(id.to_string());
        match &self.movie {
            MovieReply::Found(record) => Ok(Lookup::Found(record.clone())),
            MovieReply::Marker(message) => Ok(Lookup::Error(message.clone())),
            MovieReply::Unavailable => Err(Error::Internal("source offline".into())),
        }
    }

    async fn search_movies(
        &self,
        _user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<MovieHit>>> {
        self.reply(&self.movies, query, page)
    }

    async fn search_people(
        &self,
        _user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<PersonHit>>> {
        self.reply(&self.people, query, page)
    }

    async fn search_series(
        &self,
        _user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<SeriesHit>>> {
        self.reply(&self.series, query, page)
    }
}

/// Generic previewer returning a fixed answer and counting calls.
pub struct StubPreviewer {
    title: Option<String>,
    calls: AtomicUsize,
}

impl StubPreviewer {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            title: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkPreviewer for StubPreviewer {
    async fn preview(&self, text: &str) -> Result<Option<ResolvedPreview>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.title.as_ref().map(|title| ResolvedPreview {
            source_text: text.to_string(),
            title: title.clone(),
            description: String::new(),
            image_url: String::new(),
            catalog_url: text.to_string(),
            rich_object: None,
        }))
    }
}
