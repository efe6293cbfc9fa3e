//! cineref - link previews for The Movie Database URLs
//!
//! Recognizes TMDB movie, person and TV series URLs, resolves them into
//! preview metadata, and caches the result per user with explicit
//! invalidation. This library crate exposes the engine for the binary and
//! for integration testing.

pub mod config;
pub mod context;
pub mod metadata;
pub mod reference;
pub mod search;
pub mod server;
pub mod settings;
pub mod urls;

/// Application namespace for settings and rich-object kinds.
pub const APP_ID: &str = "cineref";
