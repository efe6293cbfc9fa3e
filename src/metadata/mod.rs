//! Catalog metadata lookups.
//!
//! This module defines the [`MetadataSource`] capability the reference engine
//! resolves through, and the TMDB implementation of it.
//!
//! # Module layout
//!
//! - [`source`] -- Trait definition, lookup outcome and record types.
//! - [`tmdb`] -- TMDB v3 REST client.

pub mod source;
pub mod tmdb;

pub use source::{
    Lookup, MetadataSource, MovieHit, MovieRecord, PersonHit, SeriesHit,
};
pub use tmdb::{ProxiedImage, TmdbClient};
