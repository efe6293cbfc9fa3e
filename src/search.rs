//! Catalog search providers.
//!
//! Three search providers, one per reference kind. Every entry links to the
//! canonical catalog URL, so picking a result yields text the reference
//! provider recognizes.

use std::sync::Arc;

use cineref_common::{ReferenceKind, Result, UserId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::metadata::{Lookup, MetadataSource, MovieHit, PersonHit, SeriesHit};
use crate::reference::flags;
use crate::reference::preview::{compose_title, UNKNOWN_TITLE};
use crate::settings::SettingsStore;
use crate::urls::{catalog_url, UrlBuilder};

pub const SEARCH_MOVIE: &str = "tmdb-search-movie";
pub const SEARCH_PERSON: &str = "tmdb-search-person";
pub const SEARCH_SERIES: &str = "tmdb-search-series";

/// Every search provider id, in display order.
pub const SEARCH_PROVIDER_IDS: [&str; 3] = [SEARCH_MOVIE, SEARCH_PERSON, SEARCH_SERIES];

/// TMDB returns fixed pages of this size.
const PAGE_SIZE: usize = 20;
const THUMBNAIL_SIZE: &str = "w92";

/// The kind a search provider id searches for.
pub fn search_kind(provider_id: &str) -> Option<ReferenceKind> {
    match provider_id {
        SEARCH_MOVIE => Some(ReferenceKind::Movie),
        SEARCH_PERSON => Some(ReferenceKind::Person),
        SEARCH_SERIES => Some(ReferenceKind::Series),
        _ => None,
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub title: String,
    /// Year or department, empty when unknown.
    pub subline: String,
    /// Proxied thumbnail, empty when the entity has no image.
    pub thumbnail_url: String,
    /// Canonical catalog URL.
    pub resource_url: String,
}

pub struct CatalogSearch {
    settings: Arc<dyn SettingsStore>,
    source: Arc<dyn MetadataSource>,
    urls: Arc<dyn UrlBuilder>,
}

impl CatalogSearch {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        source: Arc<dyn MetadataSource>,
        urls: Arc<dyn UrlBuilder>,
    ) -> Self {
        Self {
            settings,
            source,
            urls,
        }
    }

    /// Run `provider_id` for `term`, returning at most `limit` entries starting
    /// at `offset`.
    ///
    /// Unknown or disabled providers, blank terms and upstream error markers all
    /// yield an empty list.
    pub async fn search(
        &self,
        user: Option<&UserId>,
        provider_id: &str,
        term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchEntry>> {
        let Some(kind) = search_kind(provider_id) else {
            debug!(provider_id, "Unknown search provider");
            return Ok(Vec::new());
        };
        if !flags::search_enabled(self.settings.as_ref(), user) {
            debug!(provider_id, "Search disabled for user");
            return Ok(Vec::new());
        }
        let term = term.trim();
        if term.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        // Only the page holding `offset` is fetched; a window that spans two
        // pages is cut at the page boundary.
        let page = u32::try_from(offset / PAGE_SIZE + 1).unwrap_or(u32::MAX);
        let skip = offset % PAGE_SIZE;

        let entries: Lookup<Vec<SearchEntry>> = match kind {
            ReferenceKind::Movie => self
                .source
                .search_movies(user, term, page)
                .await?
                .map(|hits| hits.iter().map(|h| self.movie_entry(h)).collect()),
            ReferenceKind::Person => self
                .source
                .search_people(user, term, page)
                .await?
                .map(|hits| hits.iter().map(|h| self.person_entry(h)).collect()),
            ReferenceKind::Series => self
                .source
                .search_series(user, term, page)
                .await?
                .map(|hits| hits.iter().map(|h| self.series_entry(h)).collect()),
        };

        match entries {
            Lookup::Found(entries) => Ok(entries.into_iter().skip(skip).take(limit).collect()),
            Lookup::Error(message) => {
                warn!(provider_id, error = %message, "Catalog search failed");
                Ok(Vec::new())
            }
        }
    }

    fn thumbnail(&self, path: Option<&str>) -> String {
        path.filter(|p| !p.is_empty())
            .map(|p| self.urls.image_url(THUMBNAIL_SIZE, p))
            .unwrap_or_default()
    }

    fn movie_entry(&self, hit: &MovieHit) -> SearchEntry {
        SearchEntry {
            title: compose_title(hit.title.as_deref(), hit.original_title.as_deref()),
            subline: year(hit.release_date.as_deref()),
            thumbnail_url: self.thumbnail(hit.poster_path.as_deref()),
            resource_url: catalog_url(ReferenceKind::Movie, hit.id),
        }
    }

    fn person_entry(&self, hit: &PersonHit) -> SearchEntry {
        SearchEntry {
            title: hit
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            subline: hit.known_for_department.clone().unwrap_or_default(),
            thumbnail_url: self.thumbnail(hit.profile_path.as_deref()),
            resource_url: catalog_url(ReferenceKind::Person, hit.id),
        }
    }

    fn series_entry(&self, hit: &SeriesHit) -> SearchEntry {
        SearchEntry {
            title: compose_title(hit.name.as_deref(), hit.original_name.as_deref()),
            subline: year(hit.first_air_date.as_deref()),
            thumbnail_url: self.thumbnail(hit.poster_path.as_deref()),
            resource_url: catalog_url(ReferenceKind::Series, hit.id),
        }
    }
}

/// Leading `YYYY` of an ISO date, or empty.
fn year(date: Option<&str>) -> String {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or_default()
        .to_string()
}
