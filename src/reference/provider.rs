//! The reference provider contract and its TMDB implementation.

use std::sync::Arc;

use async_trait::async_trait;
use cineref_common::{Result, UserId};
use tracing::debug;

use super::cache::PreviewCache;
use super::fallback::{FallbackResolver, LinkPreviewer};
use super::flags;
use super::matcher::{extract_identity, recognize};
use super::preview::ResolvedPreview;
use super::resolver::MetadataResolver;
use crate::metadata::MetadataSource;
use crate::search::SEARCH_PROVIDER_IDS;
use crate::settings::SettingsStore;
use crate::urls::UrlBuilder;

/// A pluggable reference resolver as seen by its host.
///
/// The host asks [`matches`](Self::matches) first, then caches the result of
/// [`resolve`](Self::resolve) under
/// `(cache_partition_key, cache_entry_key)`.
#[async_trait]
pub trait ReferenceProvider: Send + Sync {
    /// Stable provider identifier.
    fn id(&self) -> &'static str;

    /// Human-readable display name.
    fn title(&self) -> String;

    /// Sort position among providers; lower comes first.
    fn order(&self) -> i32;

    fn icon_url(&self) -> String;

    /// Search providers the acting user may use alongside this provider.
    fn supported_search_provider_ids(&self, user: Option<&UserId>) -> Vec<&'static str>;

    /// Whether `text` is a reference this provider handles for `user`.
    fn matches(&self, user: Option<&UserId>, text: &str) -> bool;

    /// Resolve `text` into a preview. `Ok(None)` means no preview.
    async fn resolve(&self, user: Option<&UserId>, text: &str) -> Result<Option<ResolvedPreview>>;

    /// Invalidation scope of a cached resolution.
    fn cache_partition_key(&self, user: Option<&UserId>, reference_id: &str) -> String;

    /// Identity of a cached resolution within its partition.
    fn cache_entry_key(&self, reference_id: &str) -> String;

    /// Drop every cached resolution of `user`.
    fn invalidate_partition(&self, user: Option<&UserId>);
}

/// Provider id exposed to hosts.
pub const PROVIDER_ID: &str = "tmdb-link";
pub const PROVIDER_TITLE: &str = "TMDB movies, people and TV series";
pub const PROVIDER_ORDER: i32 = 10;
const ICON_PATH: &str = "/static/tmdb.svg";

/// Reference provider for TMDB movie, person and TV series URLs.
pub struct TmdbReferenceProvider {
    settings: Arc<dyn SettingsStore>,
    urls: Arc<dyn UrlBuilder>,
    resolver: MetadataResolver,
    fallback: FallbackResolver,
    cache: Arc<dyn PreviewCache>,
}

impl TmdbReferenceProvider {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        source: Arc<dyn MetadataSource>,
        urls: Arc<dyn UrlBuilder>,
        previewer: Arc<dyn LinkPreviewer>,
        cache: Arc<dyn PreviewCache>,
    ) -> Self {
        Self {
            settings,
            resolver: MetadataResolver::new(source, urls.clone()),
            urls,
            fallback: FallbackResolver::new(previewer),
            cache,
        }
    }
}

#[async_trait]
impl ReferenceProvider for TmdbReferenceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn title(&self) -> String {
        PROVIDER_TITLE.to_string()
    }

    fn order(&self) -> i32 {
        PROVIDER_ORDER
    }

    fn icon_url(&self) -> String {
        self.urls.absolute_url(ICON_PATH)
    }

    fn supported_search_provider_ids(&self, user: Option<&UserId>) -> Vec<&'static str> {
        if flags::search_enabled(self.settings.as_ref(), user) {
            SEARCH_PROVIDER_IDS.to_vec()
        } else {
            Vec::new()
        }
    }

    fn matches(&self, user: Option<&UserId>, text: &str) -> bool {
        if !flags::link_preview_enabled(self.settings.as_ref(), user) {
            return false;
        }
        let kind = recognize(text);
        debug!(text, ?kind, "Reference match");
        kind.is_some()
    }

    async fn resolve(&self, user: Option<&UserId>, text: &str) -> Result<Option<ResolvedPreview>> {
        if !self.matches(user, text) {
            return Ok(None);
        }

        if let Some(reference) = extract_identity(text) {
            if let Some(preview) = self.resolver.resolve(user, &reference).await? {
                return Ok(Some(preview));
            }
        } else {
            debug!(text, "No resolvable identity, using fallback");
        }

        self.fallback.resolve_fallback(text).await
    }

    fn cache_partition_key(&self, user: Option<&UserId>, _reference_id: &str) -> String {
        user.map(|u| u.as_str().to_string()).unwrap_or_default()
    }

    fn cache_entry_key(&self, reference_id: &str) -> String {
        reference_id.to_string()
    }

    fn invalidate_partition(&self, user: Option<&UserId>) {
        self.cache.invalidate(&self.cache_partition_key(user, ""));
    }
}
