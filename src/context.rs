//! Application context.
//!
//! [`AppContext`] wires the default collaborators together once at startup
//! and is shared by the HTTP handlers (as Axum state) and the CLI commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cineref_common::Result;

use crate::config::Config;
use crate::metadata::TmdbClient;
use crate::reference::{
    LinkPreviewer, MemoryPreviewCache, OpenGraphPreviewer, ReferenceService,
    TmdbReferenceProvider,
};
use crate::search::CatalogSearch;
use crate::settings::{MemorySettings, SettingsStore};
use crate::urls::{PublicUrls, UrlBuilder};

/// Shared application context.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub settings: Arc<dyn SettingsStore>,
    pub urls: Arc<dyn UrlBuilder>,
    /// TMDB client; also backs the image proxy.
    pub tmdb: Arc<TmdbClient>,
    pub cache: Arc<MemoryPreviewCache>,
    pub references: Arc<ReferenceService>,
    pub search: Arc<CatalogSearch>,
}

impl AppContext {
    /// Build the context with the OpenGraph link previewer as fallback.
    ///
    /// Settings writes are persisted to `config_path` when one is given.
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let previewer = OpenGraphPreviewer::new(Duration::from_secs(config.tmdb.timeout_secs))?;
        Self::with_previewer(config, config_path, Arc::new(previewer))
    }

    /// Build the context with a custom fallback previewer.
    pub fn with_previewer(
        config: Config,
        config_path: Option<PathBuf>,
        previewer: Arc<dyn LinkPreviewer>,
    ) -> Result<Self> {
        let settings: Arc<dyn SettingsStore> =
            Arc::new(MemorySettings::from_config(&config, config_path));
        let urls: Arc<dyn UrlBuilder> = Arc::new(PublicUrls::new(&config.server.public_url)?);
        let tmdb = Arc::new(TmdbClient::new(&config.tmdb, settings.clone())?);
        let cache = Arc::new(MemoryPreviewCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        ));

        let provider = Arc::new(TmdbReferenceProvider::new(
            settings.clone(),
            tmdb.clone(),
            urls.clone(),
            previewer,
            cache.clone(),
        ));
        let references = Arc::new(ReferenceService::new(
            provider,
            cache.clone(),
            settings.clone(),
        ));
        let search = Arc::new(CatalogSearch::new(
            settings.clone(),
            tmdb.clone(),
            urls.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            settings,
            urls,
            tmdb,
            cache,
            references,
            search,
        })
    }

    /// Whether `user` may change deployment settings.
    pub fn is_admin(&self, user: &str) -> bool {
        self.config.server.admin_users.iter().any(|u| u == user)
    }
}
