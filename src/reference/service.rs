//! Cache orchestration and the settings-write relay.
//!
//! [`ReferenceService`] is what hosts call: it wraps a [`ReferenceProvider`]
//! with the shared [`PreviewCache`] and invalidates partitions when settings
//! that affect resolution change.

use std::collections::HashMap;
use std::sync::Arc;

use cineref_common::{Error, Result, UserId};
use tracing::{debug, info};

use super::cache::{CacheScope, PreviewCache};
use super::preview::ResolvedPreview;
use super::provider::ReferenceProvider;
use crate::settings::{SettingsStore, APP_KEYS, USER_KEYS};
use crate::APP_ID;

pub struct ReferenceService {
    provider: Arc<dyn ReferenceProvider>,
    cache: Arc<dyn PreviewCache>,
    settings: Arc<dyn SettingsStore>,
}

impl ReferenceService {
    /// `cache` must be the same cache the provider invalidates.
    pub fn new(
        provider: Arc<dyn ReferenceProvider>,
        cache: Arc<dyn PreviewCache>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            provider,
            cache,
            settings,
        }
    }

    pub fn provider(&self) -> &dyn ReferenceProvider {
        self.provider.as_ref()
    }

    /// Resolve `text` through the cache.
    ///
    /// Unmatched text is never cached. A resolution of "no preview" is cached
    /// like any other result; errors are not.
    pub async fn resolve_cached(
        &self,
        user: Option<&UserId>,
        reference_id: &str,
        text: &str,
    ) -> Result<Option<ResolvedPreview>> {
        if !self.provider.matches(user, text) {
            return Ok(None);
        }

        let scope = CacheScope::new(
            self.provider.cache_partition_key(user, reference_id),
            self.provider.cache_entry_key(reference_id),
        );
        if let Some(hit) = self.cache.get(&scope) {
            debug!(partition = %scope.partition, entry = %scope.entry, "Preview cache hit");
            return Ok(hit);
        }

        let generation = self.cache.generation(&scope.partition);
        let preview = self.provider.resolve(user, text).await?;
        self.cache.put(&scope, preview.clone(), generation);
        Ok(preview)
    }

    /// Write user settings, then drop the user's cached previews.
    ///
    /// Every accepted key affects either resolution or search exposure, so
    /// any non-empty write invalidates. Unknown keys reject the whole batch.
    /// A failed write still invalidates: earlier keys of the batch may have
    /// landed.
    pub fn update_user_settings(
        &self,
        user: &UserId,
        values: &HashMap<String, String>,
    ) -> Result<()> {
        validate_keys(values, &USER_KEYS)?;
        let written = values
            .iter()
            .try_for_each(|(key, value)| self.settings.set_user_value(user, APP_ID, key, value));

        if !values.is_empty() {
            info!(user = %user, keys = values.len(), ok = written.is_ok(), "User settings changed");
            self.provider.invalidate_partition(Some(user));
        }
        written
    }

    /// Write deployment settings, then drop every cached partition.
    pub fn update_app_settings(&self, values: &HashMap<String, String>) -> Result<()> {
        validate_keys(values, &APP_KEYS)?;
        let written = values
            .iter()
            .try_for_each(|(key, value)| self.settings.set_app_value(APP_ID, key, value));

        if !values.is_empty() {
            info!(keys = values.len(), ok = written.is_ok(), "Deployment settings changed");
            self.cache.invalidate_all();
        }
        written
    }
}

fn validate_keys(values: &HashMap<String, String>, allowed: &[&str]) -> Result<()> {
    let mut unknown: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|k| !allowed.contains(k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(Error::Validation(format!(
        "unknown setting(s): {}",
        unknown.join(", ")
    )))
}
