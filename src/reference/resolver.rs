//! Catalog-specific resolution of a matched reference.

use std::sync::Arc;

use cineref_common::{ReferenceKind, Result, UserId};
use tracing::{debug, warn};

use super::matcher::MatchedReference;
use super::preview::{compose_title, ResolvedPreview, RichObject};
use crate::metadata::{Lookup, MetadataSource, MovieRecord};
use crate::urls::UrlBuilder;

/// Image size requested for preview posters.
pub const POSTER_SIZE: &str = "w500";

/// Turns a [`MatchedReference`] into a preview using the metadata source.
///
/// `Ok(None)` means "no confident result, fall back"; it covers upstream
/// error markers and kinds without a resolver. `Err` is reserved for a
/// failing metadata capability.
pub struct MetadataResolver {
    source: Arc<dyn MetadataSource>,
    urls: Arc<dyn UrlBuilder>,
}

impl MetadataResolver {
    pub fn new(source: Arc<dyn MetadataSource>, urls: Arc<dyn UrlBuilder>) -> Self {
        Self { source, urls }
    }

    pub async fn resolve(
        &self,
        user: Option<&UserId>,
        reference: &MatchedReference,
    ) -> Result<Option<ResolvedPreview>> {
        match reference.kind {
            ReferenceKind::Movie => self.resolve_movie(user, reference).await,
            ReferenceKind::Person | ReferenceKind::Series => {
                debug!(kind = %reference.kind, "No resolver for reference kind");
                Ok(None)
            }
        }
    }

    async fn resolve_movie(
        &self,
        user: Option<&UserId>,
        reference: &MatchedReference,
    ) -> Result<Option<ResolvedPreview>> {
        let record = match self
            .source
            .movie_info(user, &reference.identifier)
            .await?
        {
            Lookup::Found(record) => record,
            Lookup::Error(message) => {
                warn!(
                    source = self.source.name(),
                    id = %reference.identifier,
                    error = %message,
                    "Movie lookup failed, falling back"
                );
                return Ok(None);
            }
        };

        Ok(Some(self.movie_preview(reference, record)))
    }

    fn movie_preview(&self, reference: &MatchedReference, record: MovieRecord) -> ResolvedPreview {
        let image_url = record
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.urls.image_url(POSTER_SIZE, p))
            .unwrap_or_default();

        let rich_object = serde_json::to_value(&record)
            .ok()
            .map(|data| RichObject::new(ReferenceKind::Movie, data));

        ResolvedPreview {
            source_text: reference.raw_text.clone(),
            title: compose_title(record.title.as_deref(), record.original_title.as_deref()),
            description: record.overview.unwrap_or_default(),
            image_url,
            catalog_url: reference.raw_text.clone(),
            rich_object,
        }
    }
}
