//! Reference resolution and cache-key engine.
//!
//! Text flows through [`matcher`] (is it a catalog URL?), [`resolver`]
//! (fetch and shape the record), and [`fallback`] (generic preview when the
//! catalog has nothing). [`provider`] packages that pipeline behind the
//! [`ReferenceProvider`] contract and [`service`] adds caching with
//! per-user invalidation.

pub mod cache;
pub mod fallback;
pub mod flags;
pub mod matcher;
pub mod preview;
pub mod provider;
pub mod resolver;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheScope, MemoryPreviewCache, PreviewCache};
pub use fallback::{FallbackResolver, LinkPreviewer, NoPreview, OpenGraphPreviewer};
pub use matcher::{extract_identity, recognize, MatchedReference};
pub use preview::{ResolvedPreview, RichObject};
pub use provider::{ReferenceProvider, TmdbReferenceProvider, PROVIDER_ID};
pub use resolver::MetadataResolver;
pub use service::ReferenceService;
