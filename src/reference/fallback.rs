//! Generic (non-catalog) link previews.
//!
//! The fallback path for references the catalog resolver cannot handle.
//! [`OpenGraphPreviewer`] fetches the page and reads its OpenGraph tags,
//! falling back to `<title>` and `<meta name="description">`.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use cineref_common::{Error, Result};
use regex::Regex;
use reqwest::Url;
use tracing::{debug, warn};

use super::preview::ResolvedPreview;

/// Only the head of a page is inspected.
const MAX_HTML_BYTES: usize = 512 * 1024;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("valid regex"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});
static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

/// Capability producing a preview for arbitrary text, or nothing.
#[async_trait]
pub trait LinkPreviewer: Send + Sync {
    async fn preview(&self, text: &str) -> Result<Option<ResolvedPreview>>;
}

/// Previewer that never produces anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreview;

#[async_trait]
impl LinkPreviewer for NoPreview {
    async fn preview(&self, _text: &str) -> Result<Option<ResolvedPreview>> {
        Ok(None)
    }
}

/// Fetches `http(s)` pages and builds a preview from their metadata tags.
///
/// Transport and parse failures are "no preview", never errors.
pub struct OpenGraphPreviewer {
    http: reqwest::Client,
}

impl OpenGraphPreviewer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cineref/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    async fn fetch_html(&self, url: &Url) -> Option<String> {
        let mut resp = match self.http.get(url.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(%url, error = %e, "Link preview fetch failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            warn!(%url, status = %resp.status(), "Link preview fetch returned an error");
            return None;
        }

        let is_html = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("html"));
        if !is_html {
            debug!(%url, "Link target is not HTML");
            return None;
        }

        // Stop reading at the cap; the rest of the body is never downloaded.
        let expected = resp.content_length().unwrap_or(0) as usize;
        let mut head = Vec::with_capacity(expected.min(MAX_HTML_BYTES));
        while head.len() < MAX_HTML_BYTES {
            match resp.chunk().await {
                Ok(Some(chunk)) => {
                    let room = MAX_HTML_BYTES - head.len();
                    head.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(%url, error = %e, "Failed to read link preview body");
                    return None;
                }
            }
        }
        Some(String::from_utf8_lossy(&head).into_owned())
    }
}

#[async_trait]
impl LinkPreviewer for OpenGraphPreviewer {
    async fn preview(&self, text: &str) -> Result<Option<ResolvedPreview>> {
        let Ok(url) = Url::parse(text.trim()) else {
            return Ok(None);
        };
        if !matches!(url.scheme(), "http" | "https") {
            return Ok(None);
        }

        let Some(html) = self.fetch_html(&url).await else {
            return Ok(None);
        };
        Ok(parse_preview(text, &url, &html))
    }
}

/// Build a preview from an HTML document; `None` when it has no title.
pub fn parse_preview(text: &str, page_url: &Url, html: &str) -> Option<ResolvedPreview> {
    let meta = meta_properties(html);
    let get = |key: &str| meta.get(key).map(String::as_str).filter(|v| !v.is_empty());

    let title = get("og:title")
        .map(str::to_string)
        .or_else(|| {
            TITLE_TAG
                .captures(html)
                .and_then(|c| c.get(1))
                .map(|m| decode_entities(m.as_str().trim()))
        })
        .filter(|t| !t.is_empty())?;

    let description = get("og:description")
        .or_else(|| get("description"))
        .unwrap_or_default()
        .to_string();

    let image_url = get("og:image")
        .and_then(|src| page_url.join(src).ok())
        .map(String::from)
        .unwrap_or_default();

    Some(ResolvedPreview {
        source_text: text.to_string(),
        title,
        description,
        image_url,
        catalog_url: text.to_string(),
        rich_object: None,
    })
}

/// `property`/`name` -> `content` for every `<meta>` tag; first one wins.
fn meta_properties(html: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for tag in META_TAG.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for attr in ATTRIBUTE.captures_iter(tag.as_str()) {
            let value = attr.get(2).or_else(|| attr.get(3)).map(|m| m.as_str());
            match attr[1].to_ascii_lowercase().as_str() {
                "property" | "name" => key = value.map(str::to_ascii_lowercase),
                "content" => content = value.map(decode_entities),
                _ => {}
            }
        }
        if let (Some(key), Some(content)) = (key, content) {
            out.entry(key).or_insert(content);
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Delegates to the generic previewer when catalog resolution yields nothing.
#[derive(Clone)]
pub struct FallbackResolver {
    previewer: Arc<dyn LinkPreviewer>,
}

impl FallbackResolver {
    pub fn new(previewer: Arc<dyn LinkPreviewer>) -> Self {
        Self { previewer }
    }

    pub async fn resolve_fallback(&self, text: &str) -> Result<Option<ResolvedPreview>> {
        let preview = self.previewer.preview(text).await?;
        if preview.is_none() {
            debug!(text, "Fallback produced no preview");
        }
        Ok(preview)
    }
}
