//! URL building helpers.
//!
//! Preview images are always routed through this service's image proxy so
//! clients only ever load same-origin media; [`UrlBuilder`] is the seam the
//! resolver and search use for that.

use cineref_common::{Error, ReferenceKind, Result};
use reqwest::Url;

/// Public catalog site, used for canonical entity URLs.
pub const CATALOG_SITE: &str = "https://www.themoviedb.org";

/// Route of the image proxy, relative to the public base URL.
pub const IMAGE_PROXY_ROUTE: &str = "api/images";

/// Pure URL formatting capability.
pub trait UrlBuilder: Send + Sync {
    /// URL of the image proxy for a TMDB image `path` at `size` (e.g. `w500`).
    fn image_url(&self, size: &str, path: &str) -> String;

    /// Absolute URL of a path on this service.
    fn absolute_url(&self, path: &str) -> String;
}

/// [`UrlBuilder`] rooted at the configured `server.public_url`.
#[derive(Debug, Clone)]
pub struct PublicUrls {
    base: Url,
}

impl PublicUrls {
    pub fn new(public_url: &str) -> Result<Self> {
        let mut base = Url::parse(public_url)
            .map_err(|e| Error::config(format!("invalid public_url {public_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "public_url must be absolute: {public_url}"
            )));
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    fn join(&self, path: &str) -> Url {
        self.base
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base.clone())
    }
}

impl UrlBuilder for PublicUrls {
    fn image_url(&self, size: &str, path: &str) -> String {
        let mut url = self.join(IMAGE_PROXY_ROUTE);
        url.query_pairs_mut()
            .append_pair("size", size)
            .append_pair("path", path);
        url.to_string()
    }

    fn absolute_url(&self, path: &str) -> String {
        self.join(path).to_string()
    }
}

/// Canonical catalog URL for an entity, recognizable by the reference matcher.
pub fn catalog_url(kind: ReferenceKind, id: u64) -> String {
    format!("{CATALOG_SITE}/{}/{id}", kind.path_segment())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_routes_through_proxy() {
        let urls = PublicUrls::new("https://cloud.example.com").unwrap();
        assert_eq!(
            urls.image_url("w500", "/abc123.jpg"),
            "https://cloud.example.com/api/images?size=w500&path=%2Fabc123.jpg"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let urls = PublicUrls::new("https://cloud.example.com/apps/cineref").unwrap();
        assert_eq!(
            urls.absolute_url("/static/tmdb.svg"),
            "https://cloud.example.com/apps/cineref/static/tmdb.svg"
        );
        assert!(urls
            .image_url("w92", "/p.jpg")
            .starts_with("https://cloud.example.com/apps/cineref/api/images?"));
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(PublicUrls::new("mailto:someone@example.com").is_err());
        assert!(PublicUrls::new("not a url").is_err());
    }

    #[test]
    fn catalog_urls_use_path_segments() {
        assert_eq!(
            catalog_url(ReferenceKind::Movie, 293),
            "https://www.themoviedb.org/movie/293"
        );
        assert_eq!(
            catalog_url(ReferenceKind::Series, 1399),
            "https://www.themoviedb.org/tv/1399"
        );
    }
}
