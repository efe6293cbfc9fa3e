//! TMDB (The Movie Database) metadata client.
//!
//! Implements [`MetadataSource`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Per-user credentials: a user's v4 read access token (`token`) is sent as
//!   a bearer token, else the deployment v3 `api_key` goes in the query.
//! - Token-bucket rate limiting via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Every upstream failure (transport, status, decoding) becomes a
//!   [`Lookup::Error`] marker rather than an `Err`.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cineref_common::{Error, Result, UserId};
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TmdbConfig;
use crate::metadata::source::{
    Lookup, MetadataSource, MovieHit, MovieRecord, PersonHit, SeriesHit,
};
use crate::settings::{SettingsStore, API_KEY, LANGUAGE, TOKEN};
use crate::APP_ID;

const MAX_RETRIES: u32 = 3;
const MAX_RETRY_WAIT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchPage<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

enum Credential {
    ApiKey(String),
    Bearer(String),
}

/// Image bytes fetched for the image proxy.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// TMDB metadata client.
pub struct TmdbClient {
    http: reqwest::Client,
    settings: Arc<dyn SettingsStore>,
    api_base_url: String,
    image_base_url: String,
    default_language: String,
    limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbClient {
    /// Create a client reading credentials and language from `settings`.
    pub fn new(config: &TmdbConfig, settings: Arc<dyn SettingsStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        let per_second = NonZeroU32::new(config.requests_per_second)
            .ok_or_else(|| Error::config("tmdb.requests_per_second must be at least 1"))?;

        Ok(Self {
            http,
            settings,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            default_language: config.language.clone(),
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    fn credential(&self, user: Option<&UserId>) -> Option<Credential> {
        let token = self.settings.user_value(user, APP_ID, TOKEN, "");
        if !token.is_empty() {
            return Some(Credential::Bearer(token));
        }
        let api_key = self.settings.app_value(APP_ID, API_KEY, "");
        (!api_key.is_empty()).then_some(Credential::ApiKey(api_key))
    }

    fn language(&self, user: Option<&UserId>) -> String {
        self.settings
            .user_value(user, APP_ID, LANGUAGE, &self.default_language)
    }

    /// GET a JSON document with rate limiting and 429-retry logic.
    async fn get_json<T: DeserializeOwned>(
        &self,
        user: Option<&UserId>,
        path: &str,
        params: &[(&str, &str)],
    ) -> Lookup<T> {
        let Some(credential) = self.credential(user) else {
            debug!(path, "No TMDB credentials for request");
            return Lookup::Error("no TMDB credentials configured".into());
        };
        let language = self.language(user);
        let url = format!("{}{path}", self.api_base_url);

        let mut retries = 0u32;
        loop {
            self.limiter.until_ready().await;

            let request = self
                .http
                .get(&url)
                .query(&[("language", language.as_str())])
                .query(params);
            let request = match credential {
                Credential::ApiKey(ref key) => request.query(&[("api_key", key.as_str())]),
                Credential::Bearer(ref token) => request.bearer_auth(token),
            };

            debug!(url = %url, "TMDB request");
            let resp = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(path, error = %e, "TMDB request failed");
                    return Lookup::Error(format!("TMDB request failed: {e}"));
                }
            };

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1)
                    .min(MAX_RETRY_WAIT_SECS);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let status = resp.status();
            if !status.is_success() {
                let message = resp
                    .json::<TmdbErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.status_message)
                    .unwrap_or_else(|| format!("TMDB returned {status}"));
                warn!(%status, path, message = %message, "TMDB returned an error");
                return Lookup::Error(message);
            }

            return match resp.json::<T>().await {
                Ok(value) => Lookup::Found(value),
                Err(e) => {
                    warn!(path, error = %e, "Failed to parse TMDB response");
                    Lookup::Error(format!("failed to parse TMDB response: {e}"))
                }
            };
        }
    }

    async fn search<T: DeserializeOwned>(
        &self,
        user: Option<&UserId>,
        path: &str,
        query: &str,
        page: u32,
    ) -> Lookup<Vec<T>> {
        let page = page.max(1).to_string();
        self.get_json::<TmdbSearchPage<T>>(
            user,
            path,
            &[
                ("query", query),
                ("page", page.as_str()),
                ("include_adult", "false"),
            ],
        )
        .await
        .map(|page| page.results)
    }

    /// Download an image from the TMDB image CDN. `path` is e.g.
    /// `"/abc123.jpg"`, `size` is e.g. `"w500"` or `"original"`.
    pub async fn download_image(&self, size: &str, path: &str) -> Result<ProxiedImage> {
        self.limiter.until_ready().await;

        let url = format!("{}/{size}{path}", self.image_base_url);
        debug!(url = %url, "TMDB image download");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::upstream(self.name(), format!("image download failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::upstream(
                self.name(),
                format!("image {}: {url}", resp.status()),
            ));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::upstream(self.name(), format!("image read error: {e}")))?;

        Ok(ProxiedImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn movie_info(&self, user: Option<&UserId>, id: &str) -> Result<Lookup<MovieRecord>> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Lookup::Error(format!("invalid movie id: {id}")));
        }
        Ok(self.get_json(user, &format!("/movie/{id}"), &[]).await)
    }

    async fn search_movies(
        &self,
        user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<MovieHit>>> {
        Ok(self.search(user, "/search/movie", query, page).await)
    }

    async fn search_people(
        &self,
        user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<PersonHit>>> {
        Ok(self.search(user, "/search/person", query, page).await)
    }

    async fn search_series(
        &self,
        user: Option<&UserId>,
        query: &str,
        page: u32,
    ) -> Result<Lookup<Vec<SeriesHit>>> {
        Ok(self.search(user, "/search/tv", query, page).await)
    }
}
