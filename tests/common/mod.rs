//! Shared test harness for integration tests.
//!
//! [`TestHarness`] points a full [`AppContext`] at a `wiremock` TMDB stand-in
//! and can start the Axum router on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cineref::config::Config;
use cineref::context::AppContext;
use cineref::reference::{LinkPreviewer, ResolvedPreview};
use cineref::server::create_router;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fallback previewer answering every request with a fixed title.
#[derive(Default)]
pub struct CountingPreviewer {
    pub calls: AtomicUsize,
}

impl CountingPreviewer {
    pub const TITLE: &'static str = "Generic preview";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkPreviewer for CountingPreviewer {
    async fn preview(&self, text: &str) -> cineref_common::Result<Option<ResolvedPreview>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(ResolvedPreview {
            source_text: text.to_string(),
            title: Self::TITLE.to_string(),
            description: String::new(),
            image_url: String::new(),
            catalog_url: text.to_string(),
            rich_object: None,
        }))
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub tmdb: MockServer,
    pub previewer: Arc<CountingPreviewer>,
}

impl TestHarness {
    /// Harness with a deployment API key and default settings.
    pub async fn new() -> Self {
        Self::with_config_toml("[settings]\napi_key = \"test-key\"\n").await
    }

    /// Harness from a TOML config; TMDB URLs are redirected to the mock.
    pub async fn with_config_toml(toml_str: &str) -> Self {
        Self::build(toml_str, None).await
    }

    /// Harness persisting settings writes to `config_path`.
    pub async fn with_config_file(toml_str: &str, config_path: PathBuf) -> Self {
        Self::build(toml_str, Some(config_path)).await
    }

    async fn build(toml_str: &str, config_path: Option<PathBuf>) -> Self {
        let tmdb = MockServer::start().await;
        let mut config: Config = toml::from_str(toml_str).expect("valid test config");
        config.tmdb.api_base_url = tmdb.uri();
        config.tmdb.image_base_url = format!("{}/t/p", tmdb.uri());
        config.server.public_url = "http://cineref.test".to_string();

        let previewer = Arc::new(CountingPreviewer::default());
        let ctx = AppContext::with_previewer(config, config_path, previewer.clone())
            .expect("failed to build context");

        Self {
            ctx,
            tmdb,
            previewer,
        }
    }

    /// Start the router on a random port.
    pub async fn serve(&self) -> SocketAddr {
        let app = create_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    /// Serve a movie detail record, expecting exactly `times` requests.
    pub async fn mount_movie(&self, id: u64, body: serde_json::Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/movie/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.tmdb)
            .await;
    }
}
