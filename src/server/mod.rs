//! HTTP host for the reference provider.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::context::AppContext;

pub mod error;
pub mod routes_config;
pub mod routes_images;
pub mod routes_reference;
pub mod user;

const PROVIDER_ICON: &str = include_str!("../../static/tmdb.svg");

/// How often expired preview cache entries are swept.
const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static(user::USER_HEADER)]);

    let static_dir = ctx.config.server.static_dir.clone();

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/static/tmdb.svg", get(provider_icon))
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Extra static files are served from the root, after every API route.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            app = app.fallback_service(ServeDir::new(&dir));
        }
    }

    app
}

fn api_routes() -> Router<AppContext> {
    routes_reference::reference_routes()
        .merge(routes_images::image_routes())
        .merge(routes_config::config_routes())
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn provider_icon() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], PROVIDER_ICON)
}

/// Start the HTTP server and run until a shutdown signal arrives.
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port)
        .parse()
        .context("Invalid server address")?;

    start_cache_cleanup(ctx.clone());
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn start_cache_cleanup(ctx: AppContext) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            ctx.cache.cleanup_expired();
            tracing::trace!(
                partitions = ctx.cache.partition_count(),
                "Preview cache sweep finished"
            );
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
