//! Image proxy route.
//!
//! Previews and search thumbnails only reference images through this route,
//! so clients never contact the TMDB image CDN directly.

use std::sync::LazyLock;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use cineref_common::Error;
use regex::Regex;
use serde::Deserialize;

use super::error::AppError;
use crate::context::AppContext;

/// Size tokens TMDB serves for posters and profiles.
const ALLOWED_SIZES: [&str; 8] = ["w45", "w92", "w154", "w185", "w342", "w500", "w780", "original"];

static IMAGE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/[a-z0-9_-]+\.(?:jpe?g|png|webp|svg)$").expect("valid regex")
});

pub fn image_routes() -> Router<AppContext> {
    Router::new().route("/images", get(proxy_image))
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    size: String,
    path: String,
}

async fn proxy_image(
    State(ctx): State<AppContext>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    if !ALLOWED_SIZES.contains(&query.size.as_str()) {
        return Err(Error::Validation(format!("unsupported image size: {}", query.size)).into());
    }
    if !IMAGE_PATH.is_match(&query.path) {
        return Err(Error::Validation(format!("invalid image path: {}", query.path)).into());
    }

    let image = ctx.tmdb.download_image(&query.size, &query.path).await?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        image.bytes,
    )
        .into_response())
}
