//! Reference provider and search API routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use super::user::ActingUser;
use crate::context::AppContext;
use crate::reference::ReferenceProvider;
use crate::search::SearchEntry;

pub fn reference_routes() -> Router<AppContext> {
    Router::new()
        .route("/reference/provider", get(provider_info))
        .route("/reference/match", get(match_reference))
        .route("/reference/resolve", get(resolve_reference))
        .route("/search/:provider_id", get(search))
}

// ============================================================================
// Provider
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub title: String,
    pub order: i32,
    pub icon_url: String,
    pub search_provider_ids: Vec<String>,
}

async fn provider_info(State(ctx): State<AppContext>, user: ActingUser) -> Json<ProviderInfo> {
    let provider = ctx.references.provider();
    Json(ProviderInfo {
        id: provider.id().to_string(),
        title: provider.title(),
        order: provider.order(),
        icon_url: provider.icon_url(),
        search_provider_ids: provider
            .supported_search_provider_ids(user.user())
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

// ============================================================================
// Match / resolve
// ============================================================================

#[derive(Debug, Deserialize)]
struct TextQuery {
    text: String,
    /// Opaque cache identity of the reference; defaults to the text.
    reference_id: Option<String>,
}

async fn match_reference(
    State(ctx): State<AppContext>,
    user: ActingUser,
    Query(query): Query<TextQuery>,
) -> Json<serde_json::Value> {
    let matches = ctx.references.provider().matches(user.user(), &query.text);
    Json(serde_json::json!({ "matches": matches }))
}

/// 200 with the preview, or 204 when there is none.
async fn resolve_reference(
    State(ctx): State<AppContext>,
    user: ActingUser,
    Query(query): Query<TextQuery>,
) -> Result<Response, AppError> {
    let reference_id = query.reference_id.as_deref().unwrap_or(&query.text);
    let preview = ctx
        .references
        .resolve_cached(user.user(), reference_id, &query.text)
        .await?;

    Ok(match preview {
        Some(preview) => Json(preview).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchQuery {
    term: String,
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

async fn search(
    State(ctx): State<AppContext>,
    user: ActingUser,
    Path(provider_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchEntry>>, AppError> {
    let entries = ctx
        .search
        .search(
            user.user(),
            &provider_id,
            &query.term,
            query.offset,
            query.limit,
        )
        .await?;
    Ok(Json(entries))
}
