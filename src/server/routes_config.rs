//! Settings-write relay routes.
//!
//! `PUT /api/config` writes the acting user's settings; `PUT /api/config/admin`
//! writes deployment settings and is limited to `server.admin_users`. Both
//! take a flat JSON object of string values and invalidate the affected
//! preview cache partitions before responding.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, routing::put, Json, Router};
use cineref_common::Error;

use super::error::AppError;
use super::user::ActingUser;
use crate::context::AppContext;

pub fn config_routes() -> Router<AppContext> {
    Router::new()
        .route("/config", put(update_user_config))
        .route("/config/admin", put(update_admin_config))
}

async fn update_user_config(
    State(ctx): State<AppContext>,
    user: ActingUser,
    Json(values): Json<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    let Some(user) = user.0 else {
        return Err(Error::Forbidden("user settings require an acting user".into()).into());
    };
    ctx.references.update_user_settings(&user, &values)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_admin_config(
    State(ctx): State<AppContext>,
    user: ActingUser,
    Json(values): Json<HashMap<String, String>>,
) -> Result<StatusCode, AppError> {
    let is_admin = user.user().is_some_and(|u| ctx.is_admin(u.as_str()));
    if !is_admin {
        return Err(Error::Forbidden("deployment settings are admin only".into()).into());
    }
    ctx.references.update_app_settings(&values)?;
    Ok(StatusCode::NO_CONTENT)
}
