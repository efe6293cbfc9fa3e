//! Feature flag evaluation.
//!
//! Flags are stored as strings; only `"1"` enables. An unset flag reads as
//! `"1"` at every scope.

use cineref_common::UserId;

use crate::settings::{SettingsStore, LINK_PREVIEW_ENABLED, SEARCH_ENABLED};
use crate::APP_ID;

const ENABLED: &str = "1";

/// Link previews require both the deployment and the user flag.
pub fn link_preview_enabled(settings: &dyn SettingsStore, user: Option<&UserId>) -> bool {
    let deployment = settings.app_value(APP_ID, LINK_PREVIEW_ENABLED, ENABLED) == ENABLED;
    let personal = settings.user_value(user, APP_ID, LINK_PREVIEW_ENABLED, ENABLED) == ENABLED;
    deployment && personal
}

/// Search is a per-user opt-out; unauthenticated callers always have it.
pub fn search_enabled(settings: &dyn SettingsStore, user: Option<&UserId>) -> bool {
    match user {
        None => true,
        Some(user) => {
            settings.user_value(Some(user), APP_ID, SEARCH_ENABLED, ENABLED) == ENABLED
        }
    }
}
