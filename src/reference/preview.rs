//! The preview value handed back to callers.

use cineref_common::ReferenceKind;
use serde::{Deserialize, Serialize};

use crate::APP_ID;

/// Title used when the record carries neither a localised nor an original title.
pub const UNKNOWN_TITLE: &str = "???";

/// Structured summary shown in place of a raw reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPreview {
    /// The text that was resolved.
    pub source_text: String,
    pub title: String,
    pub description: String,
    /// Same-origin image URL, or empty when the entity has no image.
    pub image_url: String,
    /// URL the preview links to; for catalog hits this is the input verbatim.
    pub catalog_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_object: Option<RichObject>,
}

/// Kind-tagged full record attached to a catalog preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichObject {
    /// `<app-id>_<kind>`, e.g. `cineref_movie`.
    pub kind: String,
    pub data: serde_json::Value,
}

impl RichObject {
    pub fn new(kind: ReferenceKind, data: serde_json::Value) -> Self {
        Self {
            kind: rich_object_kind(kind),
            data,
        }
    }
}

/// Namespaced rich-object tag, so other integrations' `movie` objects never collide.
pub fn rich_object_kind(kind: ReferenceKind) -> String {
    format!("{APP_ID}_{}", kind.as_str())
}

/// `"<localised> (<original>)"` when both exist and differ, else whichever
/// exists, else [`UNKNOWN_TITLE`]. Blank titles count as missing; others are
/// compared and returned verbatim.
pub fn compose_title(localized: Option<&str>, original: Option<&str>) -> String {
    let localized = localized.filter(|t| !t.trim().is_empty());
    let original = original.filter(|t| !t.trim().is_empty());

    match (localized, original) {
        (Some(l), Some(o)) if l != o => format!("{l} ({o})"),
        (Some(title), _) | (None, Some(title)) => title.to_string(),
        (None, None) => UNKNOWN_TITLE.to_string(),
    }
}
