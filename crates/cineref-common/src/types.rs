//! Core domain enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of catalog entity a reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// A feature film.
    Movie,
    /// A cast or crew member.
    Person,
    /// A TV series.
    Series,
}

impl ReferenceKind {
    /// Every kind, in matching order.
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Movie,
        ReferenceKind::Person,
        ReferenceKind::Series,
    ];

    /// The literal URL path segment the catalog uses for this kind.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReferenceKind::Movie => "movie",
            ReferenceKind::Person => "person",
            ReferenceKind::Series => "tv",
        }
    }

    /// Lowercase name used in tags and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Movie => "movie",
            ReferenceKind::Person => "person",
            ReferenceKind::Series => "series",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_uses_tv_segment() {
        assert_eq!(ReferenceKind::Series.path_segment(), "tv");
        assert_eq!(ReferenceKind::Series.as_str(), "series");
    }

    #[test]
    fn path_segments_are_distinct() {
        let segments: std::collections::HashSet<_> =
            ReferenceKind::ALL.iter().map(|k| k.path_segment()).collect();
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&ReferenceKind::Person).unwrap();
        assert_eq!(json, "\"person\"");
    }
}
