//! Catalog URL recognition and identity extraction.
//!
//! One anchored, case-insensitive pattern per [`ReferenceKind`]: optional
//! `http`/`https` scheme, optional `www.`, the catalog host, the kind's path
//! segment, then a run of ASCII digits. Anything after the digits (slug,
//! query, fragment) is ignored.

use std::sync::LazyLock;

use cineref_common::ReferenceKind;
use regex::Regex;
use serde::Serialize;

fn catalog_pattern(segment: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)^(?:https?://)?(?:www\.)?themoviedb\.org/{segment}/([0-9]+)"
    ))
    .expect("catalog pattern is a valid regex")
}

static MOVIE_PATTERN: LazyLock<Regex> = LazyLock::new(|| catalog_pattern("movie"));
static PERSON_PATTERN: LazyLock<Regex> = LazyLock::new(|| catalog_pattern("person"));
static SERIES_PATTERN: LazyLock<Regex> = LazyLock::new(|| catalog_pattern("tv"));

/// A catalog reference pulled out of input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedReference {
    pub kind: ReferenceKind,
    /// The input text, verbatim.
    pub raw_text: String,
    /// Numeric catalog id, kept as text.
    pub identifier: String,
}

/// The pattern recognizing URLs of `kind`.
pub fn pattern(kind: ReferenceKind) -> &'static Regex {
    match kind {
        ReferenceKind::Movie => &*MOVIE_PATTERN,
        ReferenceKind::Person => &*PERSON_PATTERN,
        ReferenceKind::Series => &*SERIES_PATTERN,
    }
}

/// Classify `text` as a catalog URL. Ignores feature flags.
pub fn recognize(text: &str) -> Option<ReferenceKind> {
    ReferenceKind::ALL
        .into_iter()
        .find(|kind| pattern(*kind).is_match(text))
}

/// Extract the kind and numeric id from a recognized URL.
///
/// Only movie URLs carry an extractable identity; person and series URLs
/// yield `None` and are left to the generic previewer.
pub fn extract_identity(text: &str) -> Option<MatchedReference> {
    let captures = MOVIE_PATTERN.captures(text)?;
    let identifier = captures.get(1)?.as_str();

    Some(MatchedReference {
        kind: ReferenceKind::Movie,
        raw_text: text.to_string(),
        identifier: identifier.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_kind() {
        assert_eq!(
            recognize("https://www.themoviedb.org/movie/293-bla"),
            Some(ReferenceKind::Movie)
        );
        assert_eq!(
            recognize("https://themoviedb.org/person/42-bla"),
            Some(ReferenceKind::Person)
        );
        assert_eq!(
            recognize("http://www.themoviedb.org/tv/1399-game-of-thrones"),
            Some(ReferenceKind::Series)
        );
    }

    #[test]
    fn scheme_and_www_are_optional() {
        for text in [
            "themoviedb.org/movie/1",
            "www.themoviedb.org/movie/1",
            "http://themoviedb.org/movie/1",
            "https://www.themoviedb.org/movie/1",
        ] {
            assert_eq!(recognize(text), Some(ReferenceKind::Movie), "{text}");
        }
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(
            recognize("HTTPS://WWW.TheMovieDB.org/MOVIE/603"),
            Some(ReferenceKind::Movie)
        );
        assert_eq!(recognize("themoviedb.ORG/Tv/1"), Some(ReferenceKind::Series));
    }

    #[test]
    fn trailing_path_query_and_fragment_ignored() {
        assert_eq!(
            recognize("https://www.themoviedb.org/movie/603-the-matrix/cast?language=de#top"),
            Some(ReferenceKind::Movie)
        );
    }

    #[test]
    fn rejects_non_references() {
        for text in [
            "",
            "hello world",
            "https://www.themoviedb.org/",
            "https://www.themoviedb.org/movie/",
            "https://www.themoviedb.org/movie/abc",
            "https://www.themoviedb.org/collection/10",
            "https://www.themoviedb.org/tv-shows/1",
            "https://api.themoviedb.org/movie/1",
            "ftp://themoviedb.org/movie/1",
            "see https://www.themoviedb.org/movie/1",
            "https://www.imdb.com/title/tt0133093/",
            "https://themoviedb.org.evil.com/movie/1",
        ] {
            assert_eq!(recognize(text), None, "{text}");
        }
    }

    #[test]
    fn non_ascii_digits_are_not_identifiers() {
        assert_eq!(recognize("https://themoviedb.org/movie/١٢٣"), None);
    }

    #[test]
    fn extracts_movie_identity() {
        let reference = extract_identity("https://www.themoviedb.org/movie/293-bla").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Movie);
        assert_eq!(reference.identifier, "293");
        assert_eq!(reference.raw_text, "https://www.themoviedb.org/movie/293-bla");
    }

    #[test]
    fn preserves_identifier_text_beyond_u64() {
        let reference =
            extract_identity("themoviedb.org/movie/000123456789012345678901234567890").unwrap();
        assert_eq!(reference.identifier, "000123456789012345678901234567890");
    }

    #[test]
    fn person_and_series_have_no_identity() {
        assert!(extract_identity("https://themoviedb.org/person/42-bla").is_none());
        assert!(extract_identity("https://themoviedb.org/tv/1399").is_none());
        assert!(extract_identity("not a url").is_none());
    }
}
