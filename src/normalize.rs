// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! String normalization for titles and artist names.

use crate::category::{ReleaseCategory, ReleaseSource};
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// Matches "featuring" credits in the middle of a string.
static FEAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:feat\.?|ft\.|featuring)\s+").expect("valid featuring regex")
});

/// Matches "featuring" credits at the start of a parenthesized group.
static FEAT_PAREN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*(?:feat\.?|ft\.|featuring)\s+").expect("valid featuring regex")
});

/// Matches disc designations like `(Disc 1)` or `CD2`.
static DISC_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s?[\[{(]?\b(?:disc|disk|cd)\s?\d{1,2}\b[\]})]?").expect("valid disc regex")
});

/// Matches "versus" in all its spellings.
static VERSUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+vs\.?(?:\s+|$)").expect("valid versus regex")
});

/// Matches a trailing edition designation, e.g. `(Deluxe Edition)`.
static EDITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[({\[][\w\- ]+[)}\]]$").expect("valid edition regex"));

/// Matches a category or source stub, either in brackets or as the last word.
static STUB_RE: LazyLock<Regex> = LazyLock::new(|| {
    let tokens = stub_tokens()
        .into_iter()
        .map(regex::escape)
        .join("|");
    Regex::new(&format!(
        r"(?i)(?:\s*\((?P<round>{tokens})\)|\s*\[(?P<square>{tokens})\]|\s*\{{(?P<curly>{tokens})\}}|\s+(?P<word>{tokens})$)"
    ))
    .expect("valid stub regex")
});

/// Category and source names that must not be part of a release title.
fn stub_tokens() -> Vec<&'static str> {
    ReleaseCategory::ALL
        .into_iter()
        .filter(|category| *category != ReleaseCategory::Album)
        .map(ReleaseCategory::as_str)
        .chain(ReleaseSource::ALL.into_iter().map(ReleaseSource::as_str))
        .collect()
}

/// Collapse runs of whitespace into a single space and trim.
fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().join(" ")
}

/// Normalize a music-related string: canonical `feat.` spelling, no disc designations and no
/// superfluous whitespace.
#[must_use]
pub fn normalize_str(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let value = FEAT_RE.replace_all(value, " feat. ");
    let value = FEAT_PAREN_RE.replace_all(&value, "(feat. ");
    let value = DISC_TOKEN_RE.replace_all(&value, "");
    collapse_whitespace(&value)
}

/// Canonicalize all spellings of "versus" to ` vs. `.
fn normalize_versus(value: &str) -> String {
    VERSUS_RE.replace_all(value, " vs. ").into_owned()
}

/// Normalize a track title (slash spacing, `vs.` and `feat.` spelling).
#[must_use]
pub fn normalize_track_title(value: &str) -> String {
    let value = collapse_whitespace(&value.replace('/', " / "));
    normalize_str(&normalize_versus(&value))
}

/// Normalize an artist name (`vs.` and `feat.` spelling).
#[must_use]
pub fn normalize_artist_name(value: &str) -> String {
    normalize_str(&normalize_versus(value))
}

/// Returns `true` if both strings only differ in case, whitespace or periods.
#[must_use]
pub fn differs_only_cosmetically(lhs: &str, rhs: &str) -> bool {
    let significant = |value: &str| {
        value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    significant(lhs) == significant(rhs)
}

/// Join artist names as `A`, `A & B` or `A, B & C`.
#[must_use]
pub fn flatten_artists<S: AsRef<str>>(artists: &[S]) -> String {
    match artists {
        [] => String::new(),
        [artist] => artist.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} & {}",
            init.iter().map(|artist| artist.as_ref()).join(", "),
            last.as_ref()
        ),
    }
}

/// Split a trailing edition designation from a release title.
///
/// Returns the title without the edition and the edition (or an empty string).
#[must_use]
pub fn split_release_title(title: &str) -> (String, String) {
    match EDITION_RE.find(title) {
        Some(edition) if edition.start() > 0 => (
            title[..edition.start()].trim().to_string(),
            edition.as_str().to_string(),
        ),
        _ => (title.to_string(), String::new()),
    }
}

/// A category or source designation found in a release title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStub {
    /// A release category, e.g. ` EP` or `(Single)`.
    Category(ReleaseCategory),
    /// A release source, e.g. `[WEB]`.
    Source(ReleaseSource),
}

impl ReleaseStub {
    /// Parse a stub token.
    fn from_token(token: &str) -> Option<Self> {
        token
            .parse::<ReleaseCategory>()
            .map(Self::Category)
            .or_else(|_| token.parse::<ReleaseSource>().map(Self::Source))
            .ok()
    }
}

/// Find the first category or source stub in a release title.
#[must_use]
pub fn find_release_stub(title: &str) -> Option<(ReleaseStub, String)> {
    STUB_RE.captures(title).and_then(|captures| {
        ["round", "square", "curly", "word"]
            .into_iter()
            .find_map(|name| captures.name(name))
            .and_then(|token| {
                ReleaseStub::from_token(token.as_str())
                    .map(|stub| (stub, captures[0].trim().to_string()))
            })
    })
}

/// Remove all category and source stubs from a release title.
///
/// Returns the cleaned title and the stubs that were removed.
#[must_use]
pub fn strip_release_stubs(title: &str) -> (String, Vec<ReleaseStub>) {
    let mut title = title.trim().to_string();
    let mut stubs = vec![];
    while let Some((stub, _)) = find_release_stub(&title) {
        let stripped = STUB_RE.replacen(&title, 1, "").trim().to_string();
        if stripped.is_empty() || stripped == title {
            break;
        }
        stubs.push(stub);
        title = stripped;
    }
    (title, stubs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_str() {
        assert_eq!(normalize_str("Artist 1 Feat. Artist 2"), "Artist 1 feat. Artist 2");
        assert_eq!(normalize_str("Artist 1 ft. Artist 2"), "Artist 1 feat. Artist 2");
        assert_eq!(normalize_str("Song (Featuring Someone)"), "Song (feat. Someone)");
        assert_eq!(normalize_str("Greatest Hits (Disc 2)"), "Greatest Hits");
        assert_eq!(normalize_str("Greatest Hits CD1"), "Greatest Hits");
        assert_eq!(normalize_str("  Mezzanine "), "Mezzanine");
        assert_eq!(normalize_str("Features"), "Features");
        assert_eq!(normalize_str(""), "");
    }

    #[test]
    fn test_normalize_track_title() {
        assert_eq!(normalize_track_title("A/B"), "A / B");
        assert_eq!(normalize_track_title("Artist VS Artist"), "Artist vs. Artist");
        assert_eq!(normalize_track_title("Artist vs. Artist"), "Artist vs. Artist");
        assert_eq!(normalize_track_title("Angel"), "Angel");
        assert_eq!(normalize_track_title("Versus"), "Versus");
    }

    #[test]
    fn test_normalize_artist_name() {
        assert_eq!(normalize_artist_name("Armin Vs Tiesto"), "Armin vs. Tiesto");
        assert_eq!(normalize_artist_name("A Featuring B"), "A feat. B");
    }

    #[test]
    fn test_differs_only_cosmetically() {
        assert!(differs_only_cosmetically("A VS B", "A vs. B"));
        assert!(differs_only_cosmetically("A/B", "A / B"));
        assert!(!differs_only_cosmetically("Angel", "Angle"));
    }

    #[test]
    fn test_flatten_artists() {
        assert_eq!(flatten_artists::<&str>(&[]), "");
        assert_eq!(flatten_artists(&["A"]), "A");
        assert_eq!(flatten_artists(&["A", "B"]), "A & B");
        assert_eq!(flatten_artists(&["A", "B", "C"]), "A, B & C");
    }

    #[test]
    fn test_split_release_title() {
        assert_eq!(
            split_release_title("Mezzanine (Deluxe Edition)"),
            ("Mezzanine".to_string(), "(Deluxe Edition)".to_string())
        );
        assert_eq!(
            split_release_title("Mezzanine"),
            ("Mezzanine".to_string(), String::new())
        );
        assert_eq!(
            split_release_title("(Exchange)"),
            ("(Exchange)".to_string(), String::new())
        );
    }

    #[test]
    fn test_find_release_stub() {
        assert_eq!(
            find_release_stub("Teardrop EP"),
            Some((ReleaseStub::Category(ReleaseCategory::Ep), "EP".to_string()))
        );
        assert_eq!(
            find_release_stub("Teardrop [WEB] (Remastered)"),
            Some((ReleaseStub::Source(ReleaseSource::Web), "[WEB]".to_string()))
        );
        assert_eq!(
            find_release_stub("Live {Concert Recording}"),
            Some((
                ReleaseStub::Category(ReleaseCategory::ConcertRecording),
                "{Concert Recording}".to_string()
            ))
        );
        assert_eq!(find_release_stub("The White Album"), None);
        assert_eq!(find_release_stub("Mezzanine"), None);
        assert_eq!(find_release_stub("Epic"), None);
    }

    #[test]
    fn test_strip_release_stubs() {
        assert_eq!(
            strip_release_stubs("Teardrop (Single) [WEB]"),
            (
                "Teardrop".to_string(),
                vec![
                    ReleaseStub::Category(ReleaseCategory::Single),
                    ReleaseStub::Source(ReleaseSource::Web)
                ]
            )
        );
        assert_eq!(
            strip_release_stubs("Mezzanine"),
            ("Mezzanine".to_string(), vec![])
        );
        // A title that consists of nothing but a stub is kept.
        assert_eq!(strip_release_stubs("Single"), ("Single".to_string(), vec![]));
    }
}
