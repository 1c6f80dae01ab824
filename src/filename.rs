// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Information that can be derived from file and folder names, and the names files should have.

use crate::normalize::flatten_artists;
use crate::track::Track;
use regex::Regex;
use std::sync::LazyLock;

/// Earliest year that is accepted as a release year.
const MIN_RELEASE_YEAR: i32 = 1920;

/// Characters that are replaced with look-alikes in file and folder names.
#[cfg(not(target_os = "windows"))]
const PATH_CHAR_REPLACEMENTS: [(char, char); 2] = [(':', '：'), ('/', '／')];

/// Characters that are replaced with look-alikes in file and folder names.
#[cfg(target_os = "windows")]
const PATH_CHAR_REPLACEMENTS: [(char, char); 9] = [
    (':', '：'),
    ('/', '／'),
    ('\\', '＼'),
    ('*', '＊'),
    ('?', '？'),
    ('"', '＂'),
    ('<', '＜'),
    ('>', '＞'),
    ('|', '｜'),
];

/// Leading run of 2-4 digits (`[disc]track`).
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2,4})").expect("valid leading number regex"));

/// Standalone 1-2 digit token.
static STANDALONE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \-_](\d{1,2})[ \-_]").expect("valid standalone number regex"));

/// Four digits surrounded by separators.
static STANDALONE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[-_ ])(\d{4})(?:$|[-_ ])").expect("valid year regex"));

/// Four digits in brackets.
static BRACKETED_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[{](\d{4})[)\]}]").expect("valid year regex"));

/// Disc designation in a path, e.g. `CD2` or `Disc 1`.
static DISC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])(?:disc|disk|cd|part)\s*[-_]?\s*(\d{1,2})(?:\D|$)")
        .expect("valid disc regex")
});

/// Strips control characters and replaces characters that are forbidden in paths.
#[must_use]
pub fn escape_path_chars(data: &str) -> String {
    data.chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            PATH_CHAR_REPLACEMENTS
                .iter()
                .find_map(|&(from, to)| (from == c).then_some(to))
                .unwrap_or(c)
        })
        .collect::<String>()
}

/// The last component of a `/`-separated path.
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Extract track and disc number from a filename.
///
/// A leading run of 2-4 digits is split into the track number (last two digits) and disc number
/// (the remaining digits, if any). Otherwise, a single standalone 1-2 digit number is used as the
/// track number.
#[must_use]
pub fn extract_track_disc(filename: &str) -> (Option<u32>, Option<u32>) {
    let mut track = None;
    let mut disc = None;

    if let Some(digits) = LEADING_NUMBER_RE.find(filename).map(|m| m.as_str()) {
        let (disc_digits, track_digits) = digits.split_at(digits.len() - 2);
        track = track_digits.parse::<u32>().ok().filter(|&n| n > 0);
        disc = disc_digits.parse::<u32>().ok().filter(|&n| n > 0);
    }

    if track.is_none() {
        let mut numbers = STANDALONE_NUMBER_RE.captures_iter(filename);
        if let (Some(captures), None) = (numbers.next(), numbers.next()) {
            track = captures[1].parse::<u32>().ok().filter(|&n| n > 0);
        }
    }

    (track, disc)
}

/// Returns the only match of `re` if it is a plausible release year.
fn single_year(re: &Regex, folder_name: &str, current_year: i32) -> Option<i32> {
    let mut years = re
        .captures_iter(folder_name)
        .filter_map(|captures| captures[1].parse::<i32>().ok());
    match (years.next(), years.next()) {
        (Some(year), None) if (MIN_RELEASE_YEAR..=current_year).contains(&year) => Some(year),
        _ => None,
    }
}

/// Extract the release year from a folder name.
///
/// The year must either be a standalone token (e.g. `Artist - 1998 - Title`) or be enclosed in
/// brackets (e.g. `Title (1998)`), and it must be the only such number in the name.
#[must_use]
pub fn extract_release_year(folder_name: &str, current_year: i32) -> Option<i32> {
    single_year(&STANDALONE_YEAR_RE, folder_name, current_year)
        .or_else(|| single_year(&BRACKETED_YEAR_RE, folder_name, current_year))
}

/// Extract a disc number from a path, e.g. `Album/CD2/01 - Title.mp3`.
#[must_use]
pub fn extract_disc_number(path: &str) -> Option<u32> {
    DISC_RE
        .captures(path)
        .and_then(|captures| captures[1].parse::<u32>().ok())
        .filter(|&disc| disc > 0)
}

/// Derives the name a file should have from its tags.
pub trait TrackNaming {
    /// The expected filename for the given track, or `None` if it can't be derived.
    fn expected_filename(&self, track: &Track, is_va: bool) -> Option<String>;
}

/// Names files like `01 - Title.mp3` (or `101 - Artist - Title.mp3` for multi-disc compilations).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTrackNaming;

impl TrackNaming for DefaultTrackNaming {
    fn expected_filename(&self, track: &Track, is_va: bool) -> Option<String> {
        let track_number = track.track_number?;
        let title = track.trimmed_track_title().filter(|title| !title.is_empty())?;

        let disc_prefix = match track.total_discs {
            Some(total_discs) if total_discs > 1 => track.disc_number_or_default().to_string(),
            _ => String::new(),
        };
        let artist_part = if is_va {
            let artists = track.trimmed_artists();
            if artists.is_empty() {
                return None;
            }
            format!("{} - ", flatten_artists(&artists))
        } else {
            String::new()
        };

        Some(escape_path_chars(&format!(
            "{disc_prefix}{track_number:02} - {artist_part}{title}.{}",
            track.stream_info.tag_type.file_extension()
        )))
    }
}
