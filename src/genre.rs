// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Cleanup of user-submitted genre tags.

use crate::oracle::GenreTag;
use itertools::Itertools;

/// Tags longer than this are never genres.
const MAX_TAG_LENGTH: usize = 100;

/// Tags that describe the listener rather than the music.
const BLACKLIST: [&str; 73] = [
    "seen live",
    "favourites",
    "all",
    "awesome",
    "love",
    "spotify",
    "favorite",
    "favourite",
    "fun",
    "check out",
    "sexy",
    "amazing",
    "genius",
    "dj",
    "want to see live",
    "shit",
    "officially shit",
    "lesser known yet streamable artists",
    "<3",
    "crap",
    "bands i've seen live",
    "seen in concert",
    "listen",
    "good music",
    "saw live",
    "local",
    "fuck off",
    "hipster garbage",
    "mp3",
    "masterpiece",
    "laptop",
    "wishlist",
    "cds i own",
    "beautiful",
    "epic",
    "classic",
    "records i own",
    "playlist",
    "cd",
    "cool",
    "great",
    "good",
    "own",
    "emusic",
    "i own this cd",
    "own it",
    "love at first listen",
    "underrated",
    "fucking awesome",
    "in my collection",
    "check",
    "my private work station",
    "top cd",
    "fav",
    "love it",
    "happy",
    "owned",
    "mandatory",
    "the best",
    "streamable",
    "collected",
    "reviewed in the guardian",
    "to check out",
    "overrated",
    "to buy",
    "i own",
    "1",
    "favs",
    "essential",
    "5",
    "music",
    "my music",
    "music to download",
];

/// Tags containing one of these are dropped.
const EXCLUDED_SUBSTRINGS: [&str; 10] = [
    "artist", "bpm", "best of", "album", "favorite", "favourite", "vinyl", "seen ", "albun", "need",
];

/// Alternative spellings and the canonical tag they map to.
const SYNONYMS: [(&str, &str); 22] = [
    ("crossover", "fusion"),
    ("drum 'n bass", "drum and bass"),
    ("drum 'n' bass", "drum and bass"),
    ("drum & bass", "drum and bass"),
    ("drum n bass", "drum and bass"),
    ("drum n' bass", "drum and bass"),
    ("drum'n bass", "drum and bass"),
    ("drum'n'bass", "drum and bass"),
    ("drum&bass", "drum and bass"),
    ("drumandbass", "drum and bass"),
    ("drumm and bass", "drum and bass"),
    ("drumm n bass", "drum and bass"),
    ("drumn and bass", "drum and bass"),
    ("drumnbass", "drum and bass"),
    ("drums and base", "drum and bass"),
    ("drums and bass", "drum and bass"),
    ("dnb", "drum and bass"),
    ("d&b", "drum and bass"),
    ("hip-hop", "hip hop"),
    ("hiphop", "hip hop"),
    ("triphop", "trip-hop"),
    ("trip hop", "trip-hop"),
];

/// Words that stay lowercase unless they start the tag.
const LOWERCASE_WORDS: [&str; 16] = [
    "a", "an", "the", "and", "but", "or", "for", "nor", "in", "to", "at", "on", "by", "from",
    "yet", "so",
];

/// Tags that are written in capital letters.
const UPPERCASE_TAGS: [&str; 2] = ["av", "uk"];

/// Uppercase the first character and lowercase the rest.
fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Capitalize every word of a tag except for a few stop words.
#[must_use]
pub fn capitalize_tag(tag: &str) -> String {
    tag.split(' ')
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && LOWERCASE_WORDS.contains(&word) {
                word.to_string()
            } else {
                capitalize_word(word)
            }
        })
        .join(" ")
}

/// Clean up a single tag.
///
/// Returns `None` if the tag is not a genre, e.g. because it is blacklisted or it mentions the
/// release itself (`ignore` usually holds the artist names and the release title).
#[must_use]
pub fn filter_tag<S: AsRef<str>>(tag: &str, ignore: &[S], capitalize: bool) -> Option<String> {
    if tag.chars().count() > MAX_TAG_LENGTH {
        return None;
    }

    let lowercase = tag.to_lowercase();
    let mentions_release = ignore
        .iter()
        .map(|value| value.as_ref().to_lowercase())
        .filter(|value| !value.is_empty())
        .any(|value| value.contains(&lowercase) || lowercase.contains(&value));
    if mentions_release {
        return None;
    }

    if tag.len() == 4 && tag.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    if BLACKLIST.contains(&lowercase.as_str())
        || EXCLUDED_SUBSTRINGS
            .iter()
            .any(|substring| lowercase.contains(substring))
    {
        return None;
    }

    let tag = SYNONYMS
        .iter()
        .find_map(|&(synonym, canonical)| (synonym == lowercase).then_some(canonical))
        .unwrap_or(tag);

    if !capitalize {
        return Some(tag.to_string());
    }

    if UPPERCASE_TAGS.contains(&tag.to_lowercase().as_str()) {
        Some(tag.to_uppercase())
    } else {
        Some(capitalize_tag(tag))
    }
}

/// Clean up a list of weighted tags.
///
/// The order of the input is preserved. If two tags map to the same cleaned-up tag, the one with
/// the higher weight wins.
#[must_use]
pub fn filter_tags<S: AsRef<str>>(
    tags: &[GenreTag],
    ignore: &[S],
    capitalize: bool,
) -> Vec<GenreTag> {
    let mut accepted: Vec<GenreTag> = Vec::with_capacity(tags.len());
    for tag in tags {
        let Some(name) = filter_tag(&tag.name, ignore, capitalize) else {
            continue;
        };

        match accepted.iter_mut().find(|existing| existing.name == name) {
            Some(existing) if existing.weight > tag.weight => (),
            Some(existing) => existing.weight = tag.weight,
            None => accepted.push(GenreTag {
                name,
                weight: tag.weight,
            }),
        }
    }
    accepted
}

/// Merge tag lists from several sources, keeping the highest weight for each tag.
#[must_use]
pub fn merge_tags(sources: &[Vec<GenreTag>]) -> Vec<GenreTag> {
    let mut merged: Vec<GenreTag> = vec![];
    for tag in sources.iter().flatten() {
        match merged.iter_mut().find(|existing| existing.name == tag.name) {
            Some(existing) => existing.weight = existing.weight.max(tag.weight),
            None => merged.push(tag.clone()),
        }
    }
    merged
}
