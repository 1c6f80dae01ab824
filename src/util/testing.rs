// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

#![cfg(test)]
//! Testing utils.

use crate::oracle::{GenreTag, OracleRelease, StaticOracle};
use crate::release::Release;
use crate::track::{EncoderMethod, StreamInfo, TagType, Track};

/// Track titles and lengths (in seconds) of the fixture release.
const MEZZANINE_TRACKS: [(&str, f64); 11] = [
    ("Angel", 379.0),
    ("Risingson", 298.0),
    ("Teardrop", 330.0),
    ("Inertia Creeps", 356.0),
    ("Exchange", 251.0),
    ("Dissolved Girl", 366.0),
    ("Man Next Door", 355.0),
    ("Black Milk", 381.0),
    ("Mezzanine", 356.0),
    ("Group Four", 493.0),
    ("(Exchange)", 251.0),
];

/// Tracks of a consistently tagged 11-track CBR release, keyed by filename.
pub fn mezzanine_tracks() -> Vec<(String, Track)> {
    MEZZANINE_TRACKS
        .iter()
        .zip(1u32..)
        .map(|(&(title, length), number)| {
            let track = Track {
                artists: vec!["Massive Attack".to_string()],
                release_artists: vec!["Massive Attack".to_string()],
                release_title: Some("Mezzanine".to_string()),
                track_title: Some(title.to_string()),
                date: Some("1998-04-17".to_string()),
                track_number: Some(number),
                total_tracks: Some(11),
                disc_number: Some(1),
                total_discs: Some(1),
                genres: vec!["Electronic".to_string(), "Trip-hop".to_string()],
                comment: None,
                stream_info: StreamInfo {
                    tag_type: TagType::Id3,
                    encoder_method: EncoderMethod::Cbr,
                    bitrate: 128_000,
                    length,
                    quality: None,
                },
            };
            (format!("{number:02} - {title}.mp3"), track)
        })
        .collect()
}

/// A consistently tagged 11-track CBR release.
pub fn mezzanine() -> Release {
    mezzanine_tracks().into_iter().collect()
}

/// Shorthand for a [`GenreTag`].
pub fn genre_tag(name: &str, weight: u32) -> GenreTag {
    GenreTag {
        name: name.to_string(),
        weight,
    }
}

/// An oracle that agrees with [`mezzanine()`].
pub fn mezzanine_oracle() -> StaticOracle {
    let release = OracleRelease {
        title: "Mezzanine".to_string(),
        date: Some("1998-04-17".to_string()),
        tracks: MEZZANINE_TRACKS
            .iter()
            .zip(1u32..)
            .map(|(&(title, _), number)| (number, title.to_string()))
            .collect(),
        tags: vec![
            genre_tag("trip-hop", 100),
            genre_tag("electronic", 90),
            genre_tag("massive attack", 60),
            genre_tag("1998", 40),
            genre_tag("seen live", 20),
        ],
    };
    StaticOracle::default()
        .with_artist(
            "Massive Attack",
            vec![genre_tag("trip-hop", 100), genre_tag("electronic", 80)],
        )
        .with_artist("Elizabeth Fraser", vec![genre_tag("dream pop", 100)])
        .with_release("Massive Attack", release)
}
