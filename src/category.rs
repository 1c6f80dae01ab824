// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Release categories and sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ReleaseCategory {
    /// A regular studio album.
    Album,
    /// A retrospective collection of an artist's work.
    Anthology,
    /// An unofficial release.
    Bootleg,
    /// A collection of tracks by various artists.
    Compilation,
    /// A recording of a concert.
    #[serde(rename = "Concert Recording")]
    ConcertRecording,
    /// A demo recording.
    Demo,
    /// An extended play.
    #[serde(rename = "EP")]
    Ep,
    /// The soundtrack of a video game.
    #[serde(rename = "Game Soundtrack")]
    GameSoundtrack,
    /// An interview.
    Interview,
    /// A live album.
    #[serde(rename = "Live Album")]
    LiveAlbum,
    /// A DJ mix.
    Mix,
    /// A mixtape.
    Mixtape,
    /// A remix album.
    Remix,
    /// A single.
    Single,
    /// The soundtrack of a movie or show.
    Soundtrack,
    /// Anything else.
    Unknown,
}

impl ReleaseCategory {
    /// All categories, in declaration order.
    pub const ALL: [ReleaseCategory; 16] = [
        Self::Album,
        Self::Anthology,
        Self::Bootleg,
        Self::Compilation,
        Self::ConcertRecording,
        Self::Demo,
        Self::Ep,
        Self::GameSoundtrack,
        Self::Interview,
        Self::LiveAlbum,
        Self::Mix,
        Self::Mixtape,
        Self::Remix,
        Self::Single,
        Self::Soundtrack,
        Self::Unknown,
    ];

    /// Human-readable name, as used in folder names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Anthology => "Anthology",
            Self::Bootleg => "Bootleg",
            Self::Compilation => "Compilation",
            Self::ConcertRecording => "Concert Recording",
            Self::Demo => "Demo",
            Self::Ep => "EP",
            Self::GameSoundtrack => "Game Soundtrack",
            Self::Interview => "Interview",
            Self::LiveAlbum => "Live Album",
            Self::Mix => "Mix",
            Self::Mixtape => "Mixtape",
            Self::Remix => "Remix",
            Self::Single => "Single",
            Self::Soundtrack => "Soundtrack",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns `true` for categories where no single artist dominates the track credits.
    #[must_use]
    pub fn is_various_artists(self) -> bool {
        matches!(
            self,
            Self::Compilation | Self::GameSoundtrack | Self::Mix | Self::Mixtape | Self::Soundtrack
        )
    }
}

impl fmt::Display for ReleaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseCategory {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| crate::Error::UnknownCategory(value.to_string()))
    }
}

/// The medium a release was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum ReleaseSource {
    /// Compact Disc.
    #[default]
    #[serde(rename = "CD")]
    Cd,
    /// Digital download or stream.
    #[serde(rename = "WEB")]
    Web,
    /// Vinyl record.
    Vinyl,
    /// Cassette tape.
    Cassette,
    /// DVD (Video or Audio).
    #[serde(rename = "DVD")]
    Dvd,
    /// Super Audio CD.
    #[serde(rename = "SACD")]
    Sacd,
    /// Blu-ray disc.
    #[serde(rename = "Blu-Ray")]
    BluRay,
    /// Soundboard recording.
    Soundboard,
}

impl ReleaseSource {
    /// All sources, in declaration order.
    pub const ALL: [ReleaseSource; 8] = [
        Self::Cd,
        Self::Web,
        Self::Vinyl,
        Self::Cassette,
        Self::Dvd,
        Self::Sacd,
        Self::BluRay,
        Self::Soundboard,
    ];

    /// Human-readable name, as used in folder names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cd => "CD",
            Self::Web => "WEB",
            Self::Vinyl => "Vinyl",
            Self::Cassette => "Cassette",
            Self::Dvd => "DVD",
            Self::Sacd => "SACD",
            Self::BluRay => "Blu-Ray",
            Self::Soundboard => "Soundboard",
        }
    }
}

impl fmt::Display for ReleaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseSource {
    type Err = crate::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| crate::Error::UnknownSource(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "live album".parse::<ReleaseCategory>().unwrap(),
            ReleaseCategory::LiveAlbum
        );
        assert_eq!("EP".parse::<ReleaseCategory>().unwrap(), ReleaseCategory::Ep);
        assert!("Symphony".parse::<ReleaseCategory>().is_err());
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!("web".parse::<ReleaseSource>().unwrap(), ReleaseSource::Web);
        assert_eq!(
            "Blu-ray".parse::<ReleaseSource>().unwrap(),
            ReleaseSource::BluRay
        );
        assert!("Tape".parse::<ReleaseSource>().is_err());
    }

    #[test]
    fn test_various_artists_categories() {
        let va = ReleaseCategory::ALL
            .into_iter()
            .filter(|category| category.is_various_artists())
            .collect::<Vec<_>>();
        assert_eq!(
            va,
            [
                ReleaseCategory::Compilation,
                ReleaseCategory::GameSoundtrack,
                ReleaseCategory::Mix,
                ReleaseCategory::Mixtape,
                ReleaseCategory::Soundtrack,
            ]
        );
    }
}
