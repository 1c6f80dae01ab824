// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Metadata of a single audio file.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of tag container a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum TagType {
    /// ID3 tags (MP3 files).
    #[default]
    #[serde(rename = "ID3")]
    Id3,
    /// FLAC Vorbis comments.
    #[serde(rename = "FLAC")]
    Flac,
    /// MP4/iTunes atoms.
    #[serde(rename = "MP4")]
    Mp4,
    /// Ogg Vorbis comments.
    #[serde(rename = "Vorbis")]
    Vorbis,
}

impl TagType {
    /// Prefix for the long form of a codec setting.
    pub(crate) fn codec_prefix(self) -> &'static str {
        match self {
            Self::Id3 => "MP3 ",
            Self::Flac => "",
            Self::Mp4 => "MP4 ",
            Self::Vorbis => "OGG ",
        }
    }

    /// File extension commonly used for files with this tag type.
    #[must_use]
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Id3 => "mp3",
            Self::Flac => "flac",
            Self::Mp4 => "m4a",
            Self::Vorbis => "ogg",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id3 => "ID3",
            Self::Flac => "FLAC",
            Self::Mp4 => "MP4",
            Self::Vorbis => "Vorbis",
        })
    }
}

/// Bitrate mode of the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum EncoderMethod {
    /// Constant bitrate.
    #[default]
    #[serde(rename = "CBR")]
    Cbr,
    /// Variable bitrate.
    #[serde(rename = "VBR")]
    Vbr,
    /// Average bitrate.
    #[serde(rename = "ABR")]
    Abr,
}

impl EncoderMethod {
    /// Short name of the method.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cbr => "CBR",
            Self::Vbr => "VBR",
            Self::Abr => "ABR",
        }
    }
}

/// Stream and encoder properties of a file.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct StreamInfo {
    /// Tag container kind.
    pub tag_type: TagType,
    /// Encoder bitrate mode.
    pub encoder_method: EncoderMethod,
    /// Bitrate in bits per second.
    pub bitrate: u32,
    /// Length in seconds.
    pub length: f64,
    /// Encoder quality preset (e.g. `V0` or `APS`), if the encoder wrote one.
    #[serde(default)]
    pub quality: Option<String>,
}

/// Trim every value of a list, drop empty values and duplicates.
fn trimmed_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .unique()
        .map(ToString::to_string)
        .collect()
}

/// Trim an optional value.
fn trimmed_value(value: Option<&String>) -> Option<String> {
    value.map(|value| value.trim().to_string())
}

/// Returns `true` if the value is absent or blank.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

/// One audio file's decoded metadata.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Track {
    /// Track Artist Name(s).
    pub artists: Vec<String>,
    /// Release Artist Name(s).
    pub release_artists: Vec<String>,
    /// Release Title.
    pub release_title: Option<String>,
    /// Track Title.
    pub track_title: Option<String>,
    /// Release Date (`YYYY` or `YYYY-MM-DD`).
    pub date: Option<String>,
    /// Track number (relative to the disc).
    pub track_number: Option<u32>,
    /// Number of tracks on the disc.
    pub total_tracks: Option<u32>,
    /// Disc number.
    pub disc_number: Option<u32>,
    /// Number of discs in the release.
    pub total_discs: Option<u32>,
    /// Genre Name(s).
    pub genres: Vec<String>,
    /// Comment.
    pub comment: Option<String>,
    /// Stream and encoder properties.
    pub stream_info: StreamInfo,
}

impl Track {
    /// Track artists without surrounding whitespace.
    #[must_use]
    pub fn trimmed_artists(&self) -> Vec<String> {
        trimmed_list(&self.artists)
    }

    /// Release artists without surrounding whitespace.
    #[must_use]
    pub fn trimmed_release_artists(&self) -> Vec<String> {
        trimmed_list(&self.release_artists)
    }

    /// Genres without surrounding whitespace.
    #[must_use]
    pub fn trimmed_genres(&self) -> Vec<String> {
        trimmed_list(&self.genres)
    }

    /// Date without surrounding whitespace.
    #[must_use]
    pub fn trimmed_date(&self) -> Option<String> {
        trimmed_value(self.date.as_ref())
    }

    /// Release title without surrounding whitespace.
    #[must_use]
    pub fn trimmed_release_title(&self) -> Option<String> {
        trimmed_value(self.release_title.as_ref())
    }

    /// Track title without surrounding whitespace.
    #[must_use]
    pub fn trimmed_track_title(&self) -> Option<String> {
        trimmed_value(self.track_title.as_ref())
    }

    /// Returns `true` if the list has padded, blank or duplicate entries.
    pub(crate) fn has_untrimmed_entries(values: &[String]) -> bool {
        trimmed_list(values) != values
    }

    /// Returns `true` if the optional value has leading or trailing whitespace.
    pub(crate) fn has_padded_value(value: Option<&String>) -> bool {
        value.is_some_and(|value| value.trim() != value)
    }

    /// Returns `true` if the track has no track title.
    #[must_use]
    pub fn is_missing_title(&self) -> bool {
        is_blank(self.track_title.as_deref())
    }

    /// Disc number, assuming disc 1 if unset.
    #[must_use]
    pub fn disc_number_or_default(&self) -> u32 {
        self.disc_number.unwrap_or(1)
    }

    /// Codec setting of this track.
    ///
    /// Lossless files report `FLAC`. Otherwise, the encoder preset is used if present, or the
    /// bitrate mode if not. The long form is prefixed with the container name (e.g. `MP3 CBR`).
    #[must_use]
    pub fn codec_setting(&self, short: bool) -> String {
        let info = &self.stream_info;
        let setting = match info.tag_type {
            TagType::Flac => "FLAC",
            _ => info
                .quality
                .as_deref()
                .map(str::trim)
                .filter(|quality| !quality.is_empty())
                .unwrap_or_else(|| info.encoder_method.as_str()),
        };

        if short {
            setting.to_string()
        } else {
            format!("{}{setting}", info.tag_type.codec_prefix())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mp3_track() -> Track {
        Track {
            artists: vec!["Massive Attack".to_string()],
            stream_info: StreamInfo {
                tag_type: TagType::Id3,
                encoder_method: EncoderMethod::Cbr,
                bitrate: 128_000,
                length: 100.0,
                quality: None,
            },
            ..Track::default()
        }
    }

    #[test]
    fn test_codec_setting() {
        let mut track = mp3_track();
        assert_eq!(track.codec_setting(true), "CBR");
        assert_eq!(track.codec_setting(false), "MP3 CBR");

        track.stream_info.encoder_method = EncoderMethod::Vbr;
        track.stream_info.quality = Some("V0".to_string());
        assert_eq!(track.codec_setting(true), "V0");

        track.stream_info.tag_type = TagType::Mp4;
        assert_eq!(track.codec_setting(false), "MP4 V0");

        track.stream_info.tag_type = TagType::Flac;
        assert_eq!(track.codec_setting(true), "FLAC");
        assert_eq!(track.codec_setting(false), "FLAC");
    }

    #[test]
    fn test_trimmed_fields() {
        let track = Track {
            artists: vec![" Massive Attack".to_string(), "Massive Attack ".to_string()],
            genres: vec!["Trip-hop ".to_string(), " ".to_string()],
            date: Some("1998 ".to_string()),
            ..mp3_track()
        };
        assert_eq!(track.trimmed_artists(), ["Massive Attack"]);
        assert_eq!(track.trimmed_genres(), ["Trip-hop"]);
        assert_eq!(track.trimmed_date().as_deref(), Some("1998"));
        assert!(Track::has_untrimmed_entries(&track.artists));
        assert!(Track::has_untrimmed_entries(&track.genres));
        assert!(Track::has_untrimmed_entries(&[
            "Massive Attack".to_string(),
            "Massive Attack".to_string()
        ]));
        assert!(!Track::has_untrimmed_entries(&mp3_track().artists));
        assert!(Track::has_padded_value(track.date.as_ref()));
        assert!(!Track::has_padded_value(track.release_title.as_ref()));
    }

    #[test]
    fn test_missing_title() {
        let mut track = mp3_track();
        assert!(track.is_missing_title());
        track.track_title = Some(String::new());
        assert!(track.is_missing_title());
        track.track_title = Some("Angel".to_string());
        assert!(!track.is_missing_title());
    }
}
