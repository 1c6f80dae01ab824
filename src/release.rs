// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! A set of tracks that form a release and the properties derived from them.

use crate::category::{ReleaseCategory, ReleaseSource};
use crate::codec::{codec_rank, UNKNOWN_RANK};
use crate::normalize::{flatten_artists, normalize_str, strip_release_stubs};
use crate::pathformat::{FolderLayout, PathFormatter, PathFormatterValues};
use crate::track::{EncoderMethod, TagType, Track};
use crate::util::release_year;
use crate::Config;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Releases with fewer tracks and a single guest artist are singles.
const SINGLE_MAX_TRACKS: usize = 3;

/// Releases with fewer tracks and a single guest artist are EPs.
const EP_MAX_TRACKS: usize = 5;

/// Number of guest artists that makes a release an EP or single.
const SINGLE_GUEST_ARTISTS: usize = 1;

/// A release is a compilation if the number of guest artists exceeds this fraction of tracks.
const COMPILATION_GUEST_RATIO: f64 = 0.5;

/// Returns the only distinct value, comparing with the given key.
fn single_value<T, K: PartialEq>(
    values: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Option<T> {
    let mut values = values.into_iter();
    let first = values.next()?;
    let first_key = key(&first);
    values.all(|value| key(&value) == first_key).then_some(first)
}

/// Sorted copy of a list, used to compare lists regardless of their order.
fn sorted(values: &[String]) -> Vec<String> {
    values.iter().cloned().sorted().collect()
}

/// Returns `true` if the numbers are `1, 2, ..., n`.
fn is_gapless_from_one(numbers: &[u32]) -> bool {
    numbers.first() == Some(&1) && numbers.iter().tuple_windows().all(|(a, b)| a + 1 == *b)
}

/// Round a bitrate in bits per second to kbps.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bitrate_to_kbps(bitrate: f64) -> u32 {
    (bitrate / 1000.0).round_ties_even() as u32
}

/// A release, i.e. a set of tracks keyed by filename.
///
/// The category and source can be set manually. Otherwise, the category is guessed from the
/// track credits and the source defaults to CD.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Release {
    /// Tracks by filename.
    tracks: BTreeMap<String, Track>,
    /// Manually assigned category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<ReleaseCategory>,
    /// Manually assigned source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<ReleaseSource>,
    /// Number of violations found by the last validation.
    #[serde(skip)]
    violation_count: Cell<Option<usize>>,
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.tracks == other.tracks
            && self.category == other.category
            && self.source == other.source
    }
}

impl FromIterator<(String, Track)> for Release {
    fn from_iter<I: IntoIterator<Item = (String, Track)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(track) = self.first_track() else {
            return f.write_str("<empty release>");
        };
        let year = track
            .date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
            .unwrap_or("<date not found>");
        write!(
            f,
            "{} - {year} - {}",
            flatten_artists(&track.release_artists),
            track.release_title.as_deref().unwrap_or_default()
        )
    }
}

impl Release {
    /// Create a release from tracks keyed by filename.
    #[must_use]
    pub fn new(tracks: BTreeMap<String, Track>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    /// Set the category manually.
    #[must_use]
    pub fn with_category(mut self, category: ReleaseCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the source manually.
    #[must_use]
    pub fn with_source(mut self, source: ReleaseSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Tracks by filename.
    #[must_use]
    pub fn tracks(&self) -> &BTreeMap<String, Track> {
        &self.tracks
    }

    /// Mutable iterator over the tracks, ordered by filename.
    pub fn tracks_mut(&mut self) -> btree_map::IterMut<'_, String, Track> {
        self.tracks.iter_mut()
    }

    /// Number of tracks.
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// The first track by filename, which is used as representative for release-wide values.
    #[must_use]
    pub fn first_track(&self) -> Option<&Track> {
        self.tracks.values().next()
    }

    /// Mutable access to the first track by filename.
    pub fn first_track_mut(&mut self) -> Option<&mut Track> {
        self.tracks.values_mut().next()
    }

    /// Tracks ordered by disc number, track number and filename.
    #[must_use]
    pub fn sorted_tracks(&self) -> Vec<(&String, &Track)> {
        self.tracks
            .iter()
            .sorted_by_key(|(filename, track)| {
                (
                    track.disc_number_or_default(),
                    track.track_number.unwrap_or(u32::MAX),
                    *filename,
                )
            })
            .collect()
    }

    /// The manually assigned category, if any.
    #[must_use]
    pub fn manual_category(&self) -> Option<ReleaseCategory> {
        self.category
    }

    /// Assign a category manually (or remove the manual category).
    pub fn set_category(&mut self, category: Option<ReleaseCategory>) {
        self.category = category;
    }

    /// The manually assigned source, if any.
    #[must_use]
    pub fn manual_source(&self) -> Option<ReleaseSource> {
        self.source
    }

    /// Assign a source manually (or remove the manual source).
    pub fn set_source(&mut self, source: Option<ReleaseSource>) {
        self.source = source;
    }

    /// The release category: the manual one, or a guess.
    #[must_use]
    pub fn category(&self) -> ReleaseCategory {
        self.category.unwrap_or_else(|| self.guess_category())
    }

    /// The release source: the manual one, or CD.
    #[must_use]
    pub fn source(&self) -> ReleaseSource {
        self.source.unwrap_or_default()
    }

    /// Guess the category from the number of tracks and artists.
    ///
    /// Track artists that are not release artists of the first track count as guests. One guest
    /// on a short release makes it a single or EP, more guests than half the number of tracks make
    /// it a compilation.
    #[must_use]
    pub fn guess_category(&self) -> ReleaseCategory {
        let primary_artists = self
            .first_track()
            .map(|track| track.release_artists.as_slice())
            .unwrap_or_default();
        let guest_count = self
            .tracks
            .values()
            .flat_map(|track| track.artists.iter())
            .filter(|artist| !primary_artists.contains(artist))
            .unique()
            .count();
        let track_count = self.track_count();

        #[expect(clippy::cast_precision_loss)]
        let is_compilation = guest_count as f64 > track_count as f64 * COMPILATION_GUEST_RATIO;

        if track_count <= SINGLE_MAX_TRACKS && guest_count == SINGLE_GUEST_ARTISTS {
            ReleaseCategory::Single
        } else if track_count <= EP_MAX_TRACKS && guest_count == SINGLE_GUEST_ARTISTS {
            ReleaseCategory::Ep
        } else if is_compilation {
            ReleaseCategory::Compilation
        } else {
            ReleaseCategory::Album
        }
    }

    /// Returns `true` if the release is credited to various artists.
    #[must_use]
    pub fn is_va(&self) -> bool {
        self.category().is_various_artists()
    }

    /// Number of violations found by the last validation, if any.
    #[must_use]
    pub fn violation_count(&self) -> Option<usize> {
        self.violation_count.get()
    }

    /// Store the number of violations found by a validation, or forget it.
    pub(crate) fn set_violation_count(&self, count: Option<usize>) {
        self.violation_count.set(count);
    }

    /// The release date, if all tracks agree on a non-blank one.
    #[must_use]
    pub fn validate_release_date(&self) -> Option<String> {
        single_value(self.tracks.values().map(|track| track.date.as_deref()), |date| *date)
            .flatten()
            .filter(|date| !date.is_empty())
            .map(ToString::to_string)
    }

    /// The release title, if all tracks agree on a non-blank one (possibly after normalization).
    #[must_use]
    pub fn validate_release_title(&self) -> Option<String> {
        single_value(
            self.tracks.values().map(|track| track.release_title.as_deref()),
            |title| *title,
        )
        .flatten()
        .filter(|title| !title.is_empty())
        .map(ToString::to_string)
        .or_else(|| {
            single_value(
                self.tracks
                    .values()
                    .map(|track| normalize_str(track.release_title.as_deref().unwrap_or_default())),
                Clone::clone,
            )
            .filter(|title| !title.is_empty())
        })
    }

    /// The release artists, if all tracks agree on them. Empty otherwise.
    #[must_use]
    pub fn validate_release_artists(&self) -> Vec<String> {
        single_value(self.tracks.values().map(|track| &track.release_artists), |artists| {
            sorted(artists)
        })
        .map(|artists| artists.iter().unique().cloned().collect())
        .unwrap_or_default()
    }

    /// The genres, if all tracks agree on them. Empty otherwise.
    #[must_use]
    pub fn validate_genres(&self) -> Vec<String> {
        single_value(self.tracks.values().map(|track| &track.genres), |genres| {
            sorted(genres)
        })
        .cloned()
        .unwrap_or_default()
    }

    /// Number of tracks without artists.
    #[must_use]
    pub fn blank_artists(&self) -> usize {
        self.tracks
            .values()
            .filter(|track| track.artists.iter().all(String::is_empty))
            .count()
    }

    /// Number of tracks without a track title.
    #[must_use]
    pub fn blank_track_titles(&self) -> usize {
        self.tracks
            .values()
            .filter(|track| track.is_missing_title())
            .count()
    }

    /// Sorted track numbers by disc number (assuming disc 1 if unset), and whether every track on
    /// that disc has a track number.
    fn track_numbers_by_disc(&self) -> BTreeMap<u32, (Vec<u32>, bool)> {
        let mut discs: BTreeMap<u32, (Vec<u32>, bool)> = BTreeMap::new();
        for track in self.tracks.values() {
            let (numbers, all_numbered) = discs
                .entry(track.disc_number_or_default())
                .or_insert_with(|| (vec![], true));
            match track.track_number {
                Some(number) => numbers.push(number),
                None => *all_numbered = false,
            }
        }
        for (numbers, _) in discs.values_mut() {
            numbers.sort_unstable();
        }
        discs
    }

    /// Track numbers of the discs that don't have a complete set of tracks (i.e. numbered
    /// `1..=n` without gaps). Empty if all discs are complete.
    #[must_use]
    pub fn validate_track_numbers(&self) -> BTreeMap<u32, Vec<u32>> {
        self.track_numbers_by_disc()
            .into_iter()
            .filter(|(_, (numbers, all_numbered))| {
                !(*all_numbered && is_gapless_from_one(numbers))
            })
            .map(|(disc, (numbers, _))| (disc, numbers))
            .collect()
    }

    /// Number of tracks per disc, or `None` for discs that are not complete.
    #[must_use]
    pub fn get_total_tracks(&self) -> BTreeMap<u32, Option<u32>> {
        self.track_numbers_by_disc()
            .into_iter()
            .map(|(disc, (numbers, all_numbered))| {
                let total = (all_numbered && is_gapless_from_one(&numbers))
                    .then(|| u32::try_from(numbers.len()).ok())
                    .flatten();
                (disc, total)
            })
            .collect()
    }

    /// Discs with blank, inconsistent or incorrect total tracks.
    #[must_use]
    pub fn validate_total_tracks(&self) -> Vec<u32> {
        let mut totals: BTreeMap<u32, Vec<Option<u32>>> = BTreeMap::new();
        for track in self.tracks.values() {
            totals
                .entry(track.disc_number_or_default())
                .or_default()
                .push(track.total_tracks);
        }

        totals
            .into_iter()
            .filter(|(_, values)| {
                let track_count = u32::try_from(values.len()).ok();
                single_value(values.iter(), |value| **value).copied().flatten() != track_count
            })
            .map(|(disc, _)| disc)
            .collect()
    }

    /// Disc numbers (assuming disc 1 if unset), if they are not `1..=n` without gaps. Empty
    /// otherwise.
    #[must_use]
    pub fn validate_disc_numbers(&self) -> Vec<u32> {
        let discs = self.track_numbers_by_disc().into_keys().collect::<Vec<_>>();
        if discs.is_empty() || is_gapless_from_one(&discs) {
            vec![]
        } else {
            discs
        }
    }

    /// Returns `true` if all tracks have the same total discs, matching the highest disc number.
    #[must_use]
    pub fn validate_total_discs(&self) -> bool {
        let highest_disc = self.track_numbers_by_disc().into_keys().next_back();
        let total_discs = single_value(self.tracks.values().map(|track| track.total_discs), |total| {
            *total
        })
        .flatten();
        highest_disc.is_some() && total_discs == highest_disc
    }

    /// Number of discs, if the disc numbers that are set form a gapless run from 1.
    #[must_use]
    pub fn get_total_discs(&self) -> Option<u32> {
        let discs = self
            .tracks
            .values()
            .filter_map(|track| track.disc_number)
            .sorted_unstable()
            .dedup()
            .collect::<Vec<_>>();
        is_gapless_from_one(&discs).then(|| discs.last().copied()).flatten()
    }

    /// Distinct tag types, in order of appearance.
    #[must_use]
    pub fn tag_types(&self) -> Vec<TagType> {
        self.tracks
            .values()
            .map(|track| track.stream_info.tag_type)
            .unique()
            .collect()
    }

    /// Distinct codec settings (short form), in order of appearance.
    #[must_use]
    pub fn codecs(&self) -> Vec<String> {
        self.tracks
            .values()
            .map(|track| track.codec_setting(true))
            .unique()
            .collect()
    }

    /// Distinct constant bitrates in kbps, if all tracks are CBR-encoded. Empty otherwise.
    #[must_use]
    pub fn cbr_bitrates(&self) -> Vec<u32> {
        if self.codecs() != [EncoderMethod::Cbr.as_str()] {
            return vec![];
        }

        self.tracks
            .values()
            .map(|track| bitrate_to_kbps(f64::from(track.stream_info.bitrate)))
            .unique()
            .collect()
    }

    /// Average bitrate in bits per second, weighted by track length, if all tracks are
    /// VBR-encoded.
    #[must_use]
    pub fn vbr_bitrate(&self) -> Option<f64> {
        if self.codecs() != [EncoderMethod::Vbr.as_str()] {
            return None;
        }

        let (weighted_sum, total_length) =
            self.tracks
                .values()
                .fold((0.0, 0.0), |(weighted_sum, total_length), track| {
                    let info = &track.stream_info;
                    (
                        weighted_sum + f64::from(info.bitrate) * info.length,
                        total_length + info.length,
                    )
                });
        (total_length > 0.0).then(|| weighted_sum / total_length)
    }

    /// The codec setting of the whole release, e.g. `CBR320`, `VBR245`, `V0` or `FLAC`.
    ///
    /// Returns `None` if the tracks differ in tag type, codec or constant bitrate.
    #[must_use]
    pub fn codec_setting(&self, short: bool) -> Option<String> {
        let tag_type = single_value(self.tag_types(), |tag_type| *tag_type)?;
        let codec = single_value(self.codecs(), Clone::clone)?;

        let setting = if codec == EncoderMethod::Cbr.as_str() {
            let kbps = single_value(self.cbr_bitrates(), |kbps| *kbps)?;
            format!("{codec}{kbps}")
        } else if codec == EncoderMethod::Vbr.as_str() {
            let kbps = bitrate_to_kbps(self.vbr_bitrate()?);
            format!("{codec}{kbps}")
        } else {
            codec
        };

        if short {
            Some(setting)
        } else {
            Some(format!("{}{setting}", tag_type.codec_prefix()))
        }
    }

    /// Rank of the release's codec setting. See [`codec_rank`].
    #[must_use]
    pub fn codec_rank(&self) -> i32 {
        self.codec_setting(true)
            .map_or(UNKNOWN_RANK, |setting| codec_rank(&setting))
    }

    /// Total length in seconds.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.tracks
            .values()
            .map(|track| track.stream_info.length)
            .sum()
    }

    /// The codec description used in folder names, e.g. `CBR`, `V0` or `MP3 V0`.
    fn folder_codec(&self, short: bool) -> Option<String> {
        self.codec_setting(short)
            .and(self.first_track())
            .map(|track| track.codec_setting(short))
    }

    /// Returns `true` if a folder name can be derived for this release.
    #[must_use]
    pub fn can_validate_folder_name(&self) -> bool {
        self.validate_release_date().is_some()
            && self.validate_release_title().is_some()
            && !self.validate_release_artists().is_empty()
    }

    /// The folder name for this release.
    ///
    /// # Errors
    ///
    /// Fails if date, title, artists or codec differ between tracks, or if the folder name
    /// templates are invalid.
    pub fn folder_name(&self, config: &Config) -> crate::Result<String> {
        let date = self
            .validate_release_date()
            .ok_or(crate::Error::FolderNamePrecondition("release date is blank or inconsistent"))?;
        let year = release_year(&date)
            .ok_or(crate::Error::FolderNamePrecondition("release date is not a valid date"))?;
        let title = self
            .validate_release_title()
            .ok_or(crate::Error::FolderNamePrecondition("release title is blank or inconsistent"))?;
        let artists = self.validate_release_artists();
        if artists.is_empty() {
            return Err(crate::Error::FolderNamePrecondition(
                "release artists are blank or inconsistent",
            ));
        }
        let codec = self
            .folder_codec(config.paths.codec_short.unwrap_or(true))
            .ok_or(crate::Error::FolderNamePrecondition("codecs are inconsistent"))?;

        let (title, _) = strip_release_stubs(&title);
        let artist = flatten_artists(&artists);
        let category = self.category();
        let (layout, default_category) = if category.is_various_artists() {
            (FolderLayout::TitleFirst, ReleaseCategory::Compilation)
        } else {
            (FolderLayout::ArtistFirst, ReleaseCategory::Album)
        };
        let source = self.source();

        let values = PathFormatterValues {
            artist: &artist,
            year: &year,
            title: &title,
            category: (category != default_category).then_some(category.as_str()),
            source: (source != ReleaseSource::default()).then_some(source.as_str()),
            codec: &codec,
        };
        PathFormatter::new(&config.paths)?.format(layout, &values)
    }

    /// Returns the folder name if it matches the one derived from the tags.
    #[must_use]
    pub fn validate_folder_name(&self, config: &Config, folder_name: &str) -> Option<String> {
        if !self.can_validate_folder_name() {
            return None;
        }

        self.folder_name(config)
            .ok()
            .filter(|expected| expected == folder_name)
    }

    /// Renumber tracks per disc if they were numbered continuously across all discs.
    ///
    /// This only happens if the per-disc numbering is invalid, the release has multiple discs,
    /// every track has a track and disc number, and the track numbers in filename order are
    /// `1..=n`. Returns `true` if the tracks were renumbered.
    pub fn resequence_track_numbers(&mut self) -> bool {
        if self.validate_track_numbers().is_empty() {
            return false;
        }

        let disc_count = self
            .tracks
            .values()
            .filter_map(|track| track.disc_number)
            .unique()
            .count();
        if disc_count < 2 {
            return false;
        }

        let Some(numbers) = self
            .tracks
            .values()
            .map(|track| track.track_number.filter(|_| track.disc_number.is_some()))
            .collect::<Option<Vec<u32>>>()
        else {
            return false;
        };
        if !numbers.iter().copied().eq(1..=u32::try_from(numbers.len()).unwrap_or(0)) {
            return false;
        }

        let mut next_number: BTreeMap<u32, u32> = BTreeMap::new();
        for track in self.tracks.values_mut() {
            let number = next_number.entry(track.disc_number_or_default()).or_insert(0);
            *number += 1;
            track.track_number = Some(*number);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{mezzanine, mezzanine_tracks};
    use float_eq::assert_float_eq;

    #[test]
    fn test_first_track_is_lexically_first() {
        let release = mezzanine();
        assert_eq!(release.first_track().unwrap().track_title.as_deref(), Some("Angel"));
        let sorted = release.sorted_tracks();
        assert_eq!(sorted[10].1.track_number, Some(11));
    }

    #[test]
    fn test_validate_consistent_fields() {
        let release = mezzanine();
        assert_eq!(release.validate_release_date().as_deref(), Some("1998-04-17"));
        assert_eq!(release.validate_release_title().as_deref(), Some("Mezzanine"));
        assert_eq!(release.validate_release_artists(), ["Massive Attack"]);
        assert_eq!(release.validate_genres(), ["Electronic", "Trip-hop"]);
        assert_eq!(release.blank_artists(), 0);
        assert_eq!(release.blank_track_titles(), 0);
    }

    #[test]
    fn test_validate_inconsistent_fields() {
        let mut release = mezzanine();
        let track = release.first_track_mut().unwrap();
        track.date = Some("1998".to_string());
        track.release_title = Some("Mezzanine  ".to_string());
        track.release_artists = vec![];
        track.genres.reverse();
        track.artists = vec![String::new()];
        track.track_title = Some(String::new());
        release.tracks_mut().nth(1).unwrap().1.track_title = None;

        assert_eq!(release.validate_release_date(), None);
        assert_eq!(release.validate_release_title().as_deref(), Some("Mezzanine"));
        assert!(release.validate_release_artists().is_empty());
        assert_eq!(release.validate_genres(), ["Trip-hop", "Electronic"]);
        assert_eq!(release.blank_artists(), 1);
        assert_eq!(release.blank_track_titles(), 2);
    }

    #[test]
    fn test_track_numbers() {
        let release = mezzanine();
        assert!(release.validate_track_numbers().is_empty());
        assert!(release.get_total_tracks().values().all(|total| *total == Some(11)));
        assert!(release.validate_total_tracks().is_empty());
        assert!(release.validate_disc_numbers().is_empty());
        assert!(release.validate_total_discs());
        assert_eq!(release.get_total_discs(), Some(1));

        let mut release = mezzanine();
        for (_, track) in release.tracks_mut() {
            if track.track_number == Some(4) {
                track.track_number = None;
            }
        }
        assert_eq!(
            release.validate_track_numbers(),
            BTreeMap::from([(1, vec![1, 2, 3, 5, 6, 7, 8, 9, 10, 11])])
        );
        assert_eq!(release.get_total_tracks(), BTreeMap::from([(1, None)]));
    }

    #[test]
    fn test_total_tracks_and_discs() {
        let mut release = mezzanine();
        release.first_track_mut().unwrap().total_tracks = Some(12);
        assert_eq!(release.validate_total_tracks(), [1]);

        let mut release = mezzanine();
        release.first_track_mut().unwrap().total_discs = None;
        assert!(!release.validate_total_discs());

        let mut release = mezzanine();
        for (_, track) in release.tracks_mut() {
            track.disc_number = Some(2);
            track.total_discs = Some(2);
        }
        assert_eq!(release.validate_disc_numbers(), [2]);
        assert!(release.validate_total_discs());
        assert_eq!(release.get_total_discs(), None);
    }

    #[test]
    fn test_resequence_track_numbers() {
        let mut release = mezzanine();
        for (_, track) in release.tracks_mut() {
            let number = track.track_number.unwrap();
            track.disc_number = Some(if number <= 6 { 1 } else { 2 });
            track.total_discs = Some(2);
        }
        assert!(!release.validate_track_numbers().is_empty());
        assert!(release.resequence_track_numbers());
        assert!(release.validate_track_numbers().is_empty());
        assert_eq!(
            release.get_total_tracks(),
            BTreeMap::from([(1, Some(6)), (2, Some(5))])
        );

        // Already valid numbering is left alone.
        assert!(!release.resequence_track_numbers());

        let mut release = mezzanine();
        assert!(!release.resequence_track_numbers());
    }

    #[test]
    fn test_guess_category() {
        let release = mezzanine();
        assert_eq!(release.category(), ReleaseCategory::Album);
        assert!(!release.is_va());

        let release = mezzanine_tracks()
            .into_iter()
            .take(3)
            .map(|(filename, mut track)| {
                if track.track_number == Some(3) {
                    track.artists.push("Elizabeth Fraser".to_string());
                }
                (filename, track)
            })
            .collect::<Release>();
        assert_eq!(release.category(), ReleaseCategory::Single);

        let mut release = mezzanine();
        for (filename, track) in release.tracks_mut() {
            track.artists = vec![format!("Artist of {filename}")];
        }
        assert_eq!(release.category(), ReleaseCategory::Compilation);
        assert!(release.is_va());

        let release = release.with_category(ReleaseCategory::LiveAlbum);
        assert_eq!(release.category(), ReleaseCategory::LiveAlbum);
    }

    #[test]
    fn test_codec_setting() {
        let mut release = mezzanine();
        assert_eq!(release.tag_types(), [TagType::Id3]);
        assert_eq!(release.codecs(), ["CBR"]);
        assert_eq!(release.cbr_bitrates(), [128]);
        assert_eq!(release.codec_setting(true).as_deref(), Some("CBR128"));
        assert_eq!(release.codec_setting(false).as_deref(), Some("MP3 CBR128"));
        assert_eq!(release.codec_rank(), 6);

        release.first_track_mut().unwrap().stream_info.bitrate = 160_000;
        assert_eq!(release.cbr_bitrates(), [160, 128]);
        assert_eq!(release.codec_setting(true), None);
        assert_eq!(release.codec_rank(), UNKNOWN_RANK);

        for (_, track) in release.tracks_mut() {
            track.stream_info.encoder_method = EncoderMethod::Vbr;
            track.stream_info.bitrate = 200_000;
        }
        release.first_track_mut().unwrap().stream_info.bitrate = 300_000;
        let length = release.length();
        let first_length = release.first_track().unwrap().stream_info.length;
        let expected = (200_000.0 * (length - first_length) + 300_000.0 * first_length) / length;
        assert_float_eq!(release.vbr_bitrate().unwrap(), expected, abs <= 0.001);
        assert!(release.cbr_bitrates().is_empty());

        release.first_track_mut().unwrap().stream_info.quality = Some("V0".to_string());
        assert_eq!(release.codec_setting(true), None);
    }

    #[test]
    fn test_folder_name() {
        let config = Config::default();
        let release = mezzanine();
        assert!(release.can_validate_folder_name());
        assert_eq!(
            release.folder_name(&config).unwrap(),
            "Massive Attack - 1998 - Mezzanine [CBR]"
        );
        assert_eq!(
            release
                .validate_folder_name(&config, "Massive Attack - 1998 - Mezzanine [CBR]")
                .as_deref(),
            Some("Massive Attack - 1998 - Mezzanine [CBR]")
        );
        assert_eq!(release.validate_folder_name(&config, "Mezzanine"), None);

        let release = release.with_source(ReleaseSource::Web).with_category(ReleaseCategory::Remix);
        assert_eq!(
            release.folder_name(&config).unwrap(),
            "Massive Attack - 1998 - Mezzanine [Remix] [WEB] [CBR]"
        );
    }

    #[test]
    fn test_folder_name_various_artists() {
        let config = Config::default();
        let mut release = mezzanine();
        for (filename, track) in release.tracks_mut() {
            track.artists = vec![format!("Artist of {filename}")];
        }
        assert_eq!(
            release.folder_name(&config).unwrap(),
            "VA - Mezzanine - 1998 - Massive Attack [CBR]"
        );
    }

    #[test]
    fn test_folder_name_preconditions() {
        let config = Config::default();
        let mut release = mezzanine();
        release.first_track_mut().unwrap().date = None;
        assert!(!release.can_validate_folder_name());
        assert!(matches!(
            release.folder_name(&config),
            Err(crate::Error::FolderNamePrecondition(_))
        ));

        let mut release = mezzanine();
        release.first_track_mut().unwrap().stream_info.tag_type = TagType::Flac;
        assert!(matches!(
            release.folder_name(&config),
            Err(crate::Error::FolderNamePrecondition("codecs are inconsistent"))
        ));
    }

    #[test]
    fn test_serde() {
        let release = mezzanine().with_source(ReleaseSource::Vinyl);
        release.set_violation_count(Some(3));
        let json = serde_json::to_string(&release).unwrap();
        let parsed: Release = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, release);
        assert_eq!(parsed.violation_count(), None);
        assert_eq!(parsed.manual_source(), Some(ReleaseSource::Vinyl));
        assert_eq!(parsed.to_string(), "Massive Attack - 1998 - Mezzanine");
    }
}
