// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Automated repair of release tags.

use crate::filename::{base_name, extract_disc_number, extract_release_year, extract_track_disc};
use crate::normalize::{
    differs_only_cosmetically, flatten_artists, normalize_artist_name, normalize_track_title,
    ReleaseStub,
};
use crate::oracle::{MetadataOracle, NoOracle, OracleClient, OracleRelease};
use crate::release::Release;
use crate::track::is_blank;
use crate::util::current_year;
use crate::validator::{
    accepts_date, accepts_genres, accepts_release_title, accepts_track_title, LookupTitle,
};
use crate::Config;
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};

/// Repairs the tags of a release.
///
/// The repair never modifies the release it is given and never gives up halfway: steps that
/// can't be applied (e.g. because the oracle does not know the release) are skipped. Running it on
/// its own output changes nothing.
#[derive(Debug)]
pub struct ReleaseFixer<'a, O = NoOracle> {
    /// Configuration (forbidden comments, retry policy).
    config: &'a Config,
    /// Oracle client, if any.
    oracle: Option<OracleClient<'a, O>>,
}

impl<'a> ReleaseFixer<'a> {
    /// Create a fixer without oracle.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            oracle: None,
        }
    }
}

impl<'a, O: MetadataOracle> ReleaseFixer<'a, O> {
    /// Create a fixer that canonicalizes the release with the given oracle.
    #[must_use]
    pub fn with_oracle(config: &'a Config, oracle: &'a O) -> Self {
        Self {
            config,
            oracle: Some(OracleClient::new(oracle, &config.oracle)),
        }
    }

    /// Return a repaired copy of the release.
    ///
    /// The `folder_name` is the name of the directory that contains the files. It is used to
    /// recover the release year if no track has a date.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::OracleUpgradeRequired`] if the oracle rejects the client.
    pub async fn fix(&self, release: &Release, folder_name: &str) -> crate::Result<Release> {
        let mut fixed = release.clone();
        fixed.set_violation_count(None);

        trim_whitespace(&mut fixed);
        numbers_from_filenames(&mut fixed);
        date_from_folder_name(&mut fixed, folder_name);
        disc_numbers_from_paths(&mut fixed);
        normalize_track_titles(&mut fixed);
        let release_artists = normalize_release_artists(&mut fixed);
        let title = strip_title_stubs(&mut fixed);

        if let Some(client) = &self.oracle {
            apply_oracle(client, &mut fixed, &release_artists, title.as_ref()).await?;
        }

        if fixed.resequence_track_numbers() {
            log::debug!("Renumbered tracks per disc");
        }
        fill_total_tracks(&mut fixed);
        fill_disc_numbers(&mut fixed);
        self.remove_forbidden_comments(&mut fixed);

        log::info!("Fixed release '{fixed}'");
        Ok(fixed)
    }

    /// Comments with forbidden substrings are removed.
    fn remove_forbidden_comments(&self, release: &mut Release) {
        for (filename, track) in release.tracks_mut() {
            if track
                .comment
                .as_deref()
                .is_some_and(|comment| self.config.rules.is_forbidden_comment(comment))
            {
                log::debug!("Removing forbidden comment from '{filename}'");
                track.comment = None;
            }
        }
    }
}

/// Remove surrounding whitespace from all fields.
fn trim_whitespace(release: &mut Release) {
    for (_, track) in release.tracks_mut() {
        track.artists = track.trimmed_artists();
        track.release_artists = track.trimmed_release_artists();
        track.date = track.trimmed_date();
        track.release_title = track.trimmed_release_title();
        track.track_title = track.trimmed_track_title();
        track.genres = track.trimmed_genres();
        track.comment = track.comment.as_deref().map(|comment| comment.trim().to_string());
    }
}

/// Take track and disc numbers from the filenames.
///
/// Missing numbers are filled in. If the numbering is invalid, the filenames are trusted more than
/// the tags and existing numbers are overwritten.
fn numbers_from_filenames(release: &mut Release) {
    let overwrite = !release.validate_track_numbers().is_empty();
    for (path, track) in release.tracks_mut() {
        let (track_number, disc_number) = extract_track_disc(base_name(path));
        if track_number.is_some() && (overwrite || track.track_number.is_none()) {
            track.track_number = track_number;
        }
        if disc_number.is_some() && (overwrite || track.disc_number.is_none()) {
            track.disc_number = disc_number;
        }
    }
}

/// Take the release year from the folder name for tracks without date.
fn date_from_folder_name(release: &mut Release, folder_name: &str) {
    let Some(year) = extract_release_year(folder_name, current_year()) else {
        return;
    };

    for (filename, track) in release.tracks_mut() {
        if is_blank(track.date.as_deref()) {
            log::debug!("Using year {year} from folder name for '{filename}'");
            track.date = Some(year.to_string());
        }
    }
}

/// Take missing disc numbers from the file path (e.g. `CD2/01 - Title.mp3`).
fn disc_numbers_from_paths(release: &mut Release) {
    for (path, track) in release.tracks_mut() {
        if track.disc_number.is_none() {
            track.disc_number = extract_disc_number(path);
        }
    }
}

/// Apply canonical spelling to track titles if that only changes case or spacing.
fn normalize_track_titles(release: &mut Release) {
    for (_, track) in release.tracks_mut() {
        let Some(title) = &track.track_title else {
            continue;
        };
        let normalized = normalize_track_title(title);
        if normalized != *title && differs_only_cosmetically(&normalized, title) {
            track.track_title = Some(normalized);
        }
    }
}

/// Make the release artists the same on all tracks.
///
/// If the tracks disagree, the artists of the first track are used. Returns the release artists.
fn normalize_release_artists(release: &mut Release) -> Vec<String> {
    let mut artists = release.validate_release_artists();
    if artists.is_empty() {
        artists = release
            .first_track()
            .map(|track| track.artists.clone())
            .unwrap_or_default();
    }

    if !artists.is_empty() {
        for (_, track) in release.tracks_mut() {
            track.release_artists.clone_from(&artists);
        }
    }
    artists
}

/// Remove category and source designations from the release title.
///
/// The designations are kept as category and source, unless these were set before. Returns the
/// title for oracle lookups.
fn strip_title_stubs(release: &mut Release) -> Option<LookupTitle> {
    let title = LookupTitle::new(&release.validate_release_title()?);
    adopt_stubs(release, &title.stubs);
    set_release_title(release, &title.with_base(&title.base));
    Some(title)
}

/// Use title designations as category and source, unless these were set before.
fn adopt_stubs(release: &mut Release, stubs: &[ReleaseStub]) {
    for stub in stubs {
        match *stub {
            ReleaseStub::Category(category) if release.manual_category().is_none() => {
                release.set_category(Some(category));
            }
            ReleaseStub::Source(source) if release.manual_source().is_none() => {
                release.set_source(Some(source));
            }
            _ => (),
        }
    }
}

/// Set the release title on all tracks.
fn set_release_title(release: &mut Release, title: &str) {
    for (_, track) in release.tracks_mut() {
        if track.release_title.as_deref() != Some(title) {
            track.release_title = Some(title.to_string());
        }
    }
}

/// Canonicalize the release with the oracle.
async fn apply_oracle<O: MetadataOracle>(
    client: &OracleClient<'_, O>,
    release: &mut Release,
    release_artists: &[String],
    title: Option<&LookupTitle>,
) -> crate::Result<()> {
    let artists = if release_artists.is_empty() {
        None
    } else {
        client.all_artists(release_artists).await?
    };
    let artists = artists.map(|artists| {
        artists
            .into_iter()
            .map(|artist| artist.name)
            .unique()
            .collect::<Vec<_>>()
    });

    if let Some(artists) = &artists {
        for (_, track) in release.tracks_mut() {
            track.release_artists.clone_from(artists);
        }

        if let Some(title) = title {
            if let Some(canonical) = client.release(&flatten_artists(artists), &title.base).await? {
                apply_canonical_release(client, release, artists, title, &canonical).await?;
            }
        }
    }

    canonicalize_track_artists(client, release).await
}

/// Apply title, date, genres and track titles of the canonical release.
async fn apply_canonical_release<O: MetadataOracle>(
    client: &OracleClient<'_, O>,
    release: &mut Release,
    artists: &[String],
    title: &LookupTitle,
    canonical: &OracleRelease,
) -> crate::Result<()> {
    let canonical_title = LookupTitle::new(&canonical.title);
    if accepts_release_title(&title.base, &canonical_title.base, artists) {
        let new_title = title.with_canonical(&canonical_title);
        log::debug!("Changing release title '{}' to '{new_title}'", title.base);
        adopt_stubs(release, &canonical_title.stubs);
        set_release_title(release, &new_title);
    }

    if let Some(canonical_date) = &canonical.date {
        for (_, track) in release.tracks_mut() {
            if accepts_date(track.date.as_deref().unwrap_or_default(), canonical_date) {
                track.date = Some(canonical_date.clone());
            }
        }
    }

    let genres = client.genres(canonical, artists, &title.base).await?;
    if accepts_genres(&release.validate_genres(), &genres) {
        log::debug!("Setting genres to [{}]", genres.join(", "));
        for (_, track) in release.tracks_mut() {
            track.genres.clone_from(&genres);
        }
    }

    numbers_from_titles(release, &canonical.tracks);
    titles_from_numbers(release, &canonical.tracks);
    Ok(())
}

/// Fill missing track numbers by looking up the track title in the canonical track list.
///
/// A number is only used if exactly one canonical track has that title and no other track has the
/// number yet.
fn numbers_from_titles(release: &mut Release, canonical_tracks: &BTreeMap<u32, String>) {
    let mut used = release
        .tracks()
        .values()
        .filter_map(|track| track.track_number)
        .collect::<HashSet<_>>();

    for (filename, track) in release.tracks_mut() {
        if track.track_number.is_some() {
            continue;
        }
        let Some(title) = track.track_title.as_deref().filter(|title| !title.is_empty()) else {
            continue;
        };

        let key = normalize_track_title(title).to_lowercase();
        let matches = canonical_tracks
            .iter()
            .filter(|(_, canonical)| normalize_track_title(canonical).to_lowercase() == key)
            .map(|(number, _)| *number)
            .collect::<Vec<_>>();
        if let [number] = matches.as_slice() {
            if used.insert(*number) {
                log::debug!("Track '{filename}' is track number {number}");
                track.track_number = Some(*number);
            }
        }
    }
}

/// Take track titles from the canonical track list.
fn titles_from_numbers(release: &mut Release, canonical_tracks: &BTreeMap<u32, String>) {
    let numbering_valid = release.validate_track_numbers().is_empty();
    for (_, track) in release.tracks_mut() {
        let Some(canonical) = track
            .track_number
            .and_then(|number| canonical_tracks.get(&number))
        else {
            continue;
        };

        let canonical = normalize_track_title(canonical);
        if accepts_track_title(track.track_title.as_deref(), &canonical, numbering_valid) {
            track.track_title = Some(canonical);
        }
    }
}

/// Canonicalize the artists of each track.
///
/// A track keeps its artists unless all of them are known to the oracle.
async fn canonicalize_track_artists<O: MetadataOracle>(
    client: &OracleClient<'_, O>,
    release: &mut Release,
) -> crate::Result<()> {
    for (filename, track) in release.tracks_mut() {
        if track.artists.is_empty() {
            continue;
        }

        let names = track
            .artists
            .iter()
            .map(|artist| normalize_artist_name(artist))
            .collect::<Vec<_>>();
        let Some(artists) = client.all_artists(&names).await? else {
            log::debug!("Keeping artists of '{filename}'");
            continue;
        };
        track.artists = artists.into_iter().map(|artist| artist.name).unique().collect();
    }
    Ok(())
}

/// Fill missing total tracks from the per-disc track counts.
fn fill_total_tracks(release: &mut Release) {
    let totals = release.get_total_tracks();
    for (_, track) in release.tracks_mut() {
        if track.total_tracks.is_none() {
            track.total_tracks = totals.get(&track.disc_number_or_default()).copied().flatten();
        }
    }
}

/// Fix disc numbers and total discs.
///
/// A release that only has a single disc gets disc number 1. Total discs are taken from the
/// highest disc number if they are wrong.
fn fill_disc_numbers(release: &mut Release) {
    let discs_invalid =
        !release.validate_disc_numbers().is_empty() || !release.validate_total_discs();
    if discs_invalid && release.get_total_tracks().len() == 1 {
        for (_, track) in release.tracks_mut() {
            track.disc_number = Some(1);
        }
    }

    if !release.validate_total_discs() {
        if let Some(total_discs) = release.get_total_discs() {
            for (_, track) in release.tracks_mut() {
                track.total_discs = Some(total_discs);
            }
        }
    }
}
