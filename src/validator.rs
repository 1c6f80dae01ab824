// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Rules that detect inconsistent or malformed tags in a release.

use crate::filename::{base_name, DefaultTrackNaming, TrackNaming};
use crate::normalize::{
    find_release_stub, flatten_artists, normalize_artist_name, normalize_str,
    normalize_track_title, split_release_title, strip_release_stubs, ReleaseStub,
};
use crate::oracle::{MetadataOracle, NoOracle, OracleClient};
use crate::release::Release;
use crate::track::Track;
use crate::violation::{Violation, ViolationType, Violations};
use crate::Config;
use itertools::Itertools;

/// A release title prepared for oracle lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LookupTitle {
    /// Normalized title without stubs and edition.
    pub(crate) base: String,
    /// Trailing edition, e.g. `(Deluxe Edition)`, or an empty string.
    pub(crate) edition: String,
    /// Category and source stubs that were removed from the title.
    pub(crate) stubs: Vec<ReleaseStub>,
}

impl LookupTitle {
    /// Split a release title into its parts.
    ///
    /// A title that consists of nothing but disc designations is kept as is.
    pub(crate) fn new(title: &str) -> Self {
        let normalized = match normalize_str(title) {
            normalized if normalized.is_empty() => title.trim().to_string(),
            normalized => normalized,
        };
        let (title, stubs) = strip_release_stubs(&normalized);
        let (base, edition) = split_release_title(&title);
        Self {
            base,
            edition,
            stubs,
        }
    }

    /// The full title with the given base and the original edition.
    pub(crate) fn with_base(&self, base: &str) -> String {
        if self.edition.is_empty() {
            base.to_string()
        } else {
            format!("{base} {}", self.edition)
        }
    }

    /// The full title with the canonical base, keeping the local edition unless the canonical
    /// title has its own.
    pub(crate) fn with_canonical(&self, canonical: &LookupTitle) -> String {
        if canonical.edition.is_empty() {
            self.with_base(&canonical.base)
        } else {
            canonical.with_base(&canonical.base)
        }
    }
}

/// Returns `true` if the value has no uppercase characters.
fn is_lowercase(value: &str) -> bool {
    value.to_lowercase() == value
}

/// Returns `true` if the canonical release title should replace the local one.
///
/// An all-lowercase canonical title never replaces a capitalized local one. Neither does the
/// title of a self-titled release if the local title is something else.
pub(crate) fn accepts_release_title(local: &str, canonical: &str, artists: &[String]) -> bool {
    if canonical.is_empty() || canonical == local {
        return false;
    }

    if is_lowercase(canonical) && !is_lowercase(local) {
        return false;
    }

    let canonical_lower = canonical.to_lowercase();
    let is_artist_name = artists
        .iter()
        .any(|artist| artist.to_lowercase() == canonical_lower);
    !(is_artist_name && local.to_lowercase() != canonical_lower)
}

/// Returns `true` if the canonical date should replace the local one, i.e. it differs and is at
/// least as precise.
pub(crate) fn accepts_date(local: &str, canonical: &str) -> bool {
    canonical != local && canonical.len() >= local.len()
}

/// Returns `true` if the canonical genres should replace the local ones.
pub(crate) fn accepts_genres(local: &[String], canonical: &[String]) -> bool {
    local.len() < 2 && canonical.len() >= 2
}

/// Returns `true` if the canonical track title should replace the local one.
///
/// Blank titles are replaced if the track numbering can be trusted. Otherwise, only all-lowercase
/// titles are replaced, and only by their capitalized equivalent.
pub(crate) fn accepts_track_title(
    local: Option<&str>,
    canonical: &str,
    numbering_valid: bool,
) -> bool {
    match local.filter(|title| !title.is_empty()) {
        None => numbering_valid,
        Some(local) => {
            local != canonical
                && is_lowercase(local)
                && local.to_lowercase() == canonical.to_lowercase()
        }
    }
}

/// Returns `true` if the local track title disagrees with the canonical one.
///
/// Titles that only differ in case are accepted if the local title is capitalized on purpose.
fn is_incorrect_track_title(local: &str, canonical: &str) -> bool {
    let is_stylized = !is_lowercase(local) && local.to_lowercase() == canonical.to_lowercase();
    local != canonical && !is_stylized
}

/// Checks a release against the rules and reports every violation.
///
/// Checks that need canonical metadata only run if an oracle is configured.
#[derive(Debug)]
pub struct ReleaseValidator<'a, O = NoOracle, N = DefaultTrackNaming> {
    /// Configuration (forbidden comments, retry policy).
    config: &'a Config,
    /// Oracle client, if any.
    oracle: Option<OracleClient<'a, O>>,
    /// Derives the expected filenames.
    naming: N,
}

impl<'a> ReleaseValidator<'a> {
    /// Create a validator without oracle.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            oracle: None,
            naming: DefaultTrackNaming,
        }
    }
}

impl<'a, O: MetadataOracle> ReleaseValidator<'a, O> {
    /// Create a validator that also compares the release with the given oracle.
    #[must_use]
    pub fn with_oracle(config: &'a Config, oracle: &'a O) -> Self {
        Self {
            config,
            oracle: Some(OracleClient::new(oracle, &config.oracle)),
            naming: DefaultTrackNaming,
        }
    }
}

impl<'a, O: MetadataOracle, N: TrackNaming> ReleaseValidator<'a, O, N> {
    /// Use a different scheme for the expected filenames.
    #[must_use]
    pub fn with_naming<M: TrackNaming>(self, naming: M) -> ReleaseValidator<'a, O, M> {
        ReleaseValidator {
            config: self.config,
            oracle: self.oracle,
            naming,
        }
    }

    /// Validate a release.
    ///
    /// Violations are ordered by rule and filename, and each distinct violation is only reported
    /// once. The number of violations is stored in the release.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::OracleUpgradeRequired`] if the oracle rejects the client.
    pub async fn validate(&self, release: &Release) -> crate::Result<Vec<Violation>> {
        let mut violations = Violations::new();

        check_whitespace(release, &mut violations);
        check_blank_fields(release, &mut violations);

        let release_artists = release.validate_release_artists();
        let release_title = release.validate_release_title();
        check_consistency(release, &release_artists, release_title.as_deref(), &mut violations);
        if let Some(title) = &release_title {
            check_title_stubs(title, &mut violations);
        }

        if let Some(client) = &self.oracle {
            check_oracle(
                client,
                release,
                &release_artists,
                release_title.as_deref(),
                &mut violations,
            )
            .await?;
            check_track_artists(client, release, &mut violations).await?;
        }

        check_structure(release, &mut violations);
        self.check_filenames(release, &mut violations);
        self.check_comments(release, &mut violations);

        log::debug!("Release '{release}' has {} violations", violations.len());
        release.set_violation_count(Some(violations.len()));
        Ok(violations.into_vec())
    }

    /// Every file must be named after its tags.
    fn check_filenames(&self, release: &Release, violations: &mut Violations) {
        let is_va = release.is_va();
        for (path, track) in release.tracks() {
            let filename = base_name(path);
            match self.naming.expected_filename(track, is_va) {
                Some(expected) if expected == filename => (),
                Some(expected) => violations.add(
                    ViolationType::InvalidFilename,
                    format!("Invalid filename: {filename} (should be {expected})"),
                ),
                None => log::debug!("Cannot derive the expected filename for '{path}'"),
            }
        }
    }

    /// Comments must not contain forbidden substrings.
    fn check_comments(&self, release: &Release, violations: &mut Violations) {
        for (filename, track) in release.tracks() {
            if track
                .comment
                .as_deref()
                .is_some_and(|comment| self.config.rules.is_forbidden_comment(comment))
            {
                violations.add(
                    ViolationType::ForbiddenComment,
                    format!("File '{filename}' has a forbidden Comment"),
                );
            }
        }
    }
}

/// Fields without surrounding whitespace.
fn check_whitespace(release: &Release, violations: &mut Violations) {
    let fields: [(&str, fn(&Track) -> bool); 6] = [
        ("Artist(s)", |track| Track::has_untrimmed_entries(&track.artists)),
        ("Album/Release Artist(s)", |track| {
            Track::has_untrimmed_entries(&track.release_artists)
        }),
        ("Year/Date", |track| Track::has_padded_value(track.date.as_ref())),
        ("Album/Release Title", |track| {
            Track::has_padded_value(track.release_title.as_ref())
        }),
        ("Track Title", |track| {
            Track::has_padded_value(track.track_title.as_ref())
        }),
        ("Genre(s)", |track| Track::has_untrimmed_entries(&track.genres)),
    ];

    for (field, is_padded) in fields {
        for (filename, track) in release.tracks() {
            if is_padded(track) {
                violations.add(
                    ViolationType::Whitespace,
                    format!("File '{filename}' has leading/trailing whitespace in its {field}"),
                );
            }
        }
    }
}

/// Every track needs artists and a title.
fn check_blank_fields(release: &Release, violations: &mut Violations) {
    let blank_artists = release.blank_artists();
    if blank_artists > 0 {
        violations.add(
            ViolationType::BlankArtists,
            format!("Release contains {blank_artists} tracks with missing 'Artist' tags"),
        );
    }

    let blank_titles = release.blank_track_titles();
    if blank_titles > 0 {
        violations.add(
            ViolationType::BlankTrackTitles,
            format!("Release contains {blank_titles} tracks with missing 'Track Title' tags"),
        );
    }
}

/// Release-wide fields must be the same on every track.
fn check_consistency(
    release: &Release,
    release_artists: &[String],
    release_title: Option<&str>,
    violations: &mut Violations,
) {
    if release.validate_release_date().is_none() {
        violations.add(
            ViolationType::InconsistentDate,
            "Release contains blank or inconsistent 'Date' tags",
        );
    }

    if release_artists.is_empty() {
        violations.add(
            ViolationType::InconsistentReleaseArtists,
            "Release contains blank or inconsistent 'Album/Release Artist' tags",
        );
    }

    if release_title.is_none() {
        violations.add(
            ViolationType::InconsistentReleaseTitle,
            "Release contains blank or inconsistent 'Album/Release Title' tags",
        );
    }
}

/// The release title must not contain the category or source.
fn check_title_stubs(title: &str, violations: &mut Violations) {
    if let Some((_, stub)) = find_release_stub(title) {
        violations.add(
            ViolationType::ReleaseTitleStub,
            format!("Album/Release Title '{title}' contains the designation '{stub}'"),
        );
    }
}

/// Compare the release with the canonical metadata.
///
/// Release-level checks are skipped unless all release artists are known to the oracle.
async fn check_oracle<O: MetadataOracle>(
    client: &OracleClient<'_, O>,
    release: &Release,
    release_artists: &[String],
    release_title: Option<&str>,
    violations: &mut Violations,
) -> crate::Result<()> {
    if release_artists.is_empty() {
        return Ok(());
    }

    let lookup_names = release_artists.iter().map(|artist| artist.trim()).collect::<Vec<_>>();
    let Some(canonical_artists) = client.all_artists(&lookup_names).await? else {
        return Ok(());
    };
    for (artist, canonical) in release_artists.iter().zip(&canonical_artists) {
        if canonical.name != *artist {
            violations.add(
                ViolationType::IncorrectReleaseArtist,
                format!(
                    "Incorrectly spelled Album/Release Artist '{artist}' (should be '{}')",
                    canonical.name
                ),
            );
        }
    }

    let Some(title) = release_title else {
        return Ok(());
    };
    let artists = canonical_artists
        .into_iter()
        .map(|artist| artist.name)
        .unique()
        .collect::<Vec<_>>();
    let title = LookupTitle::new(title);
    let Some(canonical) = client
        .release(&flatten_artists(&artists), &title.base)
        .await?
    else {
        return Ok(());
    };

    let canonical_title = LookupTitle::new(&canonical.title);
    if accepts_release_title(&title.base, &canonical_title.base, &artists) {
        violations.add(
            ViolationType::IncorrectReleaseTitle,
            format!(
                "Incorrectly spelled Album/Release Title '{}' (should be '{}')",
                title.base, canonical_title.base
            ),
        );
    }

    if let Some(canonical_date) = &canonical.date {
        let date = release
            .first_track()
            .and_then(|track| track.date.as_deref())
            .unwrap_or_default();
        if accepts_date(date, canonical_date) {
            violations.add(
                ViolationType::IncorrectDate,
                format!("Incorrect Release Date '{date}' (should be '{canonical_date}')"),
            );
        }
    }

    let genres = release.validate_genres();
    let canonical_genres = client.genres(&canonical, &artists, &title.base).await?;
    if accepts_genres(&genres, &canonical_genres) {
        violations.add(
            ViolationType::IncorrectGenres,
            format!(
                "Bad release genres: [{}] (should be [{}])",
                genres.join(", "),
                canonical_genres.join(", ")
            ),
        );
    }

    for track in release.tracks().values() {
        let Some(canonical_title) = track
            .track_number
            .and_then(|number| canonical.tracks.get(&number))
        else {
            continue;
        };
        let Some(track_title) = track.track_title.as_deref().filter(|title| !title.is_empty())
        else {
            continue;
        };

        let canonical_title = normalize_track_title(canonical_title);
        if is_incorrect_track_title(track_title, &canonical_title) {
            violations.add(
                ViolationType::IncorrectTrackTitle,
                format!("Incorrect Track Title '{track_title}' (should be '{canonical_title}')"),
            );
        }
    }

    Ok(())
}

/// Track artists must be spelled like their canonical names.
///
/// Runs regardless of whether the release itself is known to the oracle.
async fn check_track_artists<O: MetadataOracle>(
    client: &OracleClient<'_, O>,
    release: &Release,
    violations: &mut Violations,
) -> crate::Result<()> {
    for track in release.tracks().values() {
        for artist in track.artists.iter().filter(|artist| !artist.trim().is_empty()) {
            let Some(canonical) = client.artist(&normalize_artist_name(artist)).await? else {
                continue;
            };
            if canonical.name != *artist {
                violations.add(
                    ViolationType::IncorrectTrackArtist,
                    format!(
                        "Incorrectly spelled Track Artist '{artist}' (should be '{}')",
                        canonical.name
                    ),
                );
            }
        }
    }

    Ok(())
}

/// Track and disc numbering, tag types and codecs.
fn check_structure(release: &Release, violations: &mut Violations) {
    let incomplete_discs = release.validate_track_numbers();
    if !incomplete_discs.is_empty() {
        let discs = incomplete_discs
            .iter()
            .map(|(disc, numbers)| format!("Disc {disc}: {}", numbers.iter().join(",")))
            .join("; ");
        violations.add(
            ViolationType::IncompleteTrackNumbers,
            format!("Release does not have a full set of tracks ({discs})"),
        );
    }

    for disc in release.validate_total_tracks() {
        violations.add(
            ViolationType::IncorrectTotalTracks,
            format!("Release disc {disc} has blank, inconsistent or incorrect 'Total Tracks' tags"),
        );
    }

    let discs = release.validate_disc_numbers();
    if !discs.is_empty() {
        violations.add(
            ViolationType::IncompleteDiscNumbers,
            format!("Release does not have a full set of discs: {}", discs.iter().join(", ")),
        );
    }

    if !release.validate_total_discs() {
        violations.add(
            ViolationType::IncorrectTotalDiscs,
            "Release has blank, inconsistent or incorrect 'Total Discs' tags",
        );
    }

    let tag_types = release.tag_types();
    if tag_types.len() > 1 {
        violations.add(
            ViolationType::MixedTagTypes,
            format!("Release has a mixture of tag types: {}", tag_types.iter().join(", ")),
        );
    }

    let codecs = release.codecs();
    if codecs.len() > 1 {
        violations.add(
            ViolationType::MixedCodecs,
            format!("Release has mismatched codecs: [{}]", codecs.join(", ")),
        );
    }

    let bitrates = release.cbr_bitrates();
    if bitrates.len() > 1 {
        violations.add(
            ViolationType::MixedCbrBitrates,
            format!("Release has a mixture of CBR bitrates: {}", bitrates.iter().join(", ")),
        );
    }
}
