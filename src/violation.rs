// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Detected problems with a release.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The kind of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ViolationType {
    /// A field has leading or trailing whitespace.
    Whitespace,
    /// Some tracks have no artists.
    BlankArtists,
    /// Some tracks have no track title.
    BlankTrackTitles,
    /// The date is blank or differs between tracks.
    InconsistentDate,
    /// The release artists are blank or differ between tracks.
    InconsistentReleaseArtists,
    /// The release title is blank or differs between tracks.
    InconsistentReleaseTitle,
    /// The release title contains a category or source designation.
    ReleaseTitleStub,
    /// A release artist is not spelled the canonical way.
    IncorrectReleaseArtist,
    /// The release title is not spelled the canonical way.
    IncorrectReleaseTitle,
    /// The canonical release date differs.
    IncorrectDate,
    /// The release is missing genres that the metadata oracle knows.
    IncorrectGenres,
    /// A track title is not spelled the canonical way.
    IncorrectTrackTitle,
    /// A track artist is not spelled the canonical way.
    IncorrectTrackArtist,
    /// A disc has gaps in its track numbers.
    IncompleteTrackNumbers,
    /// A disc has blank, inconsistent or incorrect total tracks.
    IncorrectTotalTracks,
    /// The disc numbers have gaps.
    IncompleteDiscNumbers,
    /// The total discs are blank, inconsistent or incorrect.
    IncorrectTotalDiscs,
    /// The files use different tag containers.
    MixedTagTypes,
    /// The files use different codec settings.
    MixedCodecs,
    /// The files use different constant bitrates.
    MixedCbrBitrates,
    /// A file is not named after its tags.
    InvalidFilename,
    /// A comment contains a forbidden substring.
    ForbiddenComment,
}

/// A single problem found in a release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Violation {
    /// What kind of problem this is.
    pub kind: ViolationType,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    #[must_use]
    pub fn new(kind: ViolationType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Violations in the order they were found, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    /// The violations, in insertion order.
    items: Vec<Violation>,
    /// Membership index for `items`.
    seen: HashSet<Violation>,
}

impl Violations {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation. Returns `false` if an equal violation was added before.
    pub fn insert(&mut self, violation: Violation) -> bool {
        if self.seen.contains(&violation) {
            return false;
        }
        let _ = self.seen.insert(violation.clone());
        self.items.push(violation);
        true
    }

    /// Shorthand for inserting a new [`Violation`].
    pub fn add(&mut self, kind: ViolationType, message: impl Into<String>) {
        let _ = self.insert(Violation::new(kind, message));
    }

    /// Number of distinct violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no violation was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the violations in insertion order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.items.iter()
    }

    /// Convert into an ordered list.
    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
