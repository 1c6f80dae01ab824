// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Canonical artist and release metadata from an external source.

mod client;
mod fixture;

pub use client::OracleClient;
pub use fixture::StaticOracle;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;

/// A user-submitted tag with a popularity weight.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenreTag {
    /// Tag name.
    pub name: String,
    /// Popularity (higher is more popular).
    pub weight: u32,
}

/// An artist as known by the metadata oracle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OracleArtist {
    /// Canonical spelling of the artist name.
    pub name: String,
    /// Tags, most popular first.
    #[serde(default)]
    pub tags: Vec<GenreTag>,
}

/// A release as known by the metadata oracle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct OracleRelease {
    /// Canonical spelling of the release title.
    pub title: String,
    /// Release date (`YYYY` or `YYYY-MM-DD`), if known.
    #[serde(default)]
    pub date: Option<String>,
    /// Track titles by track number.
    #[serde(default)]
    pub tracks: BTreeMap<u32, String>,
    /// Tags, most popular first.
    #[serde(default)]
    pub tags: Vec<GenreTag>,
}

/// The metadata oracle can't be reached right now.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// The connection failed.
    #[error("connection failed")]
    Connection,
    /// The server reported an error.
    #[error("server error")]
    ServerError,
    /// The server no longer supports this client.
    #[error("client upgrade required")]
    UpgradeRequired,
}

/// Errors returned by a [`MetadataOracle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// No artist with this name exists.
    #[error("Artist '{0}' not found")]
    ArtistNotFound(String),
    /// No release with this artist and title exists.
    #[error("Release '{artist} - {title}' not found")]
    ReleaseNotFound {
        /// Artist that was searched for.
        artist: String,
        /// Title that was searched for.
        title: String,
    },
    /// The oracle is not available.
    #[error("Metadata oracle unavailable: {0}")]
    Unavailable(#[from] Unavailable),
}

/// Source of canonical artist and release metadata.
///
/// Implementations perform a single request per call. Retrying is handled by [`OracleClient`].
pub trait MetadataOracle {
    /// Look up an artist by name.
    fn get_artist(&self, name: &str) -> impl Future<Output = Result<OracleArtist, OracleError>>;

    /// Look up a release by its (flattened) artist and title.
    fn get_release(
        &self,
        artist: &str,
        title: &str,
    ) -> impl Future<Output = Result<OracleRelease, OracleError>>;
}

/// An oracle that knows nothing. Used when no oracle is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

impl MetadataOracle for NoOracle {
    async fn get_artist(&self, name: &str) -> Result<OracleArtist, OracleError> {
        Err(OracleError::ArtistNotFound(name.to_string()))
    }

    async fn get_release(&self, artist: &str, title: &str) -> Result<OracleRelease, OracleError> {
        Err(OracleError::ReleaseNotFound {
            artist: artist.to_string(),
            title: title.to_string(),
        })
    }
}
