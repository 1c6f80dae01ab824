// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! In-memory oracle backed by a JSON file.

use super::{GenreTag, MetadataOracle, OracleArtist, OracleError, OracleRelease};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A release entry of a [`StaticOracle`].
#[derive(Debug, Clone, Deserialize, Serialize)]
struct StaticRelease {
    /// Flattened artist credit (e.g. `Massive Attack & Mad Professor`).
    artist: String,
    /// The release metadata.
    release: OracleRelease,
}

/// Oracle that answers from a fixed set of artists and releases.
///
/// Lookups ignore case, so the oracle canonicalizes spelling the way a real service would.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StaticOracle {
    /// Known artists.
    #[serde(default)]
    artists: Vec<OracleArtist>,
    /// Known releases.
    #[serde(default)]
    releases: Vec<StaticRelease>,
}

impl StaticOracle {
    /// Load the oracle contents from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or doesn't contain a valid oracle description.
    pub fn load_from_path<T: AsRef<Path>>(path: T) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let oracle = serde_json::from_str(&text)?;
        Ok(oracle)
    }

    /// Add an artist.
    #[must_use]
    pub fn with_artist(mut self, name: impl Into<String>, tags: Vec<GenreTag>) -> Self {
        self.artists.push(OracleArtist {
            name: name.into(),
            tags,
        });
        self
    }

    /// Add a release.
    #[must_use]
    pub fn with_release(mut self, artist: impl Into<String>, release: OracleRelease) -> Self {
        self.releases.push(StaticRelease {
            artist: artist.into(),
            release,
        });
        self
    }
}

impl MetadataOracle for StaticOracle {
    async fn get_artist(&self, name: &str) -> Result<OracleArtist, OracleError> {
        self.artists
            .iter()
            .find(|artist| artist.name.to_lowercase() == name.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| OracleError::ArtistNotFound(name.to_string()))
    }

    async fn get_release(&self, artist: &str, title: &str) -> Result<OracleRelease, OracleError> {
        let artist_key = artist.trim().to_lowercase();
        let title_key = title.trim().to_lowercase();
        self.releases
            .iter()
            .find(|entry| {
                entry.artist.to_lowercase() == artist_key
                    && entry.release.title.to_lowercase() == title_key
            })
            .map(|entry| entry.release.clone())
            .ok_or_else(|| OracleError::ReleaseNotFound {
                artist: artist.to_string(),
                title: title.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ORACLE_JSON: &str = r#"{
        "artists": [
            {"name": "Massive Attack", "tags": [{"name": "trip-hop", "weight": 100}]}
        ],
        "releases": [
            {
                "artist": "Massive Attack",
                "release": {
                    "title": "Mezzanine",
                    "date": "1998-04-20",
                    "tracks": {"1": "Angel", "2": "Risingson"}
                }
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ORACLE_JSON.as_bytes()).unwrap();
        let oracle = StaticOracle::load_from_path(file.path()).unwrap();

        let artist = oracle.get_artist("massive attack").await.unwrap();
        assert_eq!(artist.name, "Massive Attack");
        assert_eq!(artist.tags[0].weight, 100);

        let release = oracle.get_release("MASSIVE ATTACK", "mezzanine").await.unwrap();
        assert_eq!(release.title, "Mezzanine");
        assert_eq!(release.date.as_deref(), Some("1998-04-20"));
        assert_eq!(release.tracks.get(&2).map(String::as_str), Some("Risingson"));
        assert!(release.tags.is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let oracle = StaticOracle::default();
        assert_eq!(
            oracle.get_artist("Nobody").await,
            Err(OracleError::ArtistNotFound("Nobody".to_string()))
        );
        assert!(matches!(
            oracle.get_release("Nobody", "Nothing").await,
            Err(OracleError::ReleaseNotFound { .. })
        ));
    }
}
