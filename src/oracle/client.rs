// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Oracle client with retry handling.

use super::{MetadataOracle, OracleArtist, OracleError, OracleRelease, Unavailable};
use crate::config::OracleConfig;
use crate::genre::{filter_tags, merge_tags};
use std::future::Future;
use std::time::Duration;

/// Wraps a [`MetadataOracle`] and retries requests that failed because the oracle was
/// unavailable.
///
/// Lookups for unknown artists or releases return `Ok(None)`. If the oracle demands a client
/// upgrade, [`crate::Error::OracleUpgradeRequired`] is returned and the caller must stop.
#[derive(Debug)]
pub struct OracleClient<'a, O> {
    /// The wrapped oracle.
    oracle: &'a O,
    /// Retry policy.
    config: OracleConfig,
}

impl<'a, O: MetadataOracle> OracleClient<'a, O> {
    /// Create a new client.
    #[must_use]
    pub fn new(oracle: &'a O, config: &OracleConfig) -> Self {
        Self {
            oracle,
            config: *config,
        }
    }

    /// Look up an artist.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::OracleUpgradeRequired`] if the oracle rejects this client.
    pub async fn artist(&self, name: &str) -> crate::Result<Option<OracleArtist>> {
        self.with_retry(&format!("artist '{name}'"), || self.oracle.get_artist(name))
            .await
    }

    /// Look up a release.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::OracleUpgradeRequired`] if the oracle rejects this client.
    pub async fn release(&self, artist: &str, title: &str) -> crate::Result<Option<OracleRelease>> {
        self.with_retry(&format!("release '{artist} - {title}'"), || {
            self.oracle.get_release(artist, title)
        })
        .await
    }

    /// Look up all artists. Returns `None` unless every artist is known.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::OracleUpgradeRequired`] if the oracle rejects this client.
    pub async fn all_artists<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> crate::Result<Option<Vec<OracleArtist>>> {
        let mut artists = Vec::with_capacity(names.len());
        for name in names {
            match self.artist(name.as_ref()).await? {
                Some(artist) => artists.push(artist),
                None => return Ok(None),
            }
        }
        Ok(Some(artists))
    }

    /// Genres for a release, cleaned up and capitalized.
    ///
    /// The release's own tags are preferred. If none of them survive the cleanup, the tags of the
    /// release artists are used instead.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::Error::OracleUpgradeRequired`] if the oracle rejects this client.
    pub async fn genres(
        &self,
        release: &OracleRelease,
        artists: &[String],
        title: &str,
    ) -> crate::Result<Vec<String>> {
        let ignore = artists
            .iter()
            .map(String::as_str)
            .chain([title])
            .collect::<Vec<_>>();

        let mut tags = filter_tags(&release.tags, &ignore, true);
        if tags.is_empty() {
            let mut artist_tags = Vec::with_capacity(artists.len());
            for artist in artists {
                if let Some(artist) = self.artist(artist).await? {
                    artist_tags.push(artist.tags);
                }
            }
            tags = filter_tags(&merge_tags(&artist_tags), &ignore, true);
        }

        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }

    /// Run a request until it succeeds, the requested item is not found or the retry policy is
    /// exhausted.
    async fn with_retry<T, F, Fut>(&self, what: &str, mut request: F) -> crate::Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OracleError>>,
    {
        let mut delay = self.config.retry_delay();
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match request().await {
                Ok(value) => return Ok(Some(value)),
                Err(OracleError::ArtistNotFound(_) | OracleError::ReleaseNotFound { .. }) => {
                    log::debug!("Metadata oracle does not know {what}");
                    return Ok(None);
                }
                Err(OracleError::Unavailable(Unavailable::UpgradeRequired)) => {
                    log::error!("Metadata oracle requires a client upgrade");
                    return Err(crate::Error::OracleUpgradeRequired);
                }
                Err(OracleError::Unavailable(err)) => {
                    if self
                        .config
                        .max_attempts()
                        .is_some_and(|max_attempts| attempt >= max_attempts)
                    {
                        log::warn!("Giving up on {what} after {attempt} attempts ({err})");
                        return Ok(None);
                    }

                    log::warn!("Failed to look up {what} ({err}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    delay = self.next_delay(delay);
                }
            }
        }
    }

    /// Delay before the attempt after the one that waited `delay`.
    fn next_delay(&self, delay: Duration) -> Duration {
        let max_delay = self.config.max_retry_delay();
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.config.backoff_factor())
            .map_or(max_delay, |next| next.min(max_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{GenreTag, StaticOracle};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails a number of times before it returns a result.
    struct FlakyOracle {
        failures: AtomicU32,
        error: Unavailable,
    }

    impl FlakyOracle {
        fn new(failures: u32, error: Unavailable) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                error,
            }
        }

        fn fail(&self) -> Option<OracleError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining == 0 {
                return None;
            }
            self.failures.store(remaining - 1, Ordering::SeqCst);
            Some(self.error.into())
        }
    }

    impl MetadataOracle for FlakyOracle {
        async fn get_artist(&self, name: &str) -> Result<OracleArtist, OracleError> {
            if let Some(err) = self.fail() {
                return Err(err);
            }
            Ok(OracleArtist {
                name: name.to_uppercase(),
                tags: vec![],
            })
        }

        async fn get_release(
            &self,
            artist: &str,
            title: &str,
        ) -> Result<OracleRelease, OracleError> {
            Err(OracleError::ReleaseNotFound {
                artist: artist.to_string(),
                title: title.to_string(),
            })
        }
    }

    fn fast_retries(max_attempts: u32) -> OracleConfig {
        OracleConfig {
            retry_delay_ms: Some(1),
            max_attempts: Some(max_attempts),
            backoff_factor: Some(1.0),
            max_retry_delay_ms: Some(5),
        }
    }

    fn tag(name: &str, weight: u32) -> GenreTag {
        GenreTag {
            name: name.to_string(),
            weight,
        }
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let oracle = FlakyOracle::new(3, Unavailable::ServerError);
        let client = OracleClient::new(&oracle, &fast_retries(0));
        let artist = client.artist("massive attack").await.unwrap();
        assert_eq!(artist.unwrap().name, "MASSIVE ATTACK");
        assert_eq!(oracle.failures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bounded_retries_give_up() {
        let oracle = FlakyOracle::new(5, Unavailable::Connection);
        let client = OracleClient::new(&oracle, &fast_retries(2));
        assert_eq!(client.artist("massive attack").await.unwrap(), None);
        assert_eq!(oracle.failures.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_upgrade_required_is_fatal() {
        let oracle = FlakyOracle::new(1, Unavailable::UpgradeRequired);
        let client = OracleClient::new(&oracle, &fast_retries(0));
        assert!(matches!(
            client.artist("massive attack").await,
            Err(crate::Error::OracleUpgradeRequired)
        ));
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let oracle = FlakyOracle::new(0, Unavailable::ServerError);
        let client = OracleClient::new(&oracle, &fast_retries(0));
        assert_eq!(client.release("Massive Attack", "Nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_all_artists_requires_every_artist() {
        let oracle = StaticOracle::default()
            .with_artist("Massive Attack", vec![])
            .with_artist("Elizabeth Fraser", vec![]);
        let client = OracleClient::new(&oracle, &fast_retries(1));

        let artists = client
            .all_artists(&["massive attack", "elizabeth fraser"])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artists[1].name, "Elizabeth Fraser");
        assert_eq!(
            client
                .all_artists(&["Massive Attack", "Horace Andy"])
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_genres_fall_back_to_artist_tags() {
        let oracle = StaticOracle::default()
            .with_artist(
                "Massive Attack",
                vec![tag("trip hop", 100), tag("seen live", 90), tag("electronic", 60)],
            )
            .with_artist("Elizabeth Fraser", vec![tag("electronic", 80), tag("dream pop", 40)]);
        let client = OracleClient::new(&oracle, &fast_retries(1));

        let release = OracleRelease {
            title: "Teardrop".to_string(),
            tags: vec![tag("teardrop", 100), tag("2000", 50)],
            ..OracleRelease::default()
        };
        let artists = ["Massive Attack".to_string(), "Elizabeth Fraser".to_string()];
        let genres = client.genres(&release, &artists, "Teardrop").await.unwrap();
        assert_eq!(genres, ["Trip-hop", "Electronic", "Dream Pop"]);

        let release = OracleRelease {
            tags: vec![tag("trip-hop", 100), tag("electronic", 50)],
            ..release
        };
        let genres = client.genres(&release, &artists, "Teardrop").await.unwrap();
        assert_eq!(genres, ["Trip-hop", "Electronic"]);
    }

    #[test]
    fn test_next_delay() {
        let oracle = FlakyOracle::new(0, Unavailable::ServerError);
        let config = OracleConfig {
            retry_delay_ms: Some(1000),
            max_attempts: None,
            backoff_factor: Some(2.0),
            max_retry_delay_ms: Some(3000),
        };
        let client = OracleClient::new(&oracle, &config);
        assert_eq!(
            client.next_delay(Duration::from_secs(1)),
            Duration::from_secs(2)
        );
        assert_eq!(
            client.next_delay(Duration::from_secs(2)),
            Duration::from_secs(3)
        );
    }
}
