// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Configuration utils.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Encountered when the configuration cannot be loaded.
#[derive(Error, Debug)]
#[error("Configuration Error: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

/// Default configuration TOML string.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Fallback delay between two oracle requests, used if the configuration doesn't specify one.
const FALLBACK_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fallback upper bound for the retry delay.
const FALLBACK_MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Represents a piece of configuration that can be merged with another one.
trait MergeableConfig {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self;
}

/// Configuration for the validation and repair rules.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Lowercase substrings that are not allowed in track comments.
    pub forbidden_comment_substrings: Option<Vec<String>>,
}

impl MergeableConfig for RulesConfig {
    fn merge(&self, other: &Self) -> Self {
        RulesConfig {
            forbidden_comment_substrings: self
                .forbidden_comment_substrings
                .clone()
                .or_else(|| other.forbidden_comment_substrings.clone()),
        }
    }
}

impl RulesConfig {
    /// Returns `true` if the comment contains any of the forbidden substrings.
    #[must_use]
    pub fn is_forbidden_comment(&self, comment: &str) -> bool {
        let comment = comment.to_lowercase();
        self.forbidden_comment_substrings
            .iter()
            .flatten()
            .any(|substring| comment.contains(substring.to_lowercase().as_str()))
    }
}

/// Configuration for metadata oracle lookups.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub struct OracleConfig {
    /// Delay between two attempts after a transient error (in milliseconds).
    pub retry_delay_ms: Option<u64>,
    /// Maximum number of attempts per lookup.
    ///
    /// Use `0` to retry forever.
    pub max_attempts: Option<u32>,
    /// Factor by which the delay grows after each failed attempt.
    pub backoff_factor: Option<f64>,
    /// Upper bound for the delay (in milliseconds).
    pub max_retry_delay_ms: Option<u64>,
}

impl MergeableConfig for OracleConfig {
    fn merge(&self, other: &Self) -> Self {
        OracleConfig {
            retry_delay_ms: self.retry_delay_ms.or(other.retry_delay_ms),
            max_attempts: self.max_attempts.or(other.max_attempts),
            backoff_factor: self.backoff_factor.or(other.backoff_factor),
            max_retry_delay_ms: self.max_retry_delay_ms.or(other.max_retry_delay_ms),
        }
    }
}

impl OracleConfig {
    /// Initial delay between two attempts.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay_ms
            .map_or(FALLBACK_RETRY_DELAY, Duration::from_millis)
    }

    /// Upper bound for the delay between two attempts.
    #[must_use]
    pub fn max_retry_delay(&self) -> Duration {
        self.max_retry_delay_ms
            .map_or(FALLBACK_MAX_RETRY_DELAY, Duration::from_millis)
    }

    /// Maximum number of attempts, or `None` if lookups are retried forever.
    #[must_use]
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts.filter(|&attempts| attempts != 0)
    }

    /// Factor by which the delay grows after each attempt (never below `1.0`).
    #[must_use]
    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor.unwrap_or(1.0).max(1.0)
    }
}

/// Configuration for folder names.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Template for releases that are credited to a main artist.
    pub artist_first_format: Option<String>,
    /// Template for compilation-like releases.
    pub title_first_format: Option<String>,
    /// Use the short codec description (`CBR`) instead of the long one (`MP3 CBR`).
    pub codec_short: Option<bool>,
}

impl MergeableConfig for PathsConfig {
    fn merge(&self, other: &Self) -> Self {
        PathsConfig {
            artist_first_format: self
                .artist_first_format
                .clone()
                .or_else(|| other.artist_first_format.clone()),
            title_first_format: self
                .title_first_format
                .clone()
                .or_else(|| other.title_first_format.clone()),
            codec_short: self.codec_short.or(other.codec_short),
        }
    }
}

/// The main configuration struct.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Validation and repair rules.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Oracle lookup behavior.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Folder name templates.
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::load_default().expect("Failed to load default config")
    }
}

impl MergeableConfig for Config {
    /// Merge this configuration object with another one, taking values not set in this object from
    /// the other one (if present).
    fn merge(&self, other: &Self) -> Self {
        Config {
            rules: self.rules.merge(&other.rules),
            oracle: self.oracle.merge(&other.oracle),
            paths: self.paths.merge(&other.paths),
        }
    }
}

impl Config {
    /// Load the configuration from a string slice.
    fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(text)?;
        Ok(config)
    }

    /// Load the default configuration.
    fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_str(DEFAULT_CONFIG)
    }

    /// Load the configuration from a file located at the given path.
    ///
    /// # Errors
    ///
    /// This method can fail if the file cannot be accessed or if it contains malformed
    /// configuration markup.
    pub fn load_from_path<T: AsRef<Path>>(path: T) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&text)?;
        Ok(config)
    }

    /// Merge this configuration struct with the default values.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let default = Self::default();
        self.merge(&default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::default();
        assert!(config.rules.forbidden_comment_substrings.is_some());
        assert_eq!(config.oracle.retry_delay(), Duration::from_secs(5));
        assert_eq!(config.oracle.max_attempts(), None);
        assert!(config.paths.artist_first_format.is_some());
        assert!(config.paths.title_first_format.is_some());
        assert_eq!(config.paths.codec_short, Some(true));
    }

    #[test]
    fn test_partial_config_is_merged_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[oracle]\nmax_attempts = 3\nretry_delay_ms = 10").unwrap();

        let config = Config::load_from_path(file.path()).unwrap().with_defaults();
        assert_eq!(config.oracle.max_attempts(), Some(3));
        assert_eq!(config.oracle.retry_delay(), Duration::from_millis(10));
        assert_eq!(config.oracle.max_retry_delay(), Duration::from_secs(60));
        assert!(config.paths.artist_first_format.is_some());
    }

    #[test]
    fn test_forbidden_comment() {
        let config = Config::default();
        assert!(config.rules.is_forbidden_comment("Ripped by SomeOne"));
        assert!(config.rules.is_forbidden_comment("visit WWW.EXAMPLE.COM"));
        assert!(!config.rules.is_forbidden_comment("Remastered 2006"));
    }
}
