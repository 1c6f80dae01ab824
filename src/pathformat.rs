// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Folder name formatting and templating.

use crate::config::PathsConfig;
use crate::filename::escape_path_chars;
use handlebars::Handlebars;
use serde::Serialize;

/// Which of the two folder name templates to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderLayout {
    /// `Artist - Year - Title`, for releases by a main artist.
    ArtistFirst,
    /// `VA - Title - Year - Artist`, for compilation-like releases.
    TitleFirst,
}

impl FolderLayout {
    /// Name of the registered template.
    fn template_name(self) -> &'static str {
        match self {
            Self::ArtistFirst => "artist_first",
            Self::TitleFirst => "title_first",
        }
    }
}

/// Formatter for folder names.
#[derive(Debug)]
pub struct PathFormatter(Handlebars<'static>);

impl PathFormatter {
    /// Create a new path formatter.
    ///
    /// # Errors
    ///
    /// Fails if a template is missing or not a valid handlebars template.
    pub fn new(config: &PathsConfig) -> crate::Result<Self> {
        let artist_first = config
            .artist_first_format
            .as_deref()
            .ok_or(crate::Error::MissingTemplate("artist_first_format"))?;
        let title_first = config
            .title_first_format
            .as_deref()
            .ok_or(crate::Error::MissingTemplate("title_first_format"))?;

        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(escape_path_chars);
        handlebars
            .register_template_string(FolderLayout::ArtistFirst.template_name(), artist_first)
            .map_err(Box::new)?;
        handlebars
            .register_template_string(FolderLayout::TitleFirst.template_name(), title_first)
            .map_err(Box::new)?;
        Ok(Self(handlebars))
    }

    /// Format a folder name with the given values.
    ///
    /// # Errors
    ///
    /// Fails if the template references unknown values.
    pub fn format(
        &self,
        layout: FolderLayout,
        values: &PathFormatterValues<'_>,
    ) -> crate::Result<String> {
        let name = self.0.render(layout.template_name(), values)?;
        Ok(name)
    }
}

/// Values that can be used in a folder name template.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PathFormatterValues<'a> {
    /// The release artists, flattened (`A, B & C`).
    pub artist: &'a str,
    /// The release year.
    pub year: &'a str,
    /// The release title.
    pub title: &'a str,
    /// The release category, unless it is the default for the layout.
    pub category: Option<&'a str>,
    /// The release source, unless it is the default.
    pub source: Option<&'a str>,
    /// The codec setting.
    pub codec: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_artist_first() {
        let config = Config::default();
        let formatter = PathFormatter::new(&config.paths).unwrap();
        let values = PathFormatterValues {
            artist: "Massive Attack",
            year: "1998",
            title: "Mezzanine",
            codec: "CBR",
            ..PathFormatterValues::default()
        };
        assert_eq!(
            formatter.format(FolderLayout::ArtistFirst, &values).unwrap(),
            "Massive Attack - 1998 - Mezzanine [CBR]"
        );

        let values = PathFormatterValues {
            category: Some("EP"),
            source: Some("WEB"),
            title: "Teardrop: Remixes",
            ..values
        };
        assert_eq!(
            formatter.format(FolderLayout::ArtistFirst, &values).unwrap(),
            "Massive Attack - 1998 - Teardrop： Remixes [EP] [WEB] [CBR]"
        );
    }

    #[test]
    fn test_title_first() {
        let config = Config::default();
        let formatter = PathFormatter::new(&config.paths).unwrap();
        let values = PathFormatterValues {
            artist: "AC/DC",
            year: "2001",
            title: "Rock",
            codec: "V0",
            ..PathFormatterValues::default()
        };
        assert_eq!(
            formatter.format(FolderLayout::TitleFirst, &values).unwrap(),
            "VA - Rock - 2001 - AC／DC [V0]"
        );
    }

    #[test]
    fn test_invalid_template() {
        let mut config = Config::default();
        config.paths.title_first_format = Some("{{#if title}}".to_string());
        assert!(matches!(
            PathFormatter::new(&config.paths),
            Err(crate::Error::TemplateInvalid(_))
        ));

        config.paths.title_first_format = None;
        assert!(matches!(
            PathFormatter::new(&config.paths),
            Err(crate::Error::MissingTemplate("title_first_format"))
        ));
    }
}
