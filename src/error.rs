// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Error and result types.

use std::io;
use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum ErrorType {
    /// Configuration error.
    #[error("Configuration Error ({0})")]
    Config(#[from] crate::config::ConfigError),
    /// I/O Error.
    #[error("Input/Output error ({:?})", .0)]
    Io(#[from] io::Error),
    /// A release or oracle fixture could not be (de-)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The metadata oracle requires a newer client. This is fatal, the run must not continue.
    #[error("Metadata oracle requires a client upgrade")]
    OracleUpgradeRequired,
    /// A folder name was requested for a release that can't provide one.
    #[error("Cannot derive folder name: {0}")]
    FolderNamePrecondition(&'static str),
    /// A string did not name a known release category.
    #[error("Unknown release category: {0}")]
    UnknownCategory(String),
    /// A string did not name a known release source.
    #[error("Unknown release source: {0}")]
    UnknownSource(String),
    /// No folder name template is configured.
    #[error("Missing folder name template: {0}")]
    MissingTemplate(&'static str),
    /// A folder name template could not be registered.
    #[error("Invalid template: {0}")]
    TemplateInvalid(#[from] Box<handlebars::TemplateError>),
    /// An error occurred while formatting a template string.
    #[error("Template formatting failed: {0}")]
    TemplateFormattingFailed(#[from] handlebars::RenderError),
}

/// Convenience type.
pub type Result<T> = std::result::Result<T, ErrorType>;
