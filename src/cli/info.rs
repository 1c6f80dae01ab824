// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `info` CLI subcommand.

use crate::util::{length_to_time_delta, FormattedDuration};
use crate::Config;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for the `info` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path of the release (JSON).
    path: PathBuf,
}

/// Run the `info` command.
///
/// # Errors
///
/// Fails if the release can't be read.
pub fn run(config: &Config, args: Args) -> crate::Result<ExitCode> {
    let Args { path } = args;
    let release = super::load_release(&path)?;

    println!("Release: {release}");
    println!("Tracks: {}", release.track_count());
    println!(
        "Length: {}",
        length_to_time_delta(release.length()).formatted_duration()
    );
    println!("Category: {}", release.category());
    println!("Source: {}", release.source());
    match release.codec_setting(false) {
        Some(codec) => println!("Codec: {codec} (rank {})", release.codec_rank()),
        None => println!("Codec: [mixed]"),
    }
    match release.folder_name(config) {
        Ok(name) => println!("Folder Name: {name}"),
        Err(err) => eprintln!("Folder Name: {err}"),
    }

    Ok(ExitCode::SUCCESS)
}
