// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Command line interface.

mod config;
mod fix;
mod info;
mod validate;

use crate::{Config, Release};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Check a release and print all violations.
    Validate(validate::Args),
    /// Repair a release and write the result as JSON.
    Fix(fix::Args),
    /// Show properties derived from a release.
    Info(info::Args),
    /// Print the effective configuration.
    Config(config::Args),
}

/// Command line Arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Command to run.
    #[command(subcommand)]
    command: Command,
    /// Show debug information.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Path to configuration file.
    #[arg(short, long, required = false, global = true)]
    config_path: Option<PathBuf>,
}

impl Args {
    /// Get the desired log level, depending on the verbose flag passed on the command line.
    fn log_level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Get the current configuration.
    fn config(&self) -> crate::Result<Config> {
        match &self.config_path {
            Some(path) => Config::load_from_path(path).map(|config| config.with_defaults()),
            None => Ok(Config::default()),
        }
    }
}

/// Load a release from a JSON file.
fn load_release(path: &Path) -> crate::Result<Release> {
    let text = std::fs::read_to_string(path)?;
    let release = serde_json::from_str(&text)?;
    Ok(release)
}

/// Main entry point.
///
/// Returns a failure exit code if the command did not succeed, e.g. because a release has
/// violations.
///
/// # Errors
///
/// Can returns errors if the command line arguments are incorrect or the executed programs lead to
/// an error.
pub async fn main() -> crate::Result<ExitCode> {
    let args = Args::parse();

    if let Err(err) = TermLogger::init(
        args.log_level_filter(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {err}");
    }

    let config = args.config()?;
    match args.command {
        Command::Validate(cmd_args) => validate::run(&config, cmd_args).await,
        Command::Fix(cmd_args) => fix::run(&config, cmd_args).await,
        Command::Info(cmd_args) => info::run(&config, cmd_args),
        Command::Config(cmd_args) => config::run(&config, cmd_args),
    }
}
