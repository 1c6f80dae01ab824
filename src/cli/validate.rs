// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `validate` CLI subcommand.

use crate::oracle::StaticOracle;
use crate::{Config, ReleaseValidator};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for the `validate` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path of the release (JSON).
    path: PathBuf,
    /// Path of the canonical artist and release metadata (JSON).
    #[arg(short, long)]
    oracle: Option<PathBuf>,
}

/// Run the `validate` command.
///
/// # Errors
///
/// Fails if the files can't be read or the oracle requires a client upgrade.
pub async fn run(config: &Config, args: Args) -> crate::Result<ExitCode> {
    let Args { path, oracle } = args;
    let release = super::load_release(&path)?;

    let violations = match oracle {
        Some(oracle_path) => {
            let oracle = StaticOracle::load_from_path(oracle_path)?;
            ReleaseValidator::with_oracle(config, &oracle)
                .validate(&release)
                .await?
        }
        None => ReleaseValidator::new(config).validate(&release).await?,
    };

    for violation in &violations {
        println!("{violation}");
    }

    if violations.is_empty() {
        log::info!("Release '{release}' has no violations");
        Ok(ExitCode::SUCCESS)
    } else {
        log::info!("Release '{release}' has {} violations", violations.len());
        Ok(ExitCode::FAILURE)
    }
}
