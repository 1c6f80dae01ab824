// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Module for the `fix` CLI subcommand.

use crate::oracle::StaticOracle;
use crate::{Config, ReleaseFixer};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for the `fix` CLI command.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path of the release (JSON).
    path: PathBuf,
    /// Name of the folder that contains the release files.
    #[arg(short, long)]
    folder_name: String,
    /// Path of the canonical artist and release metadata (JSON).
    #[arg(short, long)]
    oracle: Option<PathBuf>,
    /// Write the fixed release to this file instead of printing it.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Run the `fix` command.
///
/// # Errors
///
/// Fails if the files can't be read or written, or if the oracle requires a client upgrade.
pub async fn run(config: &Config, args: Args) -> crate::Result<ExitCode> {
    let Args {
        path,
        folder_name,
        oracle,
        output,
    } = args;
    let release = super::load_release(&path)?;

    let fixed = match oracle {
        Some(oracle_path) => {
            let oracle = StaticOracle::load_from_path(oracle_path)?;
            ReleaseFixer::with_oracle(config, &oracle)
                .fix(&release, &folder_name)
                .await?
        }
        None => ReleaseFixer::new(config).fix(&release, &folder_name).await?,
    };

    if fixed.can_validate_folder_name() {
        match fixed.folder_name(config) {
            Ok(name) => log::info!("Folder name: {name}"),
            Err(err) => log::warn!("Failed to derive folder name: {err}"),
        }
    }

    let json = serde_json::to_string_pretty(&fixed)?;
    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            log::info!("Wrote fixed release to {}", output_path.display());
        }
        None => println!("{json}"),
    }

    Ok(ExitCode::SUCCESS)
}
