// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Main module

use std::process::ExitCode;

/// Exit code for errors, as opposed to releases with violations.
const ERROR_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    match concord::cli::main().await {
        Ok(exit_code) => exit_code,
        Err(concord::Error::OracleUpgradeRequired) => {
            eprintln!("The metadata oracle requires a client upgrade, aborting.");
            ExitCode::from(ERROR_EXIT_CODE)
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}
