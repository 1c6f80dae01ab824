// Copyright (c) 2025 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Ranking of codec settings by audio quality.

use regex::Regex;
use std::sync::LazyLock;

/// Rank of lossless codecs.
const LOSSLESS_RANK: i32 = 200;

/// Rank of the best named preset. Worse presets rank lower.
const PRESET_BASE_RANK: i32 = 100;

/// Rank of unrecognized codec settings.
pub const UNKNOWN_RANK: i32 = -1;

/// Lossless codec names.
const LOSSLESS_CODECS: [&str; 2] = ["FLAC", "ALAC"];

/// Named encoder presets, best first.
const PRESETS: [&str; 13] = [
    "APX", "V0", "APS", "V1", "V2", "APM", "V3", "V4", "V5", "V6", "V7", "V8", "V9",
];

/// Bitrate modes, worst first, for equal bitrates.
const METHODS: [&str; 3] = ["CBR", "ABR", "VBR"];

/// Bitrate (kbps) from which the finer 32 kbps windows are used.
const FINE_WINDOW_START: u32 = 192;

/// Width (kbps) of the coarse windows below [`FINE_WINDOW_START`].
const COARSE_WINDOW: u32 = 64;

/// Width (kbps) of the fine windows.
const FINE_WINDOW: u32 = 32;

/// Highest window index. Bitrates above 320 kbps share the top window.
const MAX_WINDOW: u32 = 7;

/// A bitrate mode followed by a bitrate in kbps, e.g. `CBR320`.
static BITRATE_SETTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(CBR|VBR|ABR)(\d+)$").expect("valid codec regex"));

/// Index of the bitrate window the given bitrate falls into.
fn bitrate_window(kbps: u32) -> u32 {
    let window = if kbps < FINE_WINDOW_START {
        kbps / COARSE_WINDOW
    } else {
        FINE_WINDOW_START / COARSE_WINDOW + (kbps - FINE_WINDOW_START) / FINE_WINDOW
    };
    window.min(MAX_WINDOW)
}

/// Rank a codec setting string (e.g. `FLAC`, `V0`, `CBR320`).
///
/// Higher is better. Lossless codecs rank highest, followed by the named presets and bitrate
/// settings in windows of 64 kbps (below 192 kbps) or 32 kbps. Within a window, VBR beats ABR,
/// which beats CBR. Unrecognized settings rank [`UNKNOWN_RANK`].
#[must_use]
pub fn codec_rank(setting: &str) -> i32 {
    let setting = setting.trim().to_uppercase();
    let setting = ["MP3 ", "MP4 ", "OGG "]
        .into_iter()
        .find_map(|prefix| setting.strip_prefix(prefix))
        .unwrap_or(&setting);

    if LOSSLESS_CODECS.contains(&setting) {
        return LOSSLESS_RANK;
    }

    if let Some(position) = PRESETS.iter().position(|&preset| preset == setting) {
        return PRESET_BASE_RANK + i32::try_from(PRESETS.len() - position).unwrap_or(0);
    }

    BITRATE_SETTING_RE
        .captures(setting)
        .and_then(|captures| {
            let method = METHODS.iter().position(|&method| method == &captures[1])?;
            let kbps = captures[2].parse::<u32>().ok()?;
            let rank = bitrate_window(kbps) * 3 + u32::try_from(method).ok()?;
            i32::try_from(rank).ok()
        })
        .unwrap_or(UNKNOWN_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossless_ranks_highest() {
        assert_eq!(codec_rank("FLAC"), LOSSLESS_RANK);
        assert_eq!(codec_rank("ALAC"), LOSSLESS_RANK);
        assert!(codec_rank("FLAC") > codec_rank("APX"));
    }

    #[test]
    fn test_presets_are_ordered() {
        let ranks = PRESETS.iter().map(|preset| codec_rank(preset)).collect::<Vec<_>>();
        assert!(ranks.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(codec_rank("V9") > codec_rank("VBR320"));
        assert_eq!(codec_rank("MP3 V0"), codec_rank("V0"));
    }

    #[test]
    fn test_bitrate_windows() {
        assert_eq!(bitrate_window(0), 0);
        assert_eq!(bitrate_window(63), 0);
        assert_eq!(bitrate_window(64), 1);
        assert_eq!(bitrate_window(191), 2);
        assert_eq!(bitrate_window(192), 3);
        assert_eq!(bitrate_window(223), 3);
        assert_eq!(bitrate_window(224), 4);
        assert_eq!(bitrate_window(320), 7);
        assert_eq!(bitrate_window(1411), 7);
    }

    #[test]
    fn test_bitrate_settings() {
        assert_eq!(codec_rank("CBR128"), 6);
        assert_eq!(codec_rank("ABR128"), 7);
        assert_eq!(codec_rank("VBR128"), 8);
        assert_eq!(codec_rank("CBR320"), 21);
        assert!(codec_rank("CBR192") > codec_rank("VBR191"));
        assert_eq!(codec_rank("CBR160"), codec_rank("CBR128"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(codec_rank("CBR"), UNKNOWN_RANK);
        assert_eq!(codec_rank("WAV"), UNKNOWN_RANK);
        assert_eq!(codec_rank(""), UNKNOWN_RANK);
    }
}
