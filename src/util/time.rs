// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Date and duration helpers.

use chrono::{
    format::{parse, Parsed, StrftimeItems},
    Datelike, Local, NaiveDate, TimeDelta,
};

/// Indicates that a value can be represent a duration as a formatted string.
pub trait FormattedDuration {
    /// Format the duration as a string, either in the form `M:SS` or `H:MM:SS`.
    fn formatted_duration(&self) -> String;
}

impl FormattedDuration for TimeDelta {
    fn formatted_duration(&self) -> String {
        let hours = self.num_hours();
        let minutes = self.num_minutes() - hours * 60;
        let seconds = self.num_seconds() - hours * 60 * 60 - minutes * 60;
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}

/// Convert a length in seconds to a [`TimeDelta`], rounded to whole milliseconds.
#[expect(clippy::cast_possible_truncation)]
pub fn length_to_time_delta(seconds: f64) -> TimeDelta {
    TimeDelta::milliseconds((seconds * 1000.0).round() as i64)
}

/// Date formats that can be found in a date tag.
const TAG_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%m", "%Y"];

/// Parse a tag date that may lack month and day.
fn parse_tag_date(value: &str) -> Option<NaiveDate> {
    TAG_DATE_FORMATS.into_iter().find_map(|fmt| {
        let mut parsed = Parsed::new();
        parse(&mut parsed, value.trim(), StrftimeItems::new(fmt)).ok()?;
        let year = parsed.year?;
        let (month, day) = parsed
            .month
            .map_or((1, 1), |month| (month, parsed.day.unwrap_or(1)));
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// The four-digit year of a tag date (e.g. `1998` for `1998-04-20`).
pub fn release_year(date: &str) -> Option<String> {
    parse_tag_date(date).map(|date| date.format("%Y").to_string())
}

/// The current year in local time.
pub fn current_year() -> i32 {
    Local::now().year()
}
