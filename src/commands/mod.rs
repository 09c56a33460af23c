// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod reports;
pub mod sales;
pub mod seed;

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::DateRange;
use crate::utils::{parse_date, parse_month};

/// `--month` wins; otherwise `--from`/`--to`, each open-ended when absent.
pub fn range_from(sub: &clap::ArgMatches) -> Result<DateRange> {
    if let Some(m) = sub.get_one::<String>("month") {
        return parse_month(m);
    }
    let start = match sub.get_one::<String>("from") {
        Some(s) => parse_date(s)?,
        None => NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN),
    };
    let end = match sub.get_one::<String>("to") {
        Some(s) => parse_date(s)?,
        None => NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX),
    };
    Ok(DateRange::new(start, end)?)
}
