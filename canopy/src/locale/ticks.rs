// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Tick counts: 100 ns intervals since 0001-01-01T00:00:00, the encoding the
//! console uses for dates stored in property bags.

use super::Culture;
use chrono::{DateTime, Datelike, NaiveDateTime};

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;
const MAX_YEAR: i32 = 9999;

/// Converts a tick count into a date. Negative counts and values past year 9999 yield `None`.
pub fn from_ticks(ticks: i64) -> Option<NaiveDateTime> {
    if ticks < 0 {
        return None;
    }
    let relative = ticks - UNIX_EPOCH_TICKS;
    let seconds = relative.div_euclid(TICKS_PER_SECOND);
    let nanos = relative.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
    let value = DateTime::from_timestamp(seconds, nanos as u32)?.naive_utc();
    (value.year() <= MAX_YEAR).then_some(value)
}

pub fn to_ticks(value: &NaiveDateTime) -> Option<i64> {
    let utc = value.and_utc();
    let ticks = utc
        .timestamp()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(i64::from(utc.timestamp_subsec_nanos()) / NANOS_PER_TICK)?
        .checked_add(UNIX_EPOCH_TICKS)?;
    (ticks >= 0).then_some(ticks)
}

/// The zero tick value, used by typed properties to mean "no date".
pub fn is_min_value(value: &NaiveDateTime) -> bool {
    to_ticks(value) == Some(0)
}

pub fn parse_ticks(raw: &str) -> Option<NaiveDateTime> {
    raw.trim().parse::<i64>().ok().and_then(from_ticks)
}

/// Reads a stored date that is either culture formatted (legacy rows) or a tick count.
/// Anything containing a date separator goes through the legacy culture only.
pub fn parse_stored_date(raw: &str, legacy_culture: &Culture) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if Culture::has_date_separator(trimmed) {
        legacy_culture.parse_datetime(trimmed)
    } else {
        parse_ticks(trimmed)
    }
}

pub fn format_ticks(value: &NaiveDateTime) -> Option<String> {
    to_ticks(value).map(|ticks| ticks.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn unix_epoch_has_known_tick_count() {
        assert_eq!(to_ticks(&at(1970, 1, 1, 0, 0, 0)), Some(621_355_968_000_000_000));
        assert_eq!(
            from_ticks(621_355_968_000_000_000),
            Some(at(1970, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn ticks_survive_a_round_trip() {
        let value = at(2019, 3, 14, 10, 30, 15);
        let ticks = to_ticks(&value).unwrap();
        assert_eq!(from_ticks(ticks), Some(value));
        assert_eq!(parse_ticks(&ticks.to_string()), Some(value));
    }

    #[test]
    fn zero_ticks_is_the_min_value() {
        let min = from_ticks(0).unwrap();
        assert!(is_min_value(&min));
        assert!(!is_min_value(&at(2000, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn out_of_range_ticks_are_rejected() {
        assert_eq!(from_ticks(-1), None);
        assert_eq!(from_ticks(i64::MAX), None);
        assert_eq!(parse_ticks("abc"), None);
    }

    #[test]
    fn stored_dates_pick_encoding_by_separator() {
        let dutch = Culture::lookup("nl-NL").unwrap();
        assert_eq!(
            parse_stored_date("14-03-2019", &dutch),
            Some(at(2019, 3, 14, 0, 0, 0))
        );
        let ticks = to_ticks(&at(2019, 3, 14, 0, 0, 0)).unwrap().to_string();
        assert_eq!(
            parse_stored_date(&ticks, &dutch),
            Some(at(2019, 3, 14, 0, 0, 0))
        );
        assert_eq!(parse_stored_date("14-13-2019", &dutch), None);
        assert_eq!(parse_stored_date("", &dutch), None);
    }
}
