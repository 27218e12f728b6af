// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Order of the day, month and year components in a short date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

/// Culture rules used when parsing user input and legacy stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culture {
    name: &'static str,
    order: DateOrder,
    decimal_separator: char,
}

const DATE_SEPARATORS: [char; 3] = ['-', '/', '.'];

// Two-digit years up to this value land in the 2000s.
const TWO_DIGIT_YEAR_PIVOT: u32 = 49;

static CULTURES: Lazy<HashMap<&'static str, Culture>> = Lazy::new(|| {
    let entries = [
        ("nl-nl", DateOrder::DayMonthYear, ','),
        ("nl-be", DateOrder::DayMonthYear, ','),
        ("de-de", DateOrder::DayMonthYear, ','),
        ("fr-fr", DateOrder::DayMonthYear, ','),
        ("en-gb", DateOrder::DayMonthYear, '.'),
        ("en-us", DateOrder::MonthDayYear, '.'),
        ("ja-jp", DateOrder::YearMonthDay, '.'),
        ("invariant", DateOrder::MonthDayYear, '.'),
    ];
    entries
        .into_iter()
        .map(|(name, order, decimal_separator)| {
            (
                name,
                Culture {
                    name,
                    order,
                    decimal_separator,
                },
            )
        })
        .collect()
});

impl Culture {
    /// Looks up a culture by its name, e.g. `nl-NL`. Matching is case-insensitive.
    pub fn lookup(name: &str) -> Option<Culture> {
        let key = name.trim().to_ascii_lowercase();
        CULTURES.get(key.as_str()).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn order(&self) -> DateOrder {
        self.order
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// True when the raw value carries one of the short-date separators.
    pub fn has_date_separator(raw: &str) -> bool {
        raw.contains(DATE_SEPARATORS)
    }

    /// Parses a short date with an optional time part (`14-03-2019 10:30`).
    /// A four-digit leading component is always read as an ISO-style year first date.
    pub fn parse_datetime(&self, raw: &str) -> Option<NaiveDateTime> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (date_part, time_part) = match trimmed.split_once([' ', 'T']) {
            Some((date, time)) => (date, Some(time.trim())),
            None => (trimmed, None),
        };

        let date = self.parse_date(date_part)?;
        let time = match time_part {
            None => NaiveTime::MIN,
            Some("") => NaiveTime::MIN,
            Some(time) => parse_time(time)?,
        };

        Some(date.and_time(time))
    }

    /// Parses a decimal number using this culture's decimal separator.
    pub fn parse_number(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized: String = trimmed
            .chars()
            .map(|ch| if ch == self.decimal_separator { '.' } else { ch })
            .collect();
        normalized.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    /// Formats a number for display using this culture's decimal separator.
    pub fn format_number(&self, value: f64) -> String {
        let text = value.to_string();
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }

    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = raw.split(DATE_SEPARATORS).collect();
        if parts.len() != 3 {
            return None;
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(parts.iter()) {
            if part.is_empty() || part.len() > 4 || !part.chars().all(|ch| ch.is_ascii_digit()) {
                return None;
            }
            *slot = part.parse().ok()?;
        }

        let (year_index, month_index, day_index) = if parts[0].len() == 4 {
            (0, 1, 2)
        } else {
            match self.order {
                DateOrder::DayMonthYear => (2, 1, 0),
                DateOrder::MonthDayYear => (2, 0, 1),
                DateOrder::YearMonthDay => (0, 1, 2),
            }
        };

        // Year 0 has no tick encoding.
        let year = expand_year(numbers[year_index], parts[year_index].len());
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, numbers[month_index], numbers[day_index])
    }
}

fn expand_year(value: u32, digits: usize) -> i32 {
    let year = if digits <= 2 {
        if value <= TWO_DIGIT_YEAR_PIVOT {
            2000 + value
        } else {
            1900 + value
        }
    } else {
        value
    };
    year as i32
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("valid date")
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let culture = Culture::lookup("NL-nl").expect("culture");
        assert_eq!(culture.name(), "nl-nl");
        assert!(Culture::lookup("xx-yy").is_none());
    }

    #[test]
    fn dutch_culture_reads_day_first() {
        let culture = Culture::lookup("nl-NL").unwrap();
        assert_eq!(culture.parse_datetime("14-03-2019"), Some(date(2019, 3, 14)));
        assert_eq!(culture.parse_datetime("1-3-2019"), Some(date(2019, 3, 1)));
        assert_eq!(culture.parse_datetime("14/03/19"), Some(date(2019, 3, 14)));
    }

    #[test]
    fn us_culture_reads_month_first() {
        let culture = Culture::lookup("en-US").unwrap();
        assert_eq!(culture.parse_datetime("03/14/2019"), Some(date(2019, 3, 14)));
        assert_eq!(culture.parse_datetime("14/03/2019"), None);
    }

    #[test]
    fn iso_dates_are_accepted_in_any_culture() {
        let culture = Culture::lookup("nl-NL").unwrap();
        assert_eq!(culture.parse_datetime("2019-03-14"), Some(date(2019, 3, 14)));
        let parsed = culture
            .parse_datetime("2019-03-14T10:30:15")
            .expect("iso datetime");
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "10:30:15");
    }

    #[test]
    fn time_part_is_optional() {
        let culture = Culture::lookup("en-GB").unwrap();
        let parsed = culture.parse_datetime("14/03/2019 09:05").expect("datetime");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2019-03-14 09:05");
    }

    #[test]
    fn garbage_is_rejected() {
        let culture = Culture::lookup("nl-NL").unwrap();
        assert_eq!(culture.parse_datetime("not-a-date"), None);
        assert_eq!(culture.parse_datetime("31-02-2019"), None);
        assert_eq!(culture.parse_datetime(""), None);
        assert_eq!(culture.parse_datetime("14-03"), None);
    }

    #[test]
    fn year_zero_is_rejected() {
        let culture = Culture::lookup("nl-NL").unwrap();
        assert_eq!(culture.parse_datetime("01-01-0000"), None);
        assert_eq!(culture.parse_datetime("01-01-000"), None);
        assert_eq!(culture.parse_datetime("0000-01-01"), None);
        assert_eq!(culture.parse_datetime("01-01-0001"), Some(date(1, 1, 1)));
    }

    #[test]
    fn numbers_follow_the_decimal_separator() {
        let dutch = Culture::lookup("nl-NL").unwrap();
        assert_eq!(dutch.parse_number("12,5"), Some(12.5));
        assert_eq!(dutch.format_number(12.5), "12,5");
        let english = Culture::lookup("en-GB").unwrap();
        assert_eq!(english.parse_number("12.5"), Some(12.5));
        assert_eq!(english.parse_number("twelve"), None);
    }
}
