// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::NaiveDateTime;

/// Date display format written in the console's `dd-MM-yyyy` pattern notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    strftime: String,
}

impl DateFormat {
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err("Date format cannot be empty".to_string());
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut strftime = String::new();
        let mut has_day = false;
        let mut has_month = false;
        let mut has_year = false;
        let mut index = 0;

        while index < chars.len() {
            let ch = chars[index];
            let mut run = 1;
            while index + run < chars.len() && chars[index + run] == ch {
                run += 1;
            }

            let token = match (ch, run) {
                ('y', 4) => Some("%Y"),
                ('y', 2) => Some("%y"),
                ('M', 2) => Some("%m"),
                ('M', 1) => Some("%-m"),
                ('d', 2) => Some("%d"),
                ('d', 1) => Some("%-d"),
                ('H', 2) => Some("%H"),
                ('H', 1) => Some("%-H"),
                ('m', 2) => Some("%M"),
                ('s', 2) => Some("%S"),
                ('y' | 'M' | 'd' | 'H' | 'm' | 's', _) => {
                    return Err(format!(
                        "Unsupported date format token '{}'",
                        ch.to_string().repeat(run)
                    ));
                }
                _ => None,
            };

            match token {
                Some(token) => {
                    has_day |= ch == 'd';
                    has_month |= ch == 'M';
                    has_year |= ch == 'y';
                    strftime.push_str(token);
                }
                None => {
                    for _ in 0..run {
                        if ch == '%' {
                            strftime.push_str("%%");
                        } else {
                            strftime.push(ch);
                        }
                    }
                }
            }

            index += run;
        }

        if !(has_day && has_month && has_year) {
            return Err(format!(
                "Date format '{}' must contain day, month and year",
                pattern
            ));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(&self.strftime).to_string()
    }

    /// Placeholder shown in empty date inputs, e.g. `dd-mm-yyyy`.
    pub fn placeholder(&self) -> String {
        self.pattern.to_lowercase()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: "dd-MM-yyyy".to_string(),
            strftime: "%d-%m-%Y".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 4)
            .unwrap()
            .and_hms_opt(7, 5, 9)
            .unwrap()
    }

    #[test]
    fn default_matches_parsed_pattern() {
        assert_eq!(DateFormat::parse("dd-MM-yyyy").unwrap(), DateFormat::default());
    }

    #[test]
    fn formats_with_console_tokens() {
        let format = DateFormat::parse("dd-MM-yyyy").unwrap();
        assert_eq!(format.format(&sample()), "04-03-2019");

        let format = DateFormat::parse("M/d/yyyy HH:mm:ss").unwrap();
        assert_eq!(format.format(&sample()), "3/4/2019 07:05:09");
    }

    #[test]
    fn placeholder_is_lowercase_pattern() {
        let format = DateFormat::parse("dd-MM-yyyy").unwrap();
        assert_eq!(format.placeholder(), "dd-mm-yyyy");
    }

    #[test]
    fn rejects_incomplete_or_unknown_patterns() {
        assert!(DateFormat::parse("").is_err());
        assert!(DateFormat::parse("HH:mm").is_err());
        assert!(DateFormat::parse("ddd-MM-yyyy").is_err());
    }

    #[test]
    fn percent_signs_stay_literal() {
        let format = DateFormat::parse("dd%MM%yyyy").unwrap();
        assert_eq!(format.format(&sample()), "04%03%2019");
    }
}
