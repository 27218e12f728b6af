// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::ValidatedConfig;
use crate::locale::{Culture, DateFormat};
use chrono::FixedOffset;

/// Locale and layout settings a console carries for one request.
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    pub culture: Culture,
    pub legacy_culture: Culture,
    pub date_format: DateFormat,
    pub canonical_offset: FixedOffset,
    pub has_double_cols: bool,
    pub browsing_class: String,
}

impl ConsoleSettings {
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self {
            culture: config.locale.culture,
            legacy_culture: config.locale.legacy_culture,
            date_format: config.locale.date_format.clone(),
            canonical_offset: config.locale.canonical_offset,
            has_double_cols: config.console.double_columns,
            browsing_class: config.console.browsing_class.clone(),
        }
    }
}
