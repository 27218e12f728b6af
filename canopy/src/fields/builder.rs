// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::ApiField;

/// Append-only sink for form markup. Cloaked controls go to a separate channel
/// that is rendered outside the visible form table.
#[derive(Debug, Default)]
pub struct ControlBuilder {
    html: String,
    cloaked: String,
    fields: Vec<ApiField>,
}

impl ControlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, markup: &str) {
        self.html.push_str(markup);
    }

    pub fn append_cloaked(&mut self, markup: &str) {
        self.cloaked.push_str(markup);
    }

    pub fn push_field(&mut self, field: ApiField) {
        self.fields.push(field);
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn cloaked(&self) -> &str {
        &self.cloaked
    }

    pub fn fields(&self) -> &[ApiField] {
        &self.fields
    }

    pub fn into_parts(self) -> (String, String, Vec<ApiField>) {
        (self.html, self.cloaked, self.fields)
    }
}
