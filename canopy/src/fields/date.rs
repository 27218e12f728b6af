// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::binding::{BoundValue, ContentRecord, FieldError};
use super::lifecycle::{CandidateSource, ContentField, FieldCore, FieldState, WriteOutcome};
use super::layout::LayoutState;
use super::{ControlBuilder, Field, FieldDefinition};
use crate::console::Console;
use crate::locale::ticks;
use crate::util::html_escape;
use chrono::NaiveDateTime;

/// Date picker field. Stored values are tick strings; older records carry a
/// culture formatted date, which is still accepted on read.
#[derive(Debug, Clone)]
pub struct DateField {
    core: FieldCore,
    candidate: Option<NaiveDateTime>,
}

impl DateField {
    pub fn new(definition: FieldDefinition) -> Self {
        Self {
            core: FieldCore::new(definition),
            candidate: None,
        }
    }

    pub fn candidate(&self) -> Option<NaiveDateTime> {
        self.candidate
    }

    pub fn output_text(&self) -> Option<&str> {
        self.core.output_text()
    }
}

impl ContentField for DateField {
    fn id(&self) -> &str {
        self.core.id()
    }

    fn state(&self) -> FieldState {
        self.core.state()
    }

    fn definition(&self) -> &FieldDefinition {
        self.core.definition()
    }

    fn set_candidate(
        &mut self,
        console: &Console,
        record: &mut ContentRecord,
        field: Option<&Field>,
        is_edit_mode: bool,
    ) -> Result<(), FieldError> {
        let settings = console.settings();
        self.candidate = match self
            .core
            .candidate_source(console, record, field, is_edit_mode)
        {
            CandidateSource::Stored(raw) => raw
                .as_deref()
                .and_then(|raw| ticks::parse_stored_date(raw, &settings.legacy_culture)),
            CandidateSource::Typed(Some(BoundValue::Date(value))) => Some(value),
            CandidateSource::Typed(_) => None,
            CandidateSource::Submitted(raw) => raw
                .as_deref()
                .and_then(|raw| settings.culture.parse_datetime(raw))
                .map(|value| {
                    if console.converts_to_canonical_time() {
                        console.to_canonical(value)
                    } else {
                        value
                    }
                }),
        }
        .filter(|value| ticks::to_ticks(value).is_some());

        let canonical = self
            .candidate
            .filter(|value| !ticks::is_min_value(value))
            .and_then(|value| ticks::format_ticks(&value));
        self.core
            .write_back(record, canonical, self.candidate.map(BoundValue::Date))?;

        let output_text = self
            .candidate
            .map(|value| settings.date_format.format(&value));
        let inherited_value = self.core.inherited_source(record, field);
        let inherited_output_text = inherited_value
            .as_deref()
            .and_then(|raw| ticks::parse_stored_date(raw, &settings.legacy_culture))
            .map(|value| settings.date_format.format(&value));
        self.core
            .finish_load(output_text, inherited_value, inherited_output_text);
        Ok(())
    }

    fn write_candidate(
        &mut self,
        builder: &mut ControlBuilder,
        console: &Console,
        layout: LayoutState,
        is_edit_mode: bool,
        is_required: bool,
        is_cloaked: bool,
    ) -> WriteOutcome {
        let settings = console.settings();
        let value = self
            .candidate
            .map(|value| settings.date_format.format(&value))
            .unwrap_or_default();
        let placeholder = settings.date_format.placeholder();
        let is_valid = self.is_valid(console, is_required);

        let layout = self.core.render(
            builder,
            console,
            layout,
            is_edit_mode,
            is_required,
            is_cloaked,
            is_valid,
            |element| {
                format!(
                    "<input class=\"{}\" name=\"{id}\"  type=\"text\" id=\"{id}\" maxlength=\"10\" value=\"{}\" placeholder=\"{}\"/>{}",
                    element.classes("date datepicker"),
                    html_escape(&value),
                    html_escape(&placeholder),
                    element.post_text(),
                    id = element.id,
                )
            },
        );

        let canonical = self.candidate.and_then(|value| ticks::format_ticks(&value));
        WriteOutcome {
            field: self.core.read_candidate(canonical),
            layout,
        }
    }

    fn is_valid(&mut self, console: &Console, is_required: bool) -> bool {
        let has_candidate = self.candidate.is_some();
        self.core.validate(console, is_required, has_candidate)
    }
}
