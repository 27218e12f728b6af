// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::binding::{BoundValue, ContentRecord, FieldError};
use super::lifecycle::{CandidateSource, ContentField, FieldCore, FieldState, WriteOutcome};
use super::layout::LayoutState;
use super::{ContentType, ControlBuilder, Field, FieldDefinition};
use crate::console::Console;
use crate::locale::Culture;
use crate::util::html_escape;

/// Single line text input, also used for decimal numbers.
#[derive(Debug, Clone)]
pub struct TextField {
    core: FieldCore,
    candidate: Option<BoundValue>,
}

impl TextField {
    pub fn new(definition: FieldDefinition) -> Self {
        Self {
            core: FieldCore::new(definition),
            candidate: None,
        }
    }

    pub fn candidate(&self) -> Option<&BoundValue> {
        self.candidate.as_ref()
    }

    fn is_number(&self) -> bool {
        self.core.definition().content_type == ContentType::Number
    }

    /// Stored numbers use the invariant form; legacy rows may carry the legacy culture's separator.
    fn parse_stored(&self, raw: &str, legacy: &Culture) -> Option<BoundValue> {
        if raw.is_empty() {
            return None;
        }
        if !self.is_number() {
            return Some(BoundValue::Text(raw.to_string()));
        }
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .or_else(|| legacy.parse_number(raw))
            .map(BoundValue::Number)
    }

    fn parse_submitted(&self, raw: &str, culture: &Culture) -> Option<BoundValue> {
        if self.is_number() {
            culture.parse_number(raw).map(BoundValue::Number)
        } else {
            Some(BoundValue::Text(raw.to_string()))
        }
    }

    fn accepts(&self, value: &BoundValue) -> bool {
        matches!(
            (self.is_number(), value),
            (true, BoundValue::Number(_)) | (false, BoundValue::Text(_))
        )
    }
}

fn canonical(value: &BoundValue) -> Option<String> {
    match value {
        BoundValue::Text(text) => Some(text.clone()),
        BoundValue::Number(number) => Some(number.to_string()),
        BoundValue::Date(_) => None,
    }
}

fn display(value: &BoundValue, culture: &Culture) -> Option<String> {
    match value {
        BoundValue::Text(text) => Some(text.clone()),
        BoundValue::Number(number) => Some(culture.format_number(*number)),
        BoundValue::Date(_) => None,
    }
}

impl ContentField for TextField {
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
                .and_then(|raw| self.parse_stored(raw, &settings.legacy_culture)),
            CandidateSource::Typed(value) => value.filter(|value| self.accepts(value)),
            CandidateSource::Submitted(raw) => raw
                .as_deref()
                .and_then(|raw| self.parse_submitted(raw, &settings.culture)),
        };

        self.core.write_back(
            record,
            self.candidate.as_ref().and_then(canonical),
            self.candidate.clone(),
        )?;

        let output_text = self
            .candidate
            .as_ref()
            .and_then(|value| display(value, &settings.culture));
        let inherited_value = self.core.inherited_source(record, field);
        let inherited_output_text = inherited_value
            .as_deref()
            .and_then(|raw| self.parse_stored(raw, &settings.legacy_culture))
            .and_then(|value| display(&value, &settings.culture));
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
        let value = self
            .candidate
            .as_ref()
            .and_then(|value| display(value, &console.settings().culture))
            .unwrap_or_default();
        let base_class = if self.is_number() { "text number" } else { "text" };
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
                    "<input class=\"{}\" name=\"{id}\" type=\"text\" id=\"{id}\" value=\"{}\"/>{}",
                    element.classes(base_class),
                    html_escape(&value),
                    element.post_text(),
                    id = element.id,
                )
            },
        );

        let canonical = self.candidate.as_ref().and_then(canonical);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleSettings;
    use crate::fields::binding::{PropertyBag, PropertyValue};
    use crate::util::{TestConfigBuilder, test_config};

    fn console_with(culture: &str, values: &[(&str, &str)]) -> Console {
        let config = TestConfigBuilder::new().with_culture(culture).build();
        let mut console = Console::new(ConsoleSettings::from_config(&config));
        if !values.is_empty() {
            console.submit_form(values.iter().copied().collect());
        }
        console
    }

    fn number_definition() -> FieldDefinition {
        let mut def = FieldDefinition::new("price", ContentType::Number);
        def.title = "Price".to_string();
        def
    }

    #[test]
    fn text_round_trips_through_the_record() {
        let mut record = ContentRecord::new();
        record.set("headline", PropertyValue::Text("Hello & welcome".to_string()));
        let console = Console::new(ConsoleSettings::from_config(&test_config()));
        let mut field = TextField::new(FieldDefinition::new("headline", ContentType::Text));
        field.set_candidate(&console, &mut record, None, true).unwrap();

        let mut builder = ControlBuilder::new();
        let outcome =
            field.write_candidate(&mut builder, &console, LayoutState::new(), true, false, false);
        assert!(builder.html().contains("value=\"Hello &amp; welcome\""));
        assert_eq!(outcome.field.value.as_deref(), Some("Hello & welcome"));
        assert_eq!(builder.fields()[0].property_type, "String");
    }

    #[test]
    fn submitted_number_uses_session_culture() {
        let console = console_with("nl-NL", &[("price", "12,5")]);
        let mut record = ContentRecord::new();
        let mut field = TextField::new(number_definition());
        field.set_candidate(&console, &mut record, None, true).unwrap();
        assert_eq!(field.candidate(), Some(&BoundValue::Number(12.5)));
        assert_eq!(record.get("price"), Some(&PropertyValue::Number(12.5)));

        let mut builder = ControlBuilder::new();
        let outcome =
            field.write_candidate(&mut builder, &console, LayoutState::new(), true, false, false);
        assert!(builder.html().contains("class=\"text number\""));
        assert!(builder.html().contains("value=\"12,5\""));
        assert_eq!(outcome.field.value.as_deref(), Some("12.5"));
    }

    #[test]
    fn unparseable_number_degrades_to_absent() {
        let mut console = console_with("en-GB", &[("price", "twelve")]);
        console.set_save_mode(true);
        let mut record = ContentRecord::new();
        let mut field = TextField::new(number_definition());
        field.set_candidate(&console, &mut record, None, true).unwrap();
        assert_eq!(field.candidate(), None);
        assert_eq!(record.get("price"), Some(&PropertyValue::Null));
        assert!(!field.is_valid(&console, true));
    }

    #[test]
    fn bag_numbers_are_stored_invariant() {
        let console = console_with("de-DE", &[("price", "3,25")]);
        let mut def = number_definition();
        def.bag = Some("data".to_string());
        let mut record = ContentRecord::new();
        let mut field = TextField::new(def);
        field.set_candidate(&console, &mut record, None, true).unwrap();

        let mut expected = PropertyBag::new();
        expected.insert("price".to_string(), Some("3.25".to_string()));
        assert_eq!(record.get("data"), Some(&PropertyValue::Bag(expected)));
    }

    #[test]
    fn legacy_bag_number_with_comma_is_read() {
        let console = console_with("en-GB", &[]);
        let mut def = number_definition();
        def.bag = Some("data".to_string());
        let mut bag = PropertyBag::new();
        bag.insert("price".to_string(), Some("7,75".to_string()));
        let mut record = ContentRecord::new();
        record.set("data", PropertyValue::Bag(bag));
        let mut field = TextField::new(def);
        field.set_candidate(&console, &mut record, None, false).unwrap();
        assert_eq!(field.candidate(), Some(&BoundValue::Number(7.75)));
    }

    #[test]
    fn number_property_holding_text_is_absent() {
        let console = console_with("en-GB", &[]);
        let mut record = ContentRecord::new();
        record.set("price", PropertyValue::Text("cheap".to_string()));
        let mut def = number_definition();
        def.read_only = true;
        let mut field = TextField::new(def);
        field.set_candidate(&console, &mut record, None, false).unwrap();
        assert_eq!(field.candidate(), None);
    }
}
