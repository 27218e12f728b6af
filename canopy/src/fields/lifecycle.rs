// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Lifecycle shared by every content field: load a candidate from the record or
//! the submitted form, validate it, then render it and describe it to the client.

use super::binding::{BoundValue, ContentRecord, FieldError, PropertyBinding};
use super::layout::{CellMarkup, LayoutState};
use super::shared::{resolve_overlay, shared_field_is_valid};
use super::{ApiField, ControlBuilder, Field, FieldDefinition, FieldEvent};
use crate::console::Console;
use crate::util::html_escape;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Initial,
    Loaded,
    Validated,
    Rendered,
}

/// Result of rendering one field: its serialized state and the layout for the next field.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub field: Field,
    pub layout: LayoutState,
}

pub trait ContentField {
    fn id(&self) -> &str;

    fn state(&self) -> FieldState;

    fn definition(&self) -> &FieldDefinition;

    /// Loads the candidate value. Unparseable input leaves the candidate empty; only
    /// a failed write into the backing record is an error.
    fn set_candidate(
        &mut self,
        console: &Console,
        record: &mut ContentRecord,
        field: Option<&Field>,
        is_edit_mode: bool,
    ) -> Result<(), FieldError>;

    fn write_candidate(
        &mut self,
        builder: &mut ControlBuilder,
        console: &Console,
        layout: LayoutState,
        is_edit_mode: bool,
        is_required: bool,
        is_cloaked: bool,
    ) -> WriteOutcome;

    fn is_valid(&mut self, console: &Console, is_required: bool) -> bool;
}

/// Where a candidate comes from on this request.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateSource {
    /// Canonical string from a blueprint field or a bag slot.
    Stored(Option<String>),
    Typed(Option<BoundValue>),
    /// Raw value the user submitted.
    Submitted(Option<String>),
}

/// Per-element rendering context handed to the concrete field.
pub struct ElementContext<'a> {
    pub id: &'a str,
    pub is_valid: bool,
    pub is_cloaked: bool,
    pub auto_postback: bool,
    post_text: Option<&'a str>,
}

impl ElementContext<'_> {
    /// `base` followed by the error, post back and hidden modifiers that apply.
    pub fn classes(&self, base: &str) -> String {
        let mut classes = base.to_string();
        if !self.is_valid {
            classes.push_str(" error");
        }
        if self.auto_postback {
            classes.push_str(" postBack");
        }
        if self.is_cloaked {
            classes.push_str(" hidden");
        }
        classes
    }

    /// Text shown after the input; suppressed for cloaked controls.
    pub fn post_text(&self) -> String {
        match self.post_text {
            Some(text) if !self.is_cloaked => html_escape(text),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldCore {
    definition: FieldDefinition,
    binding: Option<PropertyBinding>,
    state: FieldState,
    mandatory: bool,
    output_text: Option<String>,
    inherited_output_text: Option<String>,
    inherited_value: Option<String>,
}

impl FieldCore {
    pub fn new(definition: FieldDefinition) -> Self {
        let binding = definition.binding();
        let mandatory = definition.mandatory;
        Self {
            definition,
            binding,
            state: FieldState::Initial,
            mandatory,
            output_text: None,
            inherited_output_text: None,
            inherited_value: None,
        }
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn output_text(&self) -> Option<&str> {
        self.output_text.as_deref()
    }

    pub fn candidate_source(
        &self,
        console: &Console,
        record: &ContentRecord,
        field: Option<&Field>,
        is_edit_mode: bool,
    ) -> CandidateSource {
        if console.is_initial_load() || !is_edit_mode {
            return match &self.binding {
                None => CandidateSource::Stored(
                    field
                        .and_then(|field| field.value.clone())
                        .filter(|value| !value.is_empty()),
                ),
                Some(PropertyBinding::DynamicBag(binding)) => {
                    CandidateSource::Stored(binding.read(record))
                }
                Some(PropertyBinding::Typed(binding)) => {
                    CandidateSource::Typed(binding.read(record))
                }
            };
        }
        CandidateSource::Submitted(console.form(self.id()).map(str::to_string))
    }

    /// Writes the candidate back through the binding. Blueprint and read-only fields skip this.
    pub fn write_back(
        &self,
        record: &mut ContentRecord,
        canonical: Option<String>,
        typed: Option<BoundValue>,
    ) -> Result<(), FieldError> {
        match &self.binding {
            Some(binding) if binding.is_writable() => match binding {
                PropertyBinding::DynamicBag(bag) => bag.write(record, canonical),
                PropertyBinding::Typed(property) => property.write(record, typed),
            },
            _ => Ok(()),
        }
    }

    /// Raw inherited value from the posted field or, failing that, the record.
    pub fn inherited_source(&self, record: &ContentRecord, field: Option<&Field>) -> Option<String> {
        field
            .and_then(|field| field.inherited_value.clone())
            .or_else(|| {
                self.binding
                    .as_ref()
                    .and_then(|binding| record.inherited(binding.property_name()))
                    .map(str::to_string)
            })
            .filter(|value| !value.is_empty())
    }

    pub fn finish_load(
        &mut self,
        output_text: Option<String>,
        inherited_value: Option<String>,
        inherited_output_text: Option<String>,
    ) {
        self.output_text = output_text;
        self.inherited_value = inherited_value;
        self.inherited_output_text = if self.definition.show_inherited_data {
            inherited_output_text
        } else {
            None
        };
        self.state = FieldState::Loaded;
        trace!("Field {} loaded", self.definition.id);
    }

    pub fn validate(&mut self, console: &Console, is_required: bool, has_candidate: bool) -> bool {
        self.mandatory = is_required;
        if self.state == FieldState::Loaded {
            self.state = FieldState::Validated;
        }
        if !console.is_save_mode() {
            return true;
        }
        if !shared_field_is_valid(self.definition.shared.as_ref()) {
            return false;
        }
        !self.mandatory || has_candidate
    }

    /// Renders the field. `element` builds the input control and is called only in edit mode.
    #[allow(clippy::too_many_arguments)]
    pub fn render<F>(
        &mut self,
        builder: &mut ControlBuilder,
        console: &Console,
        layout: LayoutState,
        is_edit_mode: bool,
        is_required: bool,
        is_cloaked: bool,
        is_valid: bool,
        element: F,
    ) -> LayoutState
    where
        F: FnOnce(&ElementContext<'_>) -> String,
    {
        self.mandatory = is_required;
        let is_edit_mode = is_edit_mode && !self.definition.override_edit_mode;
        let is_enabled = !self.definition.disabled && !self.definition.read_only;

        let effective = resolve_overlay(
            self.definition.shared.as_ref(),
            is_enabled,
            is_cloaked || self.definition.cloaked,
            self.output_text.take(),
        );
        self.output_text = effective.output_text;

        let label = self.title_label();
        let error_html = match (&self.definition.custom_error, is_valid) {
            (Some(message), false) => format!("<span class=\"error\">{}</span>", html_escape(message)),
            _ => String::new(),
        };
        let inherited = self
            .definition
            .show_inherited_data
            .then(|| html_escape(self.inherited_output_text.as_deref().unwrap_or_default()));

        let layout = if is_edit_mode && effective.is_enabled {
            let context = ElementContext {
                id: &self.definition.id,
                is_valid,
                is_cloaked: effective.is_cloaked,
                auto_postback: self.definition.auto_postback,
                post_text: self.definition.input_post_text.as_deref(),
            };
            let markup = element(&context);
            if effective.is_cloaked {
                builder.append_cloaked(&markup);
                layout
            } else {
                layout.wrap(
                    builder,
                    &CellMarkup {
                        id: &self.definition.id,
                        label: &label,
                        expression: self.definition.expression,
                        has_double_cols: console.settings().has_double_cols,
                        is_valid,
                        error_html: &error_html,
                        element: &markup,
                        inherited: inherited.as_deref(),
                    },
                )
            }
        } else {
            let text = format!(
                "<span class=\"text\">{}</span>",
                html_escape(self.output_text.as_deref().unwrap_or_default())
            );
            if effective.is_cloaked {
                builder.append_cloaked(&text);
                builder.push_field(self.api_field());
                self.state = FieldState::Rendered;
                return layout;
            }
            layout.wrap(
                builder,
                &CellMarkup {
                    id: &self.definition.id,
                    label: &label,
                    expression: self.definition.expression,
                    has_double_cols: console.settings().has_double_cols,
                    is_valid: true,
                    error_html: "",
                    element: &text,
                    inherited: inherited.as_deref(),
                },
            )
        };

        builder.push_field(self.api_field());
        self.state = FieldState::Rendered;
        layout
    }

    /// Serialized field state for the next request, carrying `value` in canonical form.
    pub fn read_candidate(&self, value: Option<String>) -> Field {
        Field {
            id: self.definition.id.clone(),
            title: self.definition.title.clone(),
            mandatory: self.mandatory,
            content_type: self.definition.content_type,
            value,
            inherited_value: self.inherited_value.clone(),
            expression: self.definition.expression,
            property: self
                .binding
                .as_ref()
                .map(|binding| binding.property_name().to_string()),
        }
    }

    fn title_label(&self) -> String {
        let title = html_escape(&self.definition.title);
        if self.mandatory {
            format!("{}<em>*</em>", title)
        } else {
            title
        }
    }

    fn mandatory_wrap(&self) -> String {
        if self.mandatory {
            format!("{}*", self.definition.title)
        } else {
            self.definition.title.clone()
        }
    }

    fn api_field(&self) -> ApiField {
        let property_type = match &self.binding {
            Some(binding) => binding.property_type(),
            None => self.definition.property_kind().type_name(),
        };
        ApiField {
            id: self.definition.id.clone(),
            title: self.mandatory_wrap(),
            value: self.output_text.clone(),
            expression: self.definition.expression,
            property_name: self.definition.id.clone(),
            property_type: property_type.to_string(),
            read_only: self.definition.read_only,
            content_type_id: self.definition.content_type,
            event: if self.definition.auto_postback {
                FieldEvent::Change
            } else {
                FieldEvent::None
            },
        }
    }
}
