// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod api;
pub mod binding;
mod builder;
mod lifecycle;
mod date;
mod definition;
mod field;
pub mod layout;
mod shared;
mod text;

pub use api::{ApiField, FieldEvent};
pub use binding::{
    BoundValue, ContentRecord, DynamicBagBinding, FieldError, PropertyBag, PropertyBinding,
    PropertyKind, PropertyValue, TypedPropertyBinding,
};
pub use builder::ControlBuilder;
pub use lifecycle::{ContentField, FieldState, WriteOutcome};
pub use date::DateField;
pub use definition::FieldDefinition;
pub use field::{ContentType, Field, OutputExpression};
pub use layout::LayoutState;
pub use shared::{EffectiveState, SharedFieldInfo, resolve_overlay};
pub use text::TextField;

/// Builds the field implementation for a definition's content type.
pub fn build_field(definition: FieldDefinition) -> Box<dyn ContentField> {
    match definition.content_type {
        ContentType::Date => Box::new(DateField::new(definition)),
        ContentType::Text | ContentType::Number => Box::new(TextField::new(definition)),
    }
}
