// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::binding::{DynamicBagBinding, PropertyBinding, PropertyKind, TypedPropertyBinding};
use super::{ContentType, OutputExpression, SharedFieldInfo};
use serde::{Deserialize, Serialize};

/// Declaration of one form field as it appears under a list in `sites.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_content_type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub expression: OutputExpression,
    /// Backing property name; defaults to the field id.
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub property_kind: Option<PropertyKind>,
    /// Name of the property bag holding this field, for dynamic fields.
    #[serde(default)]
    pub bag: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub auto_postback: bool,
    /// Blueprint fields read their value from the posted `Field` and never write back.
    #[serde(default)]
    pub blueprint: bool,
    /// Forces read-only rendering even when the form is in edit mode.
    #[serde(default)]
    pub override_edit_mode: bool,
    #[serde(default)]
    pub show_inherited_data: bool,
    #[serde(default)]
    pub cloaked: bool,
    #[serde(default)]
    pub input_post_text: Option<String>,
    #[serde(default)]
    pub custom_error: Option<String>,
    #[serde(default)]
    pub shared: Option<SharedFieldInfo>,
}

fn default_content_type() -> ContentType {
    ContentType::Text
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            content_type,
            mandatory: false,
            expression: OutputExpression::default(),
            property: None,
            property_kind: None,
            bag: None,
            read_only: false,
            disabled: false,
            auto_postback: false,
            blueprint: false,
            override_edit_mode: false,
            show_inherited_data: false,
            cloaked: false,
            input_post_text: None,
            custom_error: None,
            shared: None,
        }
    }

    pub fn property_name(&self) -> &str {
        self.property.as_deref().unwrap_or(&self.id)
    }

    pub fn property_kind(&self) -> PropertyKind {
        self.property_kind.unwrap_or(match self.content_type {
            ContentType::Date => PropertyKind::OptionalDate,
            ContentType::Text => PropertyKind::Text,
            ContentType::Number => PropertyKind::Number,
        })
    }

    /// Selects how the field reaches its backing value. Blueprint fields have none.
    pub fn binding(&self) -> Option<PropertyBinding> {
        if self.blueprint {
            return None;
        }
        let writable = !self.read_only;
        Some(match &self.bag {
            Some(bag) => PropertyBinding::DynamicBag(DynamicBagBinding {
                bag: bag.clone(),
                key: self.property_name().to_string(),
                writable,
            }),
            None => PropertyBinding::Typed(TypedPropertyBinding {
                name: self.property_name().to_string(),
                kind: self.property_kind(),
                writable,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_defaults_fill_in_optional_settings() {
        let def: FieldDefinition = serde_yaml::from_str(
            "id: publish\ntitle: Publish\ncontent_type: date\nexpression: left\n",
        )
        .unwrap();
        assert_eq!(def.content_type, ContentType::Date);
        assert_eq!(def.expression, OutputExpression::Left);
        assert!(!def.mandatory);
        assert_eq!(
            def.binding(),
            Some(PropertyBinding::Typed(TypedPropertyBinding {
                name: "publish".to_string(),
                kind: PropertyKind::OptionalDate,
                writable: true,
            }))
        );
    }

    #[test]
    fn bag_fields_bind_dynamically() {
        let mut def = FieldDefinition::new("start", ContentType::Date);
        def.bag = Some("data".to_string());
        def.property = Some("startDate".to_string());
        def.read_only = true;
        assert_eq!(
            def.binding(),
            Some(PropertyBinding::DynamicBag(DynamicBagBinding {
                bag: "data".to_string(),
                key: "startDate".to_string(),
                writable: false,
            }))
        );
    }

    #[test]
    fn blueprint_fields_have_no_binding() {
        let mut def = FieldDefinition::new("start", ContentType::Date);
        def.blueprint = true;
        assert_eq!(def.binding(), None);
    }
}
