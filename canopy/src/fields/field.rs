// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placement of a field in the two-column form grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputExpression {
    #[default]
    FullWidth,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Date,
    Number,
}

impl ContentType {
    /// Numeric identifier carried on the wire as `contentTypeID`.
    pub fn id(&self) -> u8 {
        match self {
            ContentType::Text => 1,
            ContentType::Date => 2,
            ContentType::Number => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(ContentType::Text),
            2 => Some(ContentType::Date),
            3 => Some(ContentType::Number),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(ContentType::Text),
            "date" => Some(ContentType::Date),
            "number" => Some(ContentType::Number),
            _ => None,
        }
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.id())
    }
}

/// Accepts the numeric id or the lowercase name (`date`), which is what site definitions use.
impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(u8),
            Name(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Id(id) => ContentType::from_id(id),
            Raw::Name(name) => ContentType::from_name(&name),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("unknown content type"))
    }
}

/// Serialized state of one field, fed back on the next request to rebuild its candidate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub title: String,
    pub mandatory: bool,
    pub content_type: ContentType,
    pub value: Option<String>,
    pub inherited_value: Option<String>,
    pub expression: OutputExpression,
    pub property: Option<String>,
}

impl Field {
    pub fn new(id: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            mandatory: false,
            content_type,
            value: None,
            inherited_value: None,
            expression: OutputExpression::default(),
            property: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_inherited_value(mut self, value: impl Into<String>) -> Self {
        self.inherited_value = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_serializes_as_id() {
        assert_eq!(serde_json::to_string(&ContentType::Date).unwrap(), "2");
        let parsed: ContentType = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(parsed, ContentType::Number);
        let parsed: ContentType = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, ContentType::Text);
        assert!(serde_json::from_str::<ContentType>("9").is_err());
    }

    #[test]
    fn expression_uses_camel_case() {
        assert_eq!(
            serde_json::to_string(&OutputExpression::FullWidth).unwrap(),
            "\"fullWidth\""
        );
        let parsed: OutputExpression = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, OutputExpression::Left);
    }
}
