// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Access to the backing record of a content item. A field binds either to a
//! typed property or to one slot of a string-keyed property bag; the choice is
//! made once when the field is built.

use crate::locale::ticks;
use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed property bag. Slots hold the canonical string form of a value.
pub type PropertyBag = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Bag(PropertyBag),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "Null",
            PropertyValue::Text(_) => "String",
            PropertyValue::Number(_) => "Decimal",
            PropertyValue::Date(_) => "DateTime",
            PropertyValue::Bag(_) => "CustomData",
        }
    }
}

/// Properties of one content item plus the values it inherits from its source language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentRecord {
    pub properties: BTreeMap<String, PropertyValue>,
    pub inherited: BTreeMap<String, String>,
}

impl ContentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    pub fn inherited(&self, name: &str) -> Option<&str> {
        self.inherited.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Date,
    OptionalDate,
    Text,
    Number,
}

impl PropertyKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::Date => "DateTime",
            PropertyKind::OptionalDate => "DateTime?",
            PropertyKind::Text => "String",
            PropertyKind::Number => "Decimal",
        }
    }

    fn accepts(&self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (_, PropertyValue::Null)
                | (PropertyKind::Date | PropertyKind::OptionalDate, PropertyValue::Date(_))
                | (PropertyKind::Text, PropertyValue::Text(_))
                | (PropertyKind::Number, PropertyValue::Number(_))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
    NotABag {
        property: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::TypeMismatch {
                property,
                expected,
                found,
            } => write!(
                f,
                "Property '{}' holds {} but the field writes {}",
                property, found, expected
            ),
            FieldError::NotABag { property } => {
                write!(f, "Property '{}' is not a property bag", property)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Value handed to and from a binding, independent of storage shape.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Date(NaiveDateTime),
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedPropertyBinding {
    pub name: String,
    pub kind: PropertyKind,
    pub writable: bool,
}

impl TypedPropertyBinding {
    pub fn read(&self, record: &ContentRecord) -> Option<BoundValue> {
        let value = record.get(&self.name)?;
        if !self.kind.accepts(value) {
            warn!(
                "Property '{}' holds {} where {} was expected",
                self.name,
                value.type_name(),
                self.kind.type_name()
            );
            return None;
        }
        match value {
            PropertyValue::Date(date) if ticks::is_min_value(date) => None,
            PropertyValue::Date(date) => Some(BoundValue::Date(*date)),
            PropertyValue::Text(text) => Some(BoundValue::Text(text.clone())),
            PropertyValue::Number(number) => Some(BoundValue::Number(*number)),
            PropertyValue::Null | PropertyValue::Bag(_) => None,
        }
    }

    pub fn write(
        &self,
        record: &mut ContentRecord,
        value: Option<BoundValue>,
    ) -> Result<(), FieldError> {
        if let Some(existing) = record.get(&self.name)
            && !self.kind.accepts(existing)
        {
            return Err(FieldError::TypeMismatch {
                property: self.name.clone(),
                expected: self.kind.type_name(),
                found: existing.type_name(),
            });
        }

        let stored = match (self.kind, value) {
            (PropertyKind::Date | PropertyKind::OptionalDate, Some(BoundValue::Date(date))) => {
                PropertyValue::Date(date)
            }
            (PropertyKind::Date, None) => match ticks::from_ticks(0) {
                Some(min) => PropertyValue::Date(min),
                None => PropertyValue::Null,
            },
            (PropertyKind::Text, Some(BoundValue::Text(text))) => PropertyValue::Text(text),
            (PropertyKind::Number, Some(BoundValue::Number(number))) => {
                PropertyValue::Number(number)
            }
            (_, None) => PropertyValue::Null,
            (kind, Some(other)) => {
                return Err(FieldError::TypeMismatch {
                    property: self.name.clone(),
                    expected: kind.type_name(),
                    found: other.type_name(),
                });
            }
        };
        record.set(self.name.clone(), stored);
        Ok(())
    }
}

impl BoundValue {
    fn type_name(&self) -> &'static str {
        match self {
            BoundValue::Date(_) => "DateTime",
            BoundValue::Text(_) => "String",
            BoundValue::Number(_) => "Decimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicBagBinding {
    pub bag: String,
    pub key: String,
    pub writable: bool,
}

impl DynamicBagBinding {
    /// Raw slot value, still in its canonical string encoding.
    pub fn read(&self, record: &ContentRecord) -> Option<String> {
        match record.get(&self.bag) {
            Some(PropertyValue::Bag(bag)) => bag.get(&self.key).cloned().flatten(),
            _ => None,
        }
    }

    pub fn write(&self, record: &mut ContentRecord, value: Option<String>) -> Result<(), FieldError> {
        let slot = record
            .properties
            .entry(self.bag.clone())
            .or_insert_with(|| PropertyValue::Bag(PropertyBag::new()));
        if matches!(slot, PropertyValue::Null) {
            *slot = PropertyValue::Bag(PropertyBag::new());
        }
        match slot {
            PropertyValue::Bag(bag) => {
                bag.insert(self.key.clone(), value);
                Ok(())
            }
            _ => Err(FieldError::NotABag {
                property: self.bag.clone(),
            }),
        }
    }
}

/// How a field reaches its backing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyBinding {
    Typed(TypedPropertyBinding),
    DynamicBag(DynamicBagBinding),
}

impl PropertyBinding {
    pub fn is_writable(&self) -> bool {
        match self {
            PropertyBinding::Typed(binding) => binding.writable,
            PropertyBinding::DynamicBag(binding) => binding.writable,
        }
    }

    /// Name reported as `propertyName` on the wire.
    pub fn property_name(&self) -> &str {
        match self {
            PropertyBinding::Typed(binding) => &binding.name,
            PropertyBinding::DynamicBag(binding) => &binding.key,
        }
    }

    pub fn property_type(&self) -> &'static str {
        match self {
            PropertyBinding::Typed(binding) => binding.kind.type_name(),
            PropertyBinding::DynamicBag(_) => "CustomData",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn typed(kind: PropertyKind) -> TypedPropertyBinding {
        TypedPropertyBinding {
            name: "publish".to_string(),
            kind,
            writable: true,
        }
    }

    #[test]
    fn typed_date_min_value_reads_as_absent() {
        let mut record = ContentRecord::new();
        record.set("publish", PropertyValue::Date(ticks::from_ticks(0).unwrap()));
        assert_eq!(typed(PropertyKind::Date).read(&record), None);

        record.set("publish", PropertyValue::Date(date(2019, 3, 14)));
        assert_eq!(
            typed(PropertyKind::Date).read(&record),
            Some(BoundValue::Date(date(2019, 3, 14)))
        );
    }

    #[test]
    fn typed_read_of_wrong_type_is_absent() {
        let mut record = ContentRecord::new();
        record.set("publish", PropertyValue::Text("soon".to_string()));
        assert_eq!(typed(PropertyKind::Date).read(&record), None);
    }

    #[test]
    fn typed_write_rejects_mismatched_property() {
        let mut record = ContentRecord::new();
        record.set("publish", PropertyValue::Text("soon".to_string()));
        let err = typed(PropertyKind::Date)
            .write(&mut record, Some(BoundValue::Date(date(2020, 1, 1))))
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                property: "publish".to_string(),
                expected: "DateTime",
                found: "String"
            }
        );
    }

    #[test]
    fn clearing_dates_depends_on_nullability() {
        let mut record = ContentRecord::new();
        typed(PropertyKind::Date).write(&mut record, None).unwrap();
        assert!(matches!(
            record.get("publish"),
            Some(PropertyValue::Date(value)) if ticks::is_min_value(value)
        ));

        typed(PropertyKind::OptionalDate)
            .write(&mut record, None)
            .unwrap();
        assert_eq!(record.get("publish"), Some(&PropertyValue::Null));
    }

    #[test]
    fn bag_write_creates_the_bag() {
        let binding = DynamicBagBinding {
            bag: "data".to_string(),
            key: "publish".to_string(),
            writable: true,
        };
        let mut record = ContentRecord::new();
        binding
            .write(&mut record, Some("636880896000000000".to_string()))
            .unwrap();
        assert_eq!(
            binding.read(&record).as_deref(),
            Some("636880896000000000")
        );

        binding.write(&mut record, None).unwrap();
        assert_eq!(binding.read(&record), None);
    }

    #[test]
    fn bag_write_into_scalar_fails() {
        let binding = DynamicBagBinding {
            bag: "data".to_string(),
            key: "publish".to_string(),
            writable: true,
        };
        let mut record = ContentRecord::new();
        record.set("data", PropertyValue::Number(3.0));
        assert_eq!(
            binding.write(&mut record, None),
            Err(FieldError::NotABag {
                property: "data".to_string()
            })
        );
    }

    #[test]
    fn wire_names_follow_binding_kind() {
        let typed = PropertyBinding::Typed(typed(PropertyKind::OptionalDate));
        assert_eq!(typed.property_type(), "DateTime?");
        assert_eq!(typed.property_name(), "publish");
        let bag = PropertyBinding::DynamicBag(DynamicBagBinding {
            bag: "data".to_string(),
            key: "start".to_string(),
            writable: false,
        });
        assert_eq!(bag.property_type(), "CustomData");
        assert_eq!(bag.property_name(), "start");
        assert!(!bag.is_writable());
    }
}
