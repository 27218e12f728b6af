// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{ContentType, OutputExpression};
use serde::Serialize;

/// Client-side event that should trigger a post back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEvent {
    None,
    Change,
}

/// Field descriptor sent to the console front end. Names are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiField {
    pub id: String,
    pub title: String,
    pub value: Option<String>,
    pub expression: OutputExpression,
    pub property_name: String,
    pub property_type: String,
    pub read_only: bool,
    #[serde(rename = "contentTypeID")]
    pub content_type_id: ContentType,
    pub event: FieldEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_preserved() {
        let field = ApiField {
            id: "publish".to_string(),
            title: "Publish*".to_string(),
            value: Some("14-03-2019".to_string()),
            expression: OutputExpression::Left,
            property_name: "publish".to_string(),
            property_type: "DateTime".to_string(),
            read_only: false,
            content_type_id: ContentType::Date,
            event: FieldEvent::Change,
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["propertyName"], "publish");
        assert_eq!(json["propertyType"], "DateTime");
        assert_eq!(json["readOnly"], false);
        assert_eq!(json["contentTypeID"], 2);
        assert_eq!(json["event"], "change");
        assert_eq!(json["expression"], "left");
    }
}
