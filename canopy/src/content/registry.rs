// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::fields::FieldDefinition;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Behavior bound to a list class: its title, time-zone handling and form fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ListDefinition {
    #[serde(default)]
    pub title: String,
    /// Submitted local dates are stored in the canonical zone.
    #[serde(default)]
    pub convert_to_canonical_time: bool,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// List definitions keyed by class identifier (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct ListRegistry {
    lists: HashMap<String, Arc<ListDefinition>>,
}

impl ListRegistry {
    pub fn from_definitions(definitions: BTreeMap<String, ListDefinition>) -> Self {
        let mut lists = HashMap::new();
        for (class, definition) in definitions {
            let key = class.trim().to_ascii_lowercase();
            if key.is_empty() {
                warn!("List definition without a class identifier ignored");
                continue;
            }
            if lists.contains_key(&key) {
                warn!("Duplicate list definition for class {} ignored", class);
                continue;
            }
            lists.insert(key, Arc::new(definition));
        }
        Self { lists }
    }

    pub fn get(&self, class: &str) -> Option<Arc<ListDefinition>> {
        self.lists.get(&class.trim().to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
