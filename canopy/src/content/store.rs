// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::path::Path;
use tokio::sync::RwLock;

use crate::fields::{ContentRecord, PropertyBag, PropertyValue};

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Parse(String),
    NotFound { list_id: u32, item_id: i32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "Content store IO error: {}", err),
            StoreError::Parse(msg) => write!(f, "Content store parse error: {}", msg),
            StoreError::NotFound { list_id, item_id } => {
                write!(f, "Item {} does not exist in list {}", item_id, list_id)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Backing storage of list items.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Item id 0 yields an empty record for a new item.
    async fn load(&self, list_id: u32, item_id: i32) -> Result<ContentRecord, StoreError>;

    /// Stores the record and returns its item id; id 0 allocates a new one.
    async fn save(
        &self,
        list_id: u32,
        item_id: i32,
        record: ContentRecord,
    ) -> Result<i32, StoreError>;
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    records: Vec<SeedRecord>,
}

#[derive(Debug, Deserialize)]
struct SeedRecord {
    list: u32,
    item: i32,
    #[serde(default)]
    properties: BTreeMap<String, Option<SeedValue>>,
    #[serde(default)]
    inherited: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedDate {
    date: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeedValue {
    Number(f64),
    Text(String),
    Date(SeedDate),
    Bag(PropertyBag),
}

impl From<Option<SeedValue>> for PropertyValue {
    fn from(value: Option<SeedValue>) -> Self {
        match value {
            None => PropertyValue::Null,
            Some(SeedValue::Number(number)) => PropertyValue::Number(number),
            Some(SeedValue::Text(text)) => PropertyValue::Text(text),
            Some(SeedValue::Date(seed)) => PropertyValue::Date(seed.date),
            Some(SeedValue::Bag(bag)) => PropertyValue::Bag(bag),
        }
    }
}

/// In-memory store, optionally seeded from `state/content.yaml`.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: RwLock<HashMap<(u32, i32), ContentRecord>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_seed(content: &str) -> Result<Self, StoreError> {
        let seed: SeedFile =
            serde_yaml::from_str(content).map_err(|e| StoreError::Parse(e.to_string()))?;
        let mut records = HashMap::new();
        for entry in seed.records {
            let record = ContentRecord {
                properties: entry
                    .properties
                    .into_iter()
                    .map(|(name, value)| (name, PropertyValue::from(value)))
                    .collect(),
                inherited: entry.inherited,
            };
            records.insert((entry.list, entry.item), record);
        }
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// A missing seed file yields an empty store.
    pub async fn from_seed_file(path: &Path) -> Result<Self, StoreError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No content seed at {}; starting empty", path.display());
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };
        let store = Self::parse_seed(&content)?;
        info!(
            "Content store seeded with {} items from {}",
            store.records.read().await.len(),
            path.display()
        );
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn load(&self, list_id: u32, item_id: i32) -> Result<ContentRecord, StoreError> {
        if item_id <= 0 {
            return Ok(ContentRecord::new());
        }
        self.records
            .read()
            .await
            .get(&(list_id, item_id))
            .cloned()
            .ok_or(StoreError::NotFound { list_id, item_id })
    }

    async fn save(
        &self,
        list_id: u32,
        item_id: i32,
        record: ContentRecord,
    ) -> Result<i32, StoreError> {
        let mut records = self.records.write().await;
        let item_id = if item_id > 0 {
            item_id
        } else {
            records
                .keys()
                .filter(|(list, _)| *list == list_id)
                .map(|(_, item)| *item)
                .max()
                .unwrap_or(0)
                + 1
        };
        records.insert((list_id, item_id), record);
        debug!("Saved item {} of list {}", item_id, list_id);
        Ok(item_id)
    }
}
