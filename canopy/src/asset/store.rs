// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// Metadata of a stored file. `id` 0 marks an asset that was never saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Asset {
    pub id: u32,
    pub gallery_id: u32,
    pub title: String,
    pub description: Option<String>,
    pub file_name: Option<String>,
    /// Extension including the dot, e.g. `.png`.
    pub extension: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
    pub remote_location: Option<String>,
    pub remote_location_thumb: Option<String>,
}

/// File contents accompanying an asset save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBlob {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum AssetStoreError {
    NotFound(u32),
    TooLarge { size: usize, limit: usize },
}

impl fmt::Display for AssetStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStoreError::NotFound(id) => write!(f, "Asset {} does not exist", id),
            AssetStoreError::TooLarge { size, limit } => {
                write!(f, "Asset of {} bytes exceeds the {} byte limit", size, limit)
            }
        }
    }
}

impl std::error::Error for AssetStoreError {}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn get(&self, id: u32) -> Result<Asset, AssetStoreError>;

    /// Saves metadata and, when a blob is given, replaces the file.
    /// Id 0 allocates a new asset. Returns the stored asset.
    async fn upsert(&self, asset: Asset, blob: Option<AssetBlob>)
    -> Result<Asset, AssetStoreError>;
}

/// Keeps assets and their files in memory. Locations are `{base_url}/{id}{extension}`.
#[derive(Debug)]
pub struct MemoryAssetStore {
    base_url: String,
    max_bytes: usize,
    assets: RwLock<HashMap<u32, Asset>>,
    blobs: RwLock<HashMap<u32, Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new(base_url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            base_url: base_url.into(),
            max_bytes,
            assets: RwLock::new(HashMap::new()),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn blob(&self, id: u32) -> Option<Vec<u8>> {
        self.blobs.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn get(&self, id: u32) -> Result<Asset, AssetStoreError> {
        self.assets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AssetStoreError::NotFound(id))
    }

    async fn upsert(
        &self,
        mut asset: Asset,
        blob: Option<AssetBlob>,
    ) -> Result<Asset, AssetStoreError> {
        if let Some(blob) = &blob
            && blob.bytes.len() > self.max_bytes
        {
            return Err(AssetStoreError::TooLarge {
                size: blob.bytes.len(),
                limit: self.max_bytes,
            });
        }

        let mut assets = self.assets.write().await;
        if asset.id == 0 {
            asset.id = assets.keys().max().copied().unwrap_or(0) + 1;
        } else if !assets.contains_key(&asset.id) {
            return Err(AssetStoreError::NotFound(asset.id));
        }

        if let Some(blob) = blob {
            asset.size = blob.bytes.len();
            asset.remote_location = Some(format!(
                "{}/{}{}",
                self.base_url,
                asset.id,
                asset.extension.as_deref().unwrap_or_default()
            ));
            self.blobs.write().await.insert(asset.id, blob.bytes);
        }

        debug!("Stored asset {} in gallery {}", asset.id, asset.gallery_id);
        assets.insert(asset.id, asset.clone());
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(bytes: &[u8]) -> AssetBlob {
        AssetBlob {
            file_name: "logo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[actix_web::test]
    async fn new_assets_get_ids_and_locations() {
        let store = MemoryAssetStore::new("/assets", 16);
        let asset = Asset {
            gallery_id: 30,
            extension: Some(".png".to_string()),
            ..Asset::default()
        };
        let first = store.upsert(asset.clone(), Some(blob(b"png"))).await.unwrap();
        let second = store.upsert(asset, Some(blob(b"png2"))).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.remote_location.as_deref(), Some("/assets/1.png"));
        assert_eq!(first.size, 3);
        assert_eq!(store.blob(2).await.as_deref(), Some(&b"png2"[..]));
    }

    #[actix_web::test]
    async fn metadata_updates_keep_the_file() {
        let store = MemoryAssetStore::new("/assets", 16);
        let mut asset = store
            .upsert(
                Asset {
                    extension: Some(".png".to_string()),
                    ..Asset::default()
                },
                Some(blob(b"png")),
            )
            .await
            .unwrap();
        asset.title = "Logo".to_string();
        let updated = store.upsert(asset, None).await.unwrap();
        assert_eq!(updated.title, "Logo");
        assert_eq!(updated.remote_location.as_deref(), Some("/assets/1.png"));
        assert_eq!(store.get(1).await.unwrap().title, "Logo");
    }

    #[actix_web::test]
    async fn unknown_ids_and_oversized_files_are_rejected() {
        let store = MemoryAssetStore::new("/assets", 2);
        let missing = Asset {
            id: 9,
            ..Asset::default()
        };
        assert!(matches!(
            store.upsert(missing, None).await,
            Err(AssetStoreError::NotFound(9))
        ));
        assert!(matches!(
            store.upsert(Asset::default(), Some(blob(b"big"))).await,
            Err(AssetStoreError::TooLarge { size: 3, limit: 2 })
        ));
        assert!(matches!(store.get(1).await, Err(AssetStoreError::NotFound(1))));
    }
}
