// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::store::{Asset, AssetBlob, AssetStore, AssetStoreError};
use crate::site::{NodeType, SiteIndexData};

#[derive(Debug)]
pub enum AssetError {
    Invalid(String),
    NotFound(u32),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Invalid(msg) => write!(f, "{}", msg),
            AssetError::NotFound(id) => write!(f, "Asset {} does not exist", id),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<AssetStoreError> for AssetError {
    fn from(err: AssetStoreError) -> Self {
        match err {
            AssetStoreError::NotFound(id) => AssetError::NotFound(id),
            other @ AssetStoreError::TooLarge { .. } => AssetError::Invalid(other.to_string()),
        }
    }
}

/// A gallery as a select option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryOption {
    pub text: String,
    pub value: String,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Base64 encoded file contents.
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAssetRequest {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(rename = "galleryID", default)]
    pub gallery_id: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data: Option<AssetUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAssetResponse {
    pub id: u32,
    #[serde(rename = "galleryID")]
    pub gallery_id: u32,
    pub title: String,
    pub description: Option<String>,
    pub remote_location: Option<String>,
    pub remote_location_thumb: Option<String>,
}

impl From<Asset> for SaveAssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            gallery_id: asset.gallery_id,
            title: asset.title,
            description: asset.description,
            remote_location: asset.remote_location,
            remote_location_thumb: asset.remote_location_thumb,
        }
    }
}

pub struct AssetService {
    store: Arc<dyn AssetStore>,
}

impl AssetService {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Every gallery node across all sites, by complete path.
    pub fn galleries(index: &SiteIndexData) -> Vec<GalleryOption> {
        let mut options: Vec<GalleryOption> = index
            .sites()
            .flat_map(|site| site.nodes_of_type(NodeType::Gallery))
            .map(|node| GalleryOption {
                text: node.path(),
                value: node.id().to_string(),
                is_enabled: true,
            })
            .collect();
        options.sort_by(|a, b| a.text.cmp(&b.text));
        options
    }

    /// Creates or updates an asset. New assets need a file and a gallery;
    /// without a file only the metadata changes.
    pub async fn save(&self, request: SaveAssetRequest) -> Result<SaveAssetResponse, AssetError> {
        let id = request.id.unwrap_or(0);
        let gallery_id = request.gallery_id.unwrap_or(0);

        let blob = match request.data {
            Some(upload) => Some(decode_upload(upload)?),
            None => None,
        };

        if id == 0 {
            let has_data = blob
                .as_ref()
                .is_some_and(|blob| !blob.bytes.is_empty());
            if !has_data {
                return Err(AssetError::Invalid(
                    "data is required for a new asset".to_string(),
                ));
            }
            if gallery_id == 0 {
                return Err(AssetError::Invalid(
                    "galleryID is required for a new asset".to_string(),
                ));
            }
        }

        let mut asset = if id > 0 {
            self.store.get(id).await?
        } else {
            Asset::default()
        };

        if gallery_id > 0 {
            asset.gallery_id = gallery_id;
        }
        asset.description = request.description;
        if let Some(title) = request.title.filter(|title| !title.trim().is_empty()) {
            asset.title = title;
        }
        if let Some(blob) = &blob {
            asset.file_name = Some(blob.file_name.clone());
            asset.content_type = blob.content_type.clone();
            asset.extension = blob
                .file_name
                .rfind('.')
                .map(|dot| blob.file_name[dot..].to_string());
        }
        if asset.title.trim().is_empty() {
            asset.title = asset.file_name.clone().unwrap_or_default();
        }

        let stored = self.store.upsert(asset, blob).await?;
        info!(
            "Saved asset {} ({}) in gallery {}",
            stored.id, stored.title, stored.gallery_id
        );
        Ok(stored.into())
    }
}

fn decode_upload(upload: AssetUpload) -> Result<AssetBlob, AssetError> {
    let file_name = upload.file_name.trim();
    if file_name.is_empty() {
        return Err(AssetError::Invalid("data.fileName is required".to_string()));
    }
    if !file_name.contains('.') {
        return Err(AssetError::Invalid(format!(
            "data.fileName '{}' has no extension",
            file_name
        )));
    }
    let bytes = STANDARD
        .decode(upload.content.trim())
        .map_err(|e| AssetError::Invalid(format!("data.content is not valid base64: {}", e)))?;
    Ok(AssetBlob {
        file_name: file_name.to_string(),
        content_type: upload.content_type.filter(|value| !value.trim().is_empty()),
        bytes,
    })
}
