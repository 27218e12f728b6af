// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod service;
mod store;

pub use service::{
    AssetError, AssetService, AssetUpload, GalleryOption, SaveAssetRequest, SaveAssetResponse,
};
pub use store::{Asset, AssetBlob, AssetStore, AssetStoreError, MemoryAssetStore};
