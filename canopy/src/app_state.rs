// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::asset::{AssetService, AssetStore};
use crate::content::{ContentService, ContentStore};
use crate::runtime_paths::RuntimePaths;

pub struct AppState {
    pub content: ContentService,
    pub assets: AssetService,
    pub runtime_paths: RuntimePaths,
}

impl AppState {
    pub fn new(
        runtime_paths: RuntimePaths,
        content_store: Arc<dyn ContentStore>,
        asset_store: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            content: ContentService::new(content_store),
            assets: AssetService::new(asset_store),
            runtime_paths,
        }
    }
}
