// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};

use super::ApiError;
use crate::app_state::AppState;
use crate::asset::{AssetService, SaveAssetRequest};
use crate::site::SiteTreeIndex;

pub async fn get_galleries(index: web::Data<SiteTreeIndex>) -> HttpResponse {
    let snapshot = index.snapshot();
    HttpResponse::Ok().json(AssetService::galleries(&snapshot))
}

pub async fn save_asset(
    body: web::Json<SaveAssetRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let saved = state.assets.save(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}
