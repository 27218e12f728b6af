// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

mod asset;
mod content;
mod error;

pub use content::{ContentResponse, GetContentRequest, PostContentRequest};
pub use error::ApiError;

use crate::config::ValidatedConfig;
use crate::console::ConsoleFilter;
use crate::headers::Headers;

const CONTENT_JSON_LIMIT: usize = 2 * 1024 * 1024;

fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Mounts the content and asset controllers under the configured API scope.
pub fn configure(cfg: &mut web::ServiceConfig, config: &ValidatedConfig) {
    let api_scope = config.api_scope();

    cfg.service(
        web::scope(&format!("{}/content", api_scope))
            .app_data(json_config(CONTENT_JSON_LIMIT))
            .wrap(ConsoleFilter)
            .wrap(Headers)
            .route("/getcontent", web::get().to(content::get_content))
            .route("/postcontent", web::post().to(content::post_content)),
    );
    cfg.service(
        web::scope(&format!("{}/asset", api_scope))
            .app_data(json_config(config.asset_json_limit()))
            .wrap(Headers)
            .route("/getgalleries", web::get().to(asset::get_galleries))
            .route("/saveasset", web::post().to(asset::save_asset)),
    );
}
