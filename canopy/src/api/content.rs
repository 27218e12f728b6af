// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::app_state::AppState;
use crate::console::filter::CONSOLE_URL_HEADER;
use crate::console::{Console, ConsoleRequest, FormValues};
use crate::content::{ContentService, ExplorerResponse, ListResponse, PageResponse};
use crate::fields::Field;
use crate::site::SiteTreeIndex;

#[derive(Debug, Deserialize)]
pub struct GetContentRequest {
    #[serde(rename = "currentSiteID", default)]
    pub current_site_id: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContentRequest {
    #[serde(rename = "currentSiteID", default)]
    pub current_site_id: u32,
    #[serde(default)]
    pub posted_field: Option<String>,
    #[serde(default)]
    pub form_values: FormValues,
    /// Field state returned by the previous render.
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub status_code: u16,
    pub is_edit_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer: Option<ExplorerResponse>,
}

impl ContentResponse {
    fn list(list: ListResponse) -> Self {
        Self {
            status_code: 200,
            is_edit_mode: list.is_edit_mode,
            list: Some(list),
            page: None,
            explorer: None,
        }
    }

    fn page(page: PageResponse) -> Self {
        Self {
            status_code: 200,
            is_edit_mode: false,
            list: None,
            page: Some(page),
            explorer: None,
        }
    }

    fn explorer(explorer: ExplorerResponse) -> Self {
        Self {
            status_code: 200,
            is_edit_mode: false,
            list: None,
            page: None,
            explorer: Some(explorer),
        }
    }
}

pub async fn get_content(
    req: HttpRequest,
    body: web::Json<GetContentRequest>,
    state: web::Data<AppState>,
    index: web::Data<SiteTreeIndex>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if request.current_site_id == 0 {
        return Err(ApiError::BadRequest("currentSiteID is required".to_string()));
    }
    let console = console_for(&req, request.current_site_id)?;
    let response = respond(&req, &console, &[], &state, &index, request.current_site_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn post_content(
    req: HttpRequest,
    body: web::Json<PostContentRequest>,
    state: web::Data<AppState>,
    index: web::Data<SiteTreeIndex>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if request.current_site_id == 0 {
        return Err(ApiError::BadRequest("currentSiteID is required".to_string()));
    }
    let Some(posted_field) = request
        .posted_field
        .filter(|value| !value.trim().is_empty())
    else {
        return Err(ApiError::BadRequest("postedField is required".to_string()));
    };

    let mut console = console_for(&req, request.current_site_id)?;
    console.set_save_mode(posted_field == "save");
    console.set_posted_field(Some(posted_field));
    console.submit_form(request.form_values);

    let response = respond(
        &req,
        &console,
        &request.fields,
        &state,
        &index,
        request.current_site_id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(response))
}

fn console_for(req: &HttpRequest, site_id: u32) -> Result<Console, ApiError> {
    let mut console = req.take_console().ok_or_else(|| {
        ApiError::BadRequest(format!("{} header is required", CONSOLE_URL_HEADER))
    })?;
    if console.site_id().is_none() {
        console.set_site_id(site_id);
    }
    Ok(console)
}

async fn respond(
    req: &HttpRequest,
    console: &Console,
    fields: &[Field],
    state: &AppState,
    index: &SiteTreeIndex,
    site_id: u32,
) -> Result<ContentResponse, ApiError> {
    if console.current_list_instance().is_some() {
        let list = state.content.render_list(console, fields).await?;
        return Ok(ContentResponse::list(list));
    }
    if let Some(page) = console.page() {
        return Ok(ContentResponse::page(ContentService::page(page)));
    }
    let snapshot = index.snapshot();
    let resolution = req.resolution();
    Ok(ContentResponse::explorer(ContentService::explore(
        &snapshot,
        resolution.as_ref(),
        site_id,
    )))
}
