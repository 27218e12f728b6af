// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::store::{ContentStore, StoreError};
use crate::console::Console;
use crate::fields::{
    ApiField, ContentField, ControlBuilder, Field, FieldError, LayoutState, build_field,
};
use crate::resolve::ResolutionResult;
use crate::site::{SiteIndexData, SiteNode};

#[derive(Debug)]
pub enum ContentError {
    NoList,
    ItemNotFound { list_id: u32, item_id: i32 },
    Field(FieldError),
    Store(StoreError),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::NoList => write!(f, "The request did not resolve to a list"),
            ContentError::ItemNotFound { list_id, item_id } => {
                write!(f, "Item {} does not exist in list {}", item_id, list_id)
            }
            ContentError::Field(err) => write!(f, "Field error: {}", err),
            ContentError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Field(err) => Some(err),
            ContentError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for ContentError {
    fn from(err: FieldError) -> Self {
        ContentError::Field(err)
    }
}

impl From<StoreError> for ContentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { list_id, item_id } => {
                ContentError::ItemNotFound { list_id, item_id }
            }
            other => ContentError::Store(other),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub list_id: u32,
    pub title: String,
    pub item_id: i32,
    pub is_edit_mode: bool,
    pub is_valid: bool,
    pub saved: bool,
    pub posted_field: Option<String>,
    pub html: String,
    pub cloaked: String,
    pub fields: Vec<ApiField>,
    /// Serialized field state to send back with the next post.
    pub values: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: u32,
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: &'static str,
}

impl From<&SiteNode> for NodeSummary {
    fn from(node: &SiteNode) -> Self {
        Self {
            id: node.id(),
            title: node.title().to_string(),
            path: node.path(),
            node_type: node.node_type().as_str(),
        }
    }
}

pub type PageResponse = NodeSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerResponse {
    pub site_id: Option<u32>,
    pub site_name: Option<String>,
    pub location: Option<NodeSummary>,
    /// Ancestors of the location, outermost first.
    pub trail: Vec<NodeSummary>,
    pub items: Vec<NodeSummary>,
}

/// Drives the field state machine for the list a console resolved to.
pub struct ContentService {
    store: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Loads the current item, runs every field through one render pass and, in save
    /// mode with all fields valid, persists the record.
    pub async fn render_list(
        &self,
        console: &Console,
        posted_fields: &[Field],
    ) -> Result<ListResponse, ContentError> {
        let instance = console
            .current_list_instance()
            .ok_or(ContentError::NoList)?;
        let list = instance.list();
        let list_id = list.id();
        let item_id = console.item();
        let is_edit_mode = item_id > 0 || console.is_postback();

        let definitions = match instance.definition() {
            Some(definition) => definition.fields.clone(),
            None => {
                warn!(
                    "List {} has no definition for class {:?}; rendering without fields",
                    list.path(),
                    list.class_identifier()
                );
                Vec::new()
            }
        };
        let title = instance
            .definition()
            .map(|definition| definition.title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| list.title().to_string());

        let mut record = self.store.load(list_id, item_id).await?;
        let posted: HashMap<&str, &Field> = posted_fields
            .iter()
            .map(|field| (field.id.as_str(), field))
            .collect();

        let mut fields: Vec<Box<dyn ContentField>> =
            definitions.into_iter().map(build_field).collect();
        for field in fields.iter_mut() {
            let previous = posted.get(field.id()).copied();
            field.set_candidate(console, &mut record, previous, is_edit_mode)?;
        }

        let mut builder = ControlBuilder::new();
        let mut layout = LayoutState::new();
        let mut values = Vec::with_capacity(fields.len());
        for field in fields.iter_mut() {
            let is_required = field.definition().mandatory;
            let is_cloaked = field.definition().cloaked;
            let outcome = field.write_candidate(
                &mut builder,
                console,
                layout,
                is_edit_mode,
                is_required,
                is_cloaked,
            );
            layout = outcome.layout;
            values.push(outcome.field);
        }
        layout.finish(&mut builder);

        let is_valid = fields.iter_mut().all(|field| {
            let is_required = field.definition().mandatory;
            field.is_valid(console, is_required)
        });

        let mut saved = false;
        let mut item_id = item_id;
        if console.is_save_mode() {
            if is_valid {
                item_id = self.store.save(list_id, item_id, record).await?;
                saved = true;
                info!("Saved item {} of list {}", item_id, list.path());
            } else {
                debug!("Item {} of list {} not saved: invalid fields", item_id, list.path());
            }
        }

        let (html, cloaked, api_fields) = builder.into_parts();
        Ok(ListResponse {
            list_id,
            title,
            item_id,
            is_edit_mode,
            is_valid,
            saved,
            posted_field: console.posted_field().map(str::to_string),
            html,
            cloaked,
            fields: api_fields,
            values,
        })
    }

    pub fn page(node: &SiteNode) -> PageResponse {
        NodeSummary::from(node)
    }

    /// Lists the children of the browse location, or of the site root when nothing matched.
    pub fn explore(
        index: &SiteIndexData,
        resolution: Option<&ResolutionResult>,
        site_id: u32,
    ) -> ExplorerResponse {
        let site_id = resolution
            .and_then(|resolution| resolution.site_id)
            .unwrap_or(site_id);
        let location = resolution.and_then(|resolution| resolution.browse_location.as_ref());
        let Some(site) = index.site(site_id) else {
            return ExplorerResponse {
                site_id: None,
                site_name: None,
                location: location.map(NodeSummary::from),
                trail: Vec::new(),
                items: Vec::new(),
            };
        };

        let mut trail = Vec::new();
        let mut current = location.and_then(|node| site.parent_of(node));
        while let Some(parent) = current {
            trail.push(NodeSummary::from(parent));
            current = site.parent_of(parent);
        }
        trail.reverse();

        ExplorerResponse {
            site_id: Some(site.id()),
            site_name: Some(site.name().to_string()),
            location: location.map(NodeSummary::from),
            trail,
            items: site
                .children(location.map(SiteNode::segments).unwrap_or(&[]))
                .into_iter()
                .map(NodeSummary::from)
                .collect(),
        }
    }
}
