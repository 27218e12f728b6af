// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::ListDefinition;
use crate::site::SiteNode;
use std::fmt;
use std::sync::Arc;

/// Request-scoped binding of a list node to the item being viewed.
#[derive(Debug, Clone)]
pub struct ListInstance {
    list: SiteNode,
    item_id: i32,
    definition: Option<Arc<ListDefinition>>,
}

impl ListInstance {
    pub fn new(list: SiteNode, item_id: i32, definition: Option<Arc<ListDefinition>>) -> Self {
        Self {
            list,
            item_id,
            definition,
        }
    }

    pub fn list(&self) -> &SiteNode {
        &self.list
    }

    pub fn item_id(&self) -> i32 {
        self.item_id
    }

    /// Field layout and behavior registered for the list's class, if any.
    pub fn definition(&self) -> Option<&Arc<ListDefinition>> {
        self.definition.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    pub site_id: Option<u32>,
    pub list: Option<SiteNode>,
    pub list_instance: Option<ListInstance>,
    pub page: Option<SiteNode>,
    pub item_id: i32,
    /// Node shown by the folder browser when nothing more specific matched.
    pub browse_location: Option<SiteNode>,
    pub query: String,
}

impl ResolutionResult {
    pub fn is_folder_fallback(&self) -> bool {
        self.list.is_none() && self.page.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    UnsupportedScheme(String),
    MissingHost,
    InvalidPath(String),
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported URL scheme: {}", scheme)
            }
            ResolutionError::MissingHost => write!(f, "Request host is empty"),
            ResolutionError::InvalidPath(reason) => write!(f, "Malformed path: {}", reason),
        }
    }
}

impl std::error::Error for ResolutionError {}
