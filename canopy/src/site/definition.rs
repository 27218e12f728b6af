// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::NodeType;
use crate::content::ListDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk layout of `state/sites.yaml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SitesFile {
    #[serde(default)]
    pub default_site: Option<u32>,
    #[serde(default)]
    pub sites: Vec<SiteDefinition>,
    /// List behavior keyed by class identifier.
    #[serde(default)]
    pub lists: BTreeMap<String, ListDefinition>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteDefinition {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeDefinition {
    pub id: u32,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub title: String,
}
