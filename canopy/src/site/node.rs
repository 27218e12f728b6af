// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    List,
    Page,
    Gallery,
    Folder,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::List => "list",
            NodeType::Page => "page",
            NodeType::Gallery => "gallery",
            NodeType::Folder => "folder",
        }
    }
}

/// One addressable node of a site. The node type is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteNode {
    site_id: u32,
    id: u32,
    segments: Vec<String>,
    node_type: NodeType,
    class_identifier: Option<String>,
    title: String,
}

impl SiteNode {
    pub fn new(
        site_id: u32,
        id: u32,
        path: &str,
        node_type: NodeType,
        class_identifier: Option<String>,
        title: impl Into<String>,
    ) -> Result<Self, String> {
        let segments = split_path(path)?;
        if segments.is_empty() {
            return Err(format!("Node {} must not be mapped to the site root", id));
        }
        let class_identifier = class_identifier
            .map(|class| class.trim().to_string())
            .filter(|class| !class.is_empty());
        Ok(Self {
            site_id,
            id,
            segments,
            node_type,
            class_identifier,
            title: title.into(),
        })
    }

    pub fn site_id(&self) -> u32 {
        self.site_id
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn class_identifier(&self) -> Option<&str> {
        self.class_identifier.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Key of the parent node in the site tree. Empty for top-level nodes.
    pub fn parent_key(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Lists bound to the browsing behavior render as folders instead of item editors.
    pub fn is_browsing(&self, browsing_class: &str) -> bool {
        if self.node_type != NodeType::List {
            return false;
        }
        let needle = browsing_class.to_lowercase();
        self.class_identifier
            .as_deref()
            .map(|class| class.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

/// Splits a node path into lowercased segments, dropping empty ones.
pub fn split_path(path: &str) -> Result<Vec<String>, String> {
    let mut segments = Vec::new();
    for raw in path.split('/') {
        if raw.is_empty() {
            continue;
        }
        if raw == "." || raw == ".." {
            return Err(format!("Path '{}' contains a relative segment", path));
        }
        if raw.chars().any(|ch| ch.is_control()) {
            return Err(format!("Path '{}' contains control characters", path));
        }
        segments.push(raw.to_lowercase());
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_lowercased_and_compacted() {
        let node = SiteNode::new(1, 10, "//News/Archive/", NodeType::List, None, "News").unwrap();
        assert_eq!(node.segments(), &["news".to_string(), "archive".to_string()]);
        assert_eq!(node.path(), "/news/archive");
        assert_eq!(node.parent_key(), &["news".to_string()]);
    }

    #[test]
    fn root_and_relative_paths_are_rejected() {
        assert!(SiteNode::new(1, 1, "/", NodeType::Page, None, "Home").is_err());
        assert!(SiteNode::new(1, 1, "/a/../b", NodeType::Page, None, "x").is_err());
    }

    #[test]
    fn browsing_requires_list_and_class_match() {
        let browsing = SiteNode::new(
            1,
            2,
            "/browse",
            NodeType::List,
            Some("Canopy.AppCentre.Browsing".to_string()),
            "Browse",
        )
        .unwrap();
        assert!(browsing.is_browsing("appcentre.browsing"));

        let news = SiteNode::new(
            1,
            3,
            "/news",
            NodeType::List,
            Some("Canopy.AppCentre.News".to_string()),
            "News",
        )
        .unwrap();
        assert!(!news.is_browsing("Canopy.AppCentre.Browsing"));

        let page = SiteNode::new(
            1,
            4,
            "/page",
            NodeType::Page,
            Some("Canopy.AppCentre.Browsing".to_string()),
            "Page",
        )
        .unwrap();
        assert!(!page.is_browsing("Canopy.AppCentre.Browsing"));
    }

    #[test]
    fn blank_class_becomes_none() {
        let node = SiteNode::new(1, 5, "/x", NodeType::List, Some("  ".to_string()), "x").unwrap();
        assert_eq!(node.class_identifier(), None);
    }
}
