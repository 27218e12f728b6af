// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{NodeType, SiteNode, SitesFile};
use crate::content::ListRegistry;
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Exact-path lookup of nodes within one site.
pub trait SiteLookup {
    fn lookup(&self, segments: &[String]) -> Option<SiteNode>;
}

#[derive(Debug, Clone)]
pub struct SiteTree {
    id: u32,
    name: String,
    hosts: Vec<String>,
    nodes: HashMap<Vec<String>, SiteNode>,
}

impl SiteTree {
    pub fn new(id: u32, name: impl Into<String>, hosts: &[String]) -> Self {
        Self {
            id,
            name: name.into(),
            hosts: hosts
                .iter()
                .map(|host| host.trim().to_lowercase())
                .filter(|host| !host.is_empty())
                .collect(),
            nodes: HashMap::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node. Returns false and keeps the existing node when the path is taken.
    pub fn insert(&mut self, node: SiteNode) -> bool {
        let key = node.segments().to_vec();
        if let Some(existing) = self.nodes.get(&key) {
            warn!(
                "Site {}: duplicate path {} (node {} ignored, node {} kept)",
                self.id,
                node.path(),
                node.id(),
                existing.id()
            );
            return false;
        }
        self.nodes.insert(key, node);
        true
    }

    pub fn get(&self, segments: &[String]) -> Option<&SiteNode> {
        self.nodes.get(segments)
    }

    /// Matches a host name without port, case-insensitively.
    pub fn serves_host(&self, host: &str) -> bool {
        let host = host.trim().to_lowercase();
        self.hosts.iter().any(|candidate| *candidate == host)
    }

    /// Direct children of the given path, ordered by path.
    pub fn children(&self, segments: &[String]) -> Vec<&SiteNode> {
        let mut children: Vec<&SiteNode> = self
            .nodes
            .values()
            .filter(|node| node.parent_key() == segments)
            .collect();
        children.sort_by_key(|node| node.segments().to_vec());
        children
    }

    /// Nodes of one type in path order.
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<&SiteNode> {
        let mut nodes: Vec<&SiteNode> = self
            .nodes
            .values()
            .filter(|node| node.node_type() == node_type)
            .collect();
        nodes.sort_by_key(|node| node.segments().to_vec());
        nodes
    }

    /// Nearest registered ancestor of a node.
    pub fn parent_of(&self, node: &SiteNode) -> Option<&SiteNode> {
        let mut key = node.parent_key();
        while !key.is_empty() {
            if let Some(parent) = self.nodes.get(key) {
                return Some(parent);
            }
            key = &key[..key.len() - 1];
        }
        None
    }
}

impl SiteLookup for SiteTree {
    fn lookup(&self, segments: &[String]) -> Option<SiteNode> {
        self.get(segments).cloned()
    }
}

/// One immutable generation of the site index.
#[derive(Debug, Clone, Default)]
pub struct SiteIndexData {
    sites: BTreeMap<u32, SiteTree>,
    default_site: Option<u32>,
    lists: ListRegistry,
}

impl SiteIndexData {
    pub fn from_file(file: SitesFile) -> Self {
        let mut sites = BTreeMap::new();
        for site in file.sites {
            if sites.contains_key(&site.id) {
                warn!("Duplicate site id {} ignored", site.id);
                continue;
            }
            let mut tree = SiteTree::new(site.id, site.name, &site.hosts);
            for node in site.nodes {
                let title = if node.title.trim().is_empty() {
                    node.path.clone()
                } else {
                    node.title
                };
                match SiteNode::new(site.id, node.id, &node.path, node.node_type, node.class, title)
                {
                    Ok(node) => {
                        tree.insert(node);
                    }
                    Err(message) => warn!("Site {}: skipping node {}: {}", site.id, node.id, message),
                }
            }
            sites.insert(site.id, tree);
        }

        let default_site = match file.default_site {
            Some(id) if sites.contains_key(&id) => Some(id),
            Some(id) => {
                warn!("Default site {} is not defined; falling back to the first site", id);
                sites.keys().next().copied()
            }
            None => sites.keys().next().copied(),
        };

        Self {
            sites,
            default_site,
            lists: ListRegistry::from_definitions(file.lists),
        }
    }

    pub fn site(&self, id: u32) -> Option<&SiteTree> {
        self.sites.get(&id)
    }

    pub fn sites(&self) -> impl Iterator<Item = &SiteTree> {
        self.sites.values()
    }

    pub fn default_site(&self) -> Option<&SiteTree> {
        self.default_site.and_then(|id| self.sites.get(&id))
    }

    pub fn lists(&self) -> &ListRegistry {
        &self.lists
    }

    /// Host match first, then the requested site, then the default site.
    pub fn select_site(&self, host: &str, site_hint: Option<u32>) -> Option<&SiteTree> {
        if let Some(site) = self.sites.values().find(|site| site.serves_host(host)) {
            return Some(site);
        }
        if let Some(site) = site_hint.and_then(|id| self.sites.get(&id)) {
            return Some(site);
        }
        self.default_site()
    }

    pub fn node_count(&self) -> usize {
        self.sites.values().map(SiteTree::len).sum()
    }
}

#[derive(Debug)]
pub enum SiteIndexError {
    Io(std::io::Error),
    Parse(String),
    LockPoisoned,
}

impl fmt::Display for SiteIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteIndexError::Io(err) => write!(f, "Failed to read site definitions: {}", err),
            SiteIndexError::Parse(msg) => write!(f, "Failed to parse site definitions: {}", msg),
            SiteIndexError::LockPoisoned => write!(f, "Site index lock poisoned"),
        }
    }
}

impl std::error::Error for SiteIndexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiteIndexError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SiteIndexError {
    fn from(err: std::io::Error) -> Self {
        SiteIndexError::Io(err)
    }
}

/// Process-wide site index. Readers take a snapshot; rebuilds swap in a whole new generation.
#[derive(Clone)]
pub struct SiteTreeIndex {
    data: Arc<RwLock<Arc<SiteIndexData>>>,
    sites_file: PathBuf,
}

impl SiteTreeIndex {
    pub fn new(sites_file: PathBuf) -> Self {
        Self {
            data: Arc::new(RwLock::new(Arc::new(SiteIndexData::default()))),
            sites_file,
        }
    }

    pub fn from_data(data: SiteIndexData) -> Self {
        Self {
            data: Arc::new(RwLock::new(Arc::new(data))),
            sites_file: PathBuf::new(),
        }
    }

    pub fn snapshot(&self) -> Arc<SiteIndexData> {
        match self.data.read() {
            Ok(data) => data.clone(),
            Err(poisoned) => {
                error!("🚨 CRITICAL: SiteTreeIndex read lock poisoned in snapshot");
                poisoned.into_inner().clone()
            }
        }
    }

    /// Reloads `sites.yaml` and swaps the new generation in.
    pub async fn rebuild(&self) -> Result<usize, SiteIndexError> {
        debug!("Rebuilding site index from {}", self.sites_file.display());
        let content = tokio::fs::read_to_string(&self.sites_file).await?;
        let file: SitesFile =
            serde_yaml::from_str(&content).map_err(|e| SiteIndexError::Parse(e.to_string()))?;
        let data = SiteIndexData::from_file(file);
        let nodes = data.node_count();
        self.replace(data)?;
        info!("Site index loaded: {} nodes", nodes);
        Ok(nodes)
    }

    pub fn replace(&self, data: SiteIndexData) -> Result<(), SiteIndexError> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(_) => {
                error!("🚨 CRITICAL: SiteTreeIndex write lock poisoned during rebuild");
                return Err(SiteIndexError::LockPoisoned);
            }
        };
        *guard = Arc::new(data);
        Ok(())
    }
}
