// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod definition;
mod node;
mod tree;

pub use definition::{NodeDefinition, SiteDefinition, SitesFile};
pub use node::{NodeType, SiteNode, split_path};
pub use tree::{SiteIndexData, SiteIndexError, SiteLookup, SiteTree, SiteTreeIndex};
