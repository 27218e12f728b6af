// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod registry;
mod service;
mod store;

pub use registry::{ListDefinition, ListRegistry};
pub use service::{
    ContentError, ContentService, ExplorerResponse, ListResponse, NodeSummary, PageResponse,
};
pub use store::{ContentStore, MemoryContentStore, StoreError};
