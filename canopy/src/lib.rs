// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod api;
pub mod app_state;
pub mod asset;
pub mod bootstrap;
pub mod config;
pub mod console;
pub mod content;
pub mod fields;
pub mod headers;
pub mod locale;
pub mod resolve;
pub mod runtime_paths;
pub mod site;
pub mod util;
