// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use crate::runtime_paths::RuntimePaths;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub(crate) const DEMO_LIST_CLASS: &str = "Canopy.News";
pub(crate) const DEMO_LIST_ID: u32 = 10;

const DEMO_SITES_YAML: &str = r#"default_site: 1
sites:
  - id: 1
    name: "Main"
    hosts: ["localhost", "127.0.0.1"]
    nodes:
      - { id: 10, path: "/news", type: list, class: "Canopy.News", title: "News" }
      - { id: 11, path: "/news/archive", type: folder, title: "Archive" }
      - { id: 12, path: "/about", type: page, title: "About us" }
      - { id: 13, path: "/documents", type: gallery, title: "Documents" }
lists:
  Canopy.News:
    title: "News"
    fields:
      - { id: headline, title: "Headline", content_type: text, mandatory: true }
      - { id: publish, title: "Publish on", content_type: date, mandatory: true, expression: left }
      - { id: expires, title: "Expires on", content_type: date, expression: right, bag: data }
      - { id: price, title: "Price", content_type: number, bag: data }
"#;

const DEMO_CONTENT_YAML: &str = r#"records:
  - list: 10
    item: 1
    properties:
      headline: "Welcome to Canopy"
      publish: { date: "2025-01-06T00:00:00" }
      data:
        expires: "638869248000000000"
        price: "0"
"#;

/// Resolves the runtime paths and writes the demo site on first run.
/// Returns whether `sites.yaml` was created.
pub fn ensure_paths(root: &Path) -> Result<(RuntimePaths, bool), BootstrapError> {
    let runtime_paths = RuntimePaths::from_root(root).map_err(BootstrapError::Config)?;

    let created_sites = write_if_missing(&runtime_paths.sites_file, DEMO_SITES_YAML)?;
    if created_sites {
        log_action(format!(
            "created demo site definitions at {}",
            runtime_paths.sites_file.display()
        ));
        if write_if_missing(&runtime_paths.content_file, DEMO_CONTENT_YAML)? {
            log_action(format!(
                "created demo content at {}",
                runtime_paths.content_file.display()
            ));
        }
    }

    Ok((runtime_paths, created_sites))
}

fn write_if_missing(path: &Path, contents: &str) -> Result<bool, BootstrapError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(true)
}
