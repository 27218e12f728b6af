// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_HTTP_PORT: u16 = 7080;
const DEFAULT_WORKERS: u16 = 4;

pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let config_path = root.join("config.yaml");

    if config_path.exists() {
        return Ok(false);
    }

    let contents = default_config_yaml();

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(BootstrapError::Io(err)),
    };

    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log_action(format!("created config.yaml (http {})", DEFAULT_HTTP_PORT));

    Ok(true)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"127.0.0.1\"\n  port: {http_port}\n  workers: {workers}\n\nlogging:\n  level: \"info\"\n\nsecurity:\n  use_forwarded_host: true\n\nconsole:\n  api_prefix: \"mkapi\"\n  path_base: \"\"\n  culture: \"en-GB\"\n  legacy_culture: \"nl-NL\"\n  date_format: \"dd-MM-yyyy\"\n  utc_offset_minutes: 0\n  double_columns: true\n\nassets:\n  max_upload_bytes: 10485760\n  base_url: \"/assets\"\n\napp:\n  name: \"Canopy\"\n  description: \"Content console\"\n",
        http_port = DEFAULT_HTTP_PORT,
        workers = DEFAULT_WORKERS,
    )
}
