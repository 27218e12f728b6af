// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    AppConfig, AssetsConfig, Config, ConsoleConfig, LoggingConfig, SecurityConfig, ServerConfig,
    ValidatedConfig,
};

#[derive(Debug)]
pub struct TestConfigBuilder {
    config: Config,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5466,
                    workers: 1,
                },
                app: AppConfig {
                    name: "Test App".to_string(),
                    description: "Test Description".to_string(),
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                security: SecurityConfig::default(),
                console: ConsoleConfig::default(),
                assets: AssetsConfig::default(),
            },
        }
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.config.console.api_prefix = prefix.to_string();
        self
    }

    pub fn with_path_base(mut self, path_base: &str) -> Self {
        self.config.console.path_base = path_base.to_string();
        self
    }

    pub fn with_culture(mut self, culture: &str) -> Self {
        self.config.console.culture = culture.to_string();
        self
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.config.console.date_format = format.to_string();
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.config.console.utc_offset_minutes = minutes;
        self
    }

    pub fn with_double_columns(mut self, enabled: bool) -> Self {
        self.config.console.double_columns = enabled;
        self
    }

    pub fn with_forwarded_host(mut self, enabled: bool) -> Self {
        self.config.security.use_forwarded_host = enabled;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.assets.max_upload_bytes = bytes;
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
            .validate()
            .expect("test configuration should validate")
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
