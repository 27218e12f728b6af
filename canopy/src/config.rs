// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::locale::{Culture, DateFormat};
use chrono::FixedOffset;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub console: ConsoleConfig,
    pub assets: AssetsConfig,
    pub locale: ValidatedLocale,
}

/// Console locale settings resolved from their configured names.
#[derive(Debug, Clone)]
pub struct ValidatedLocale {
    pub culture: Culture,
    pub legacy_culture: Culture,
    pub date_format: DateFormat,
    pub canonical_offset: FixedOffset,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Lets `X-Forwarded-Host` replace the request host during URL resolution.
    #[serde(default = "default_use_forwarded_host")]
    pub use_forwarded_host: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            use_forwarded_host: default_use_forwarded_host(),
        }
    }
}

fn default_use_forwarded_host() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConsoleConfig {
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default)]
    pub path_base: String,
    #[serde(default = "default_culture")]
    pub culture: String,
    #[serde(default = "default_legacy_culture")]
    pub legacy_culture: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_browsing_class")]
    pub browsing_class: String,
    #[serde(default = "default_double_columns")]
    pub double_columns: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            path_base: String::new(),
            culture: default_culture(),
            legacy_culture: default_legacy_culture(),
            date_format: default_date_format(),
            utc_offset_minutes: 0,
            browsing_class: default_browsing_class(),
            double_columns: default_double_columns(),
        }
    }
}

fn default_api_prefix() -> String {
    "mkapi".to_string()
}

fn default_culture() -> String {
    "en-GB".to_string()
}

fn default_legacy_culture() -> String {
    "nl-NL".to_string()
}

fn default_date_format() -> String {
    "dd-MM-yyyy".to_string()
}

fn default_browsing_class() -> String {
    "Canopy.AppCentre.Browsing".to_string()
}

fn default_double_columns() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Largest decoded upload accepted by `saveasset`.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// URL prefix of stored asset files.
    #[serde(default = "default_assets_base_url")]
    pub base_url: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            base_url: default_assets_base_url(),
        }
    }
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_assets_base_url() -> String {
    "/assets".to_string()
}

impl ValidatedConfig {
    /// Mount point of the content API, e.g. `/mkapi`.
    pub fn api_scope(&self) -> String {
        format!("/{}", self.console.api_prefix)
    }

    /// JSON body limit for asset uploads, which carry base64 encoded data.
    pub fn asset_json_limit(&self) -> usize {
        self.assets.max_upload_bytes.div_ceil(3) * 4 + 64 * 1024
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| match e {
            ConfigError::LoadError(msg) => ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_logging(&self.logging)?;

        let mut console = self.console;
        console.api_prefix = normalize_api_prefix(&console.api_prefix)?;
        console.path_base = normalize_path_base(&console.path_base)?;

        if console.browsing_class.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "console.browsing_class cannot be empty".to_string(),
            ));
        }

        let locale = Self::validate_locale(&console)?;
        let assets = Self::validate_assets(self.assets)?;

        if !self.security.use_forwarded_host {
            warn!("X-Forwarded-Host is ignored; console URLs resolve against the request host");
        }

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            logging: self.logging,
            security: self.security,
            console,
            assets,
            locale,
        })
    }

    fn validate_assets(mut assets: AssetsConfig) -> Result<AssetsConfig, ConfigError> {
        if assets.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "assets.max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        let base_url = assets.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "assets.base_url cannot be empty".to_string(),
            ));
        }
        assets.base_url = base_url.to_string();
        Ok(assets)
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        match logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(ConfigError::ValidationError(format!(
                "logging.level must be one of trace, debug, info, warn, error or off, got: {}",
                other
            ))),
        }
    }

    fn validate_locale(console: &ConsoleConfig) -> Result<ValidatedLocale, ConfigError> {
        let culture = Culture::lookup(&console.culture).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "console.culture '{}' is not a known culture",
                console.culture
            ))
        })?;
        let legacy_culture = Culture::lookup(&console.legacy_culture).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "console.legacy_culture '{}' is not a known culture",
                console.legacy_culture
            ))
        })?;
        let date_format = DateFormat::parse(&console.date_format).map_err(|e| {
            ConfigError::ValidationError(format!("console.date_format is invalid: {}", e))
        })?;

        if console.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::ValidationError(format!(
                "console.utc_offset_minutes must be between -{} and {}, got: {}",
                MAX_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES, console.utc_offset_minutes
            )));
        }
        let canonical_offset = FixedOffset::east_opt(console.utc_offset_minutes * 60)
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "console.utc_offset_minutes is out of range: {}",
                    console.utc_offset_minutes
                ))
            })?;

        Ok(ValidatedLocale {
            culture,
            legacy_culture,
            date_format,
            canonical_offset,
        })
    }
}

fn normalize_api_prefix(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::ValidationError(
            "console.api_prefix cannot be empty".to_string(),
        ));
    }
    let valid = trimmed
        .split('/')
        .all(|segment| !segment.is_empty() && segment.chars().all(is_path_char));
    if !valid {
        return Err(ConfigError::ValidationError(format!(
            "console.api_prefix contains invalid characters: {}",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_path_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "console.path_base must start with '/', got: {}",
            raw
        )));
    }
    let valid = trimmed[1..]
        .split('/')
        .all(|segment| !segment.is_empty() && segment.chars().all(is_path_char));
    if !valid {
        return Err(ConfigError::ValidationError(format!(
            "console.path_base contains invalid characters: {}",
            raw
        )));
    }
    Ok(trimmed.to_string())
}

fn is_path_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.'
}
