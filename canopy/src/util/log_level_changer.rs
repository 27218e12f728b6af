// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Rewrites records from targets under `target_prefix` logged at `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    pub target_prefix: String,
    pub from: Level,
    pub to: Level,
}

impl LevelRule {
    pub fn new(target_prefix: &str, from: Level, to: Level) -> Self {
        Self {
            target_prefix: target_prefix.to_string(),
            from,
            to,
        }
    }

    fn applies(&self, target: &str, level: Level) -> bool {
        self.from == level && target.starts_with(&self.target_prefix)
    }
}

/// Worker start/stop chatter from actix is demoted so `info` stays about console traffic.
pub fn default_rules() -> Vec<LevelRule> {
    vec![
        LevelRule::new("actix_server::builder", Level::Info, Level::Debug),
        LevelRule::new("actix_server::worker", Level::Info, Level::Debug),
        LevelRule::new("actix_server::accept", Level::Info, Level::Debug),
    ]
}

struct LevelModifierLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl LevelModifierLogger {
    fn level_for(&self, target: &str, level: Level) -> Level {
        self.rules
            .iter()
            .find(|rule| rule.applies(target, level))
            .map(|rule| rule.to)
            .unwrap_or(level)
    }
}

impl Log for LevelModifierLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = self.level_for(metadata.target(), metadata.level());
        let adjusted = Metadata::builder()
            .level(level)
            .target(metadata.target())
            .build();
        self.inner.enabled(&adjusted)
    }

    fn log(&self, record: &Record) {
        let level = self.level_for(record.target(), record.level());
        let adjusted = Record::builder()
            .level(level)
            .target(record.target())
            .args(*record.args())
            .module_path(record.module_path())
            .file(record.file())
            .line(record.line())
            .build();
        self.inner.log(&adjusted);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn init_logger(rules: Vec<LevelRule>, logger: Logger) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(LevelModifierLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let logger = LevelModifierLogger {
            inner: env_logger::Builder::new().build(),
            rules: vec![
                LevelRule::new("actix_server", Level::Info, Level::Debug),
                LevelRule::new("actix_server::worker", Level::Info, Level::Trace),
            ],
        };
        assert_eq!(
            logger.level_for("actix_server::worker", Level::Info),
            Level::Debug
        );
        assert_eq!(
            logger.level_for("actix_server::worker", Level::Warn),
            Level::Warn
        );
        assert_eq!(logger.level_for("canopy::api", Level::Info), Level::Info);
    }
}
