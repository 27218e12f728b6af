// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// Inbound request tuple the resolver works from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTarget {
    pub scheme: String,
    pub host: String,
    pub path_base: String,
    pub path: String,
    /// Everything after the first `?`, verbatim.
    pub query: String,
    pub forwarded_host: Option<String>,
    pub posted_field: Option<String>,
    pub site_hint: Option<u32>,
}

impl RequestTarget {
    pub fn new(scheme: &str, host: &str, path_base: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            path_base: path_base.to_string(),
            ..Self::default()
        }
    }

    /// Splits a console URL on its first `?` into path and query.
    pub fn with_url(mut self, url: &str) -> Self {
        match url.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_string();
                self.query = query.to_string();
            }
            None => {
                self.path = url.to_string();
                self.query = String::new();
            }
        }
        self
    }

    pub fn with_forwarded_host(mut self, forwarded_host: Option<String>) -> Self {
        self.forwarded_host = forwarded_host;
        self
    }

    pub fn with_posted_field(mut self, posted_field: Option<String>) -> Self {
        self.posted_field = posted_field;
        self
    }

    pub fn with_site_hint(mut self, site_hint: Option<u32>) -> Self {
        self.site_hint = site_hint;
        self
    }

    /// The forwarded host when one was sent, else the request host.
    /// Only the first entry of a comma separated forwarded list counts.
    pub fn effective_host(&self) -> &str {
        let forwarded = self
            .forwarded_host
            .as_deref()
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match forwarded {
            Some(host) => host,
            None => self.host.trim(),
        }
    }

    /// Effective host without port, lowercased.
    pub fn host_name(&self) -> String {
        strip_port(self.effective_host()).to_lowercase()
    }
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // bracketed IPv6 literal
        return match rest.find(']') {
            Some(end) => &rest[..end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}
