// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{ListInstance, RequestTarget, ResolutionError, ResolutionResult};
use crate::site::{NodeType, SiteIndexData, SiteLookup, SiteNode};
use log::debug;

/// Maps a request onto a list, a page or the folder browser of one site.
pub struct UrlResolver<'a> {
    index: &'a SiteIndexData,
    browsing_class: &'a str,
}

impl<'a> UrlResolver<'a> {
    pub fn new(index: &'a SiteIndexData, browsing_class: &'a str) -> Self {
        Self {
            index,
            browsing_class,
        }
    }

    /// Fails only on malformed input. Unknown paths resolve to the folder fallback.
    pub fn resolve(&self, target: &RequestTarget) -> Result<ResolutionResult, ResolutionError> {
        let scheme = target.scheme.trim().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ResolutionError::UnsupportedScheme(target.scheme.clone()));
        }

        let host = target.host_name();
        if host.is_empty() {
            return Err(ResolutionError::MissingHost);
        }

        let path = strip_path_base(&target.path, &target.path_base);
        let segments = segment_path(path)?;

        let mut result = ResolutionResult {
            query: target.query.clone(),
            item_id: query_item_id(&target.query),
            ..ResolutionResult::default()
        };

        let Some(site) = self.index.select_site(&host, target.site_hint) else {
            debug!("No site serves host {}; folder fallback", host);
            return Ok(result);
        };
        result.site_id = Some(site.id());

        let Some((node, matched)) = longest_match(site, &segments) else {
            debug!("No node matches {} on site {}", path, site.id());
            return Ok(result);
        };

        match node.node_type() {
            NodeType::List if !node.is_browsing(self.browsing_class) => {
                let from_path = path_item_id(&segments[matched..]);
                if from_path > 0 {
                    result.item_id = from_path;
                }
                let definition = node
                    .class_identifier()
                    .and_then(|class| self.index.lists().get(class));
                debug!(
                    "Resolved {} to list {} (item {})",
                    path,
                    node.path(),
                    result.item_id
                );
                result.list_instance =
                    Some(ListInstance::new(node.clone(), result.item_id, definition));
                result.list = Some(node);
            }
            NodeType::Page => {
                debug!("Resolved {} to page {}", path, node.path());
                result.page = Some(node);
            }
            _ => {
                debug!("Resolved {} to browse location {}", path, node.path());
                result.browse_location = Some(node);
            }
        }

        Ok(result)
    }
}

/// Tries the full path first and drops one trailing segment per miss.
pub fn longest_match<L>(lookup: &L, segments: &[String]) -> Option<(SiteNode, usize)>
where
    L: SiteLookup + ?Sized,
{
    (1..=segments.len())
        .rev()
        .find_map(|len| lookup.lookup(&segments[..len]).map(|node| (node, len)))
}

fn strip_path_base<'p>(path: &'p str, path_base: &str) -> &'p str {
    let base = path_base.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }
    match path.get(..base.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(base) => {
            let rest = &path[base.len()..];
            if rest.is_empty() || rest.starts_with('/') {
                rest
            } else {
                path
            }
        }
        _ => path,
    }
}

fn segment_path(path: &str) -> Result<Vec<String>, ResolutionError> {
    if path.chars().any(char::is_control) {
        return Err(ResolutionError::InvalidPath(
            "path contains control characters".to_string(),
        ));
    }
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(ResolutionError::InvalidPath(
                    "path contains '..' segments".to_string(),
                ));
            }
            other => segments.push(other.to_lowercase()),
        }
    }
    Ok(segments)
}

/// Item ID from the segments after the matched list: `42` or `some-slug-42`.
/// Anything else, including overflow, is 0.
fn path_item_id(trailing: &[String]) -> i32 {
    let Some(last) = trailing.last() else {
        return 0;
    };
    let digits = if is_digits(last) {
        last.as_str()
    } else {
        match last.rsplit_once('-') {
            Some((_, tail)) if is_digits(tail) => tail,
            _ => return 0,
        }
    };
    digits.parse::<i32>().unwrap_or(0)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

fn query_item_id(query: &str) -> i32 {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case("item"))
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .filter(|value| is_digits(value))
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(0)
}
