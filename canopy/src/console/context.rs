// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::ConsoleSettings;
use crate::resolve::{ListInstance, ResolutionResult};
use crate::site::SiteNode;
use chrono::{NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Submitted form values keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Resolution context of one console request. Owned by the request, never shared.
#[derive(Debug, Clone)]
pub struct Console {
    settings: ConsoleSettings,
    site_id: Option<u32>,
    current_list: Option<SiteNode>,
    current_list_instance: Option<ListInstance>,
    page: Option<SiteNode>,
    item: i32,
    posted_field: Option<String>,
    form: FormValues,
    is_postback: bool,
    is_save_mode: bool,
}

impl Console {
    pub fn new(settings: ConsoleSettings) -> Self {
        Self {
            settings,
            site_id: None,
            current_list: None,
            current_list_instance: None,
            page: None,
            item: 0,
            posted_field: None,
            form: FormValues::new(),
            is_postback: false,
            is_save_mode: false,
        }
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// Copies a resolution onto the console. Absent parts leave the current value in place;
    /// the item id is always taken over.
    pub fn apply_resolution(&mut self, result: &ResolutionResult) {
        if let Some(site_id) = result.site_id {
            self.site_id = Some(site_id);
        }
        if let Some(list) = &result.list {
            self.current_list = Some(list.clone());
        }
        if let Some(instance) = &result.list_instance {
            self.current_list_instance = Some(instance.clone());
        }
        if let Some(page) = &result.page {
            self.page = Some(page.clone());
        }
        self.item = result.item_id;
    }

    pub fn set_site_id(&mut self, site_id: u32) {
        self.site_id = Some(site_id);
    }

    /// Blank values clear the posted field.
    pub fn set_posted_field(&mut self, posted_field: Option<String>) {
        self.posted_field = posted_field.filter(|value| !value.trim().is_empty());
    }

    /// Stores submitted values and marks the request as a post back.
    pub fn submit_form(&mut self, form: FormValues) {
        self.form = form;
        self.is_postback = true;
    }

    pub fn set_save_mode(&mut self, save: bool) {
        self.is_save_mode = save;
    }

    pub fn site_id(&self) -> Option<u32> {
        self.site_id
    }

    pub fn current_list(&self) -> Option<&SiteNode> {
        self.current_list.as_ref()
    }

    pub fn current_list_instance(&self) -> Option<&ListInstance> {
        self.current_list_instance.as_ref()
    }

    pub fn page(&self) -> Option<&SiteNode> {
        self.page.as_ref()
    }

    pub fn item(&self) -> i32 {
        self.item
    }

    pub fn posted_field(&self) -> Option<&str> {
        self.posted_field.as_deref()
    }

    pub fn is_postback(&self) -> bool {
        self.is_postback
    }

    pub fn is_initial_load(&self) -> bool {
        !self.is_postback
    }

    pub fn is_save_mode(&self) -> bool {
        self.is_save_mode
    }

    /// Submitted value for a field; empty submissions count as missing.
    pub fn form(&self, id: &str) -> Option<&str> {
        self.form.get(id).filter(|value| !value.is_empty())
    }

    /// True when the current list stores dates in the canonical zone.
    pub fn converts_to_canonical_time(&self) -> bool {
        self.current_list_instance
            .as_ref()
            .and_then(ListInstance::definition)
            .map(|definition| definition.convert_to_canonical_time)
            .unwrap_or(false)
    }

    /// Reads a naive value as local time at the configured offset and returns it as UTC.
    pub fn to_canonical(&self, local: NaiveDateTime) -> NaiveDateTime {
        self.settings
            .canonical_offset
            .from_local_datetime(&local)
            .single()
            .map(|value| value.naive_utc())
            .unwrap_or(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ListDefinition;
    use crate::site::NodeType;
    use crate::util::{TestConfigBuilder, test_config};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn console() -> Console {
        Console::new(ConsoleSettings::from_config(&test_config()))
    }

    fn list_node() -> SiteNode {
        SiteNode::new(
            1,
            10,
            "/news",
            NodeType::List,
            Some("Canopy.News".to_string()),
            "News",
        )
        .unwrap()
    }

    fn list_result(convert: bool) -> ResolutionResult {
        let definition = ListDefinition {
            convert_to_canonical_time: convert,
            ..ListDefinition::default()
        };
        ResolutionResult {
            site_id: Some(1),
            list: Some(list_node()),
            list_instance: Some(ListInstance::new(list_node(), 42, Some(Arc::new(definition)))),
            item_id: 42,
            ..ResolutionResult::default()
        }
    }

    #[test]
    fn apply_resolution_keeps_existing_parts_and_always_sets_item() {
        let mut console = console();
        console.apply_resolution(&list_result(false));
        assert_eq!(console.item(), 42);

        let fallback = ResolutionResult::default();
        console.apply_resolution(&fallback);
        assert!(console.current_list().is_some());
        assert!(console.current_list_instance().is_some());
        assert_eq!(console.item(), 0);
        assert_eq!(console.site_id(), Some(1));
    }

    #[test]
    fn apply_resolution_is_idempotent() {
        let mut once = console();
        once.apply_resolution(&list_result(false));
        let mut twice = console();
        twice.apply_resolution(&list_result(false));
        twice.apply_resolution(&list_result(false));
        assert_eq!(once.item(), twice.item());
        assert_eq!(
            once.current_list().map(SiteNode::path),
            twice.current_list().map(SiteNode::path)
        );
        assert_eq!(
            once.current_list_instance().map(ListInstance::item_id),
            twice.current_list_instance().map(ListInstance::item_id)
        );
    }

    #[test]
    fn blank_posted_field_is_cleared() {
        let mut console = console();
        console.set_posted_field(Some("save".to_string()));
        assert_eq!(console.posted_field(), Some("save"));
        console.set_posted_field(Some("  ".to_string()));
        assert_eq!(console.posted_field(), None);
    }

    #[test]
    fn empty_form_values_count_as_missing() {
        let mut console = console();
        assert!(console.is_initial_load());
        console.submit_form(FormValues::from_iter([("a", ""), ("b", "x")]));
        assert!(!console.is_initial_load());
        assert_eq!(console.form("a"), None);
        assert_eq!(console.form("b"), Some("x"));
        assert_eq!(console.form("c"), None);
    }

    #[test]
    fn canonical_conversion_uses_offset() {
        let config = TestConfigBuilder::new().with_utc_offset_minutes(120).build();
        let mut console = Console::new(ConsoleSettings::from_config(&config));
        assert!(!console.converts_to_canonical_time());
        console.apply_resolution(&list_result(true));
        assert!(console.converts_to_canonical_time());

        let local = NaiveDate::from_ymd_opt(2019, 3, 14)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2019, 3, 13)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert_eq!(console.to_canonical(local), expected);
    }
}
