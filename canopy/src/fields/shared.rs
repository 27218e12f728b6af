// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

/// Overlay applied to a field whose value is shared across items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SharedFieldInfo {
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub output_value_override: Option<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveState {
    pub is_enabled: bool,
    pub is_cloaked: bool,
    pub output_text: Option<String>,
}

/// Combines a field's own render state with its shared overlay.
pub fn resolve_overlay(
    shared: Option<&SharedFieldInfo>,
    is_enabled: bool,
    is_cloaked: bool,
    output_text: Option<String>,
) -> EffectiveState {
    let base = EffectiveState {
        is_enabled,
        is_cloaked,
        output_text,
    };
    let Some(info) = shared.filter(|info| info.is_shared) else {
        return base;
    };

    let output_text = match info.output_value_override.as_deref() {
        Some(value) if !value.trim().is_empty() => Some(value.to_string()),
        _ => base.output_text,
    };

    EffectiveState {
        is_enabled: info.is_enabled,
        is_cloaked: base.is_cloaked || info.is_hidden,
        output_text,
    }
}

/// Base check for shared fields: a shared field the overlay locks must carry a shared value.
/// Unshared, editable and hidden fields pass.
pub fn shared_field_is_valid(shared: Option<&SharedFieldInfo>) -> bool {
    let Some(info) = shared.filter(|info| info.is_shared) else {
        return true;
    };
    if info.is_enabled || info.is_hidden {
        return true;
    }
    info.output_value_override
        .as_deref()
        .is_some_and(|value| !value.trim().is_empty())
}
