// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Table layout of the edit form. Each field occupies a full row or one half of a
//! two-column row; `LayoutState` remembers the previous field's placement so a
//! half row left open is closed with a filler cell.

use super::{ControlBuilder, OutputExpression};

const FILLER_CLOSE_ROW: &str = "<th><label>&nbsp;</label></th><td>&nbsp;</td></tr>";
const FILLER_OPEN_ROW: &str = "<tr><th><label>&nbsp;</label></th><td>&nbsp;</td>";

/// Pieces of markup for one wrapped field cell. `label`, `error_html` and `element` are already escaped.
#[derive(Debug, Clone, Copy)]
pub struct CellMarkup<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub expression: OutputExpression,
    pub has_double_cols: bool,
    pub is_valid: bool,
    pub error_html: &'a str,
    pub element: &'a str,
    /// Inherited display text; switches the cell to the translation row layout.
    pub inherited: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    previous: OutputExpression,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            previous: OutputExpression::FullWidth,
        }
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> OutputExpression {
        self.previous
    }

    /// Writes one wrapped cell and returns the state for the next field.
    pub fn wrap(self, builder: &mut ControlBuilder, cell: &CellMarkup<'_>) -> LayoutState {
        if let Some(inherited) = cell.inherited {
            return self.wrap_translation(builder, cell, inherited);
        }

        let current = cell.expression;
        let previous = self.previous;

        if previous == OutputExpression::Left
            && matches!(current, OutputExpression::FullWidth | OutputExpression::Left)
        {
            builder.append(FILLER_CLOSE_ROW);
        }
        if matches!(previous, OutputExpression::FullWidth | OutputExpression::Right)
            && current == OutputExpression::Right
        {
            builder.append(FILLER_OPEN_ROW);
        }
        if matches!(current, OutputExpression::FullWidth | OutputExpression::Left) {
            builder.append("<tr>");
        }

        builder.append(&label_cell(cell));

        let colspan = if current == OutputExpression::FullWidth && cell.has_double_cols {
            " colspan=\"3\""
        } else {
            ""
        };
        let width = if current == OutputExpression::FullWidth {
            "long"
        } else {
            "half"
        };
        builder.append(&format!(
            "<td{}{}>{}<div class=\"{}\">{}</div></td>",
            colspan,
            cell_class(cell.is_valid),
            cell.error_html,
            width,
            cell.element
        ));

        if matches!(current, OutputExpression::FullWidth | OutputExpression::Right) {
            builder.append("</tr>");
        }

        LayoutState { previous: current }
    }

    /// Closes a half row left open by a trailing `Left` field.
    pub fn finish(self, builder: &mut ControlBuilder) -> LayoutState {
        if self.previous == OutputExpression::Left {
            builder.append(FILLER_CLOSE_ROW);
        }
        LayoutState::default()
    }

    fn wrap_translation(
        self,
        builder: &mut ControlBuilder,
        cell: &CellMarkup<'_>,
        inherited: &str,
    ) -> LayoutState {
        let finished = self.finish(builder);
        builder.append("<tr>");
        builder.append(&label_cell(cell));
        builder.append(&format!(
            "<td class=\"inherited\"><div class=\"half\">{}</div></td>",
            if inherited.is_empty() { "&nbsp;" } else { inherited }
        ));
        builder.append(&format!(
            "<td{}>{}<div class=\"half\">{}</div></td></tr>",
            cell_class(cell.is_valid),
            cell.error_html,
            cell.element
        ));
        finished
    }
}

fn label_cell(cell: &CellMarkup<'_>) -> String {
    format!(
        "<th><label for=\"{}\">{}</label></th>",
        cell.id, cell.label
    )
}

fn cell_class(is_valid: bool) -> &'static str {
    if is_valid { "" } else { " class=\"error\"" }
}
