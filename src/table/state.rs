//! Table state owned by the caller: order, pinning, selection, sorting, sizing.

use crate::table::column::{ColumnDef, PinSide};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingRule {
    pub id: String,
    pub desc: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPinning {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub column_order: Vec<String>,
    pub column_pinning: ColumnPinning,
    pub row_selection: BTreeSet<String>,
    pub sorting: Vec<SortingRule>,
    pub column_sizing: HashMap<String, u32>,
}

impl TableState {
    /// Initial state for a column set: definition order, pinning from each column's `pin`.
    pub fn for_columns<R>(columns: &[ColumnDef<R>]) -> Self {
        let mut state = Self {
            column_order: columns.iter().map(|c| c.id.clone()).collect(),
            ..Self::default()
        };
        for col in columns {
            if let Some(side) = col.pin {
                state.pin(&col.id, Some(side));
            }
        }
        state
    }

    pub fn pin_side(&self, column_id: &str) -> Option<PinSide> {
        if self.column_pinning.left.iter().any(|c| c == column_id) {
            Some(PinSide::Left)
        } else if self.column_pinning.right.iter().any(|c| c == column_id) {
            Some(PinSide::Right)
        } else {
            None
        }
    }

    /// Pin to `side`, or unpin with `None`.
    pub fn pin(&mut self, column_id: &str, side: Option<PinSide>) {
        self.column_pinning.left.retain(|c| c != column_id);
        self.column_pinning.right.retain(|c| c != column_id);
        match side {
            Some(PinSide::Left) => self.column_pinning.left.push(column_id.to_string()),
            Some(PinSide::Right) => self.column_pinning.right.push(column_id.to_string()),
            None => {}
        }
    }

    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sorting.iter().find(|s| s.id == column_id).map(|s| {
            if s.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            }
        })
    }

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.row_selection.contains(row_id)
    }

    pub fn toggle_selected(&mut self, row_id: &str) {
        if !self.row_selection.remove(row_id) {
            self.row_selection.insert(row_id.to_string());
        }
    }

    pub fn resize(&mut self, column_id: &str, width: u32) {
        self.column_sizing.insert(column_id.to_string(), width);
    }
}

/// Row click dispatch: selection toggles unless the caller supplies a handler.
pub fn dispatch_row_click<F>(state: &mut TableState, row_id: &str, handler: Option<F>)
where
    F: FnOnce(&mut TableState, &str),
{
    match handler {
        Some(handler) => handler(state, row_id),
        None => state.toggle_selected(row_id),
    }
}
