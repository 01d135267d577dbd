//! Visual column order and pinned-column geometry.

use crate::table::column::{ColumnDef, PinSide};
use crate::table::state::TableState;

pub struct ResolvedColumn<'a, R> {
    pub def: &'a ColumnDef<R>,
    pub pin: Option<PinSide>,
    pub width: u32,
    /// Sticky offset from the pinned edge (left edge for left pins, right edge for right pins).
    pub offset: Option<u32>,
    /// Last left-pinned or first right-pinned column; carries the separator.
    pub is_pin_boundary: bool,
}

/// Left-pinned columns, then unpinned, then right-pinned. Every group keeps the
/// relative order of `state.column_order`; columns missing from that order are
/// appended in definition order and unknown ids are skipped.
pub fn resolve_columns<'a, R>(columns: &'a [ColumnDef<R>], state: &TableState) -> Vec<ResolvedColumn<'a, R>> {
    let mut ordered: Vec<&ColumnDef<R>> = state
        .column_order
        .iter()
        .filter_map(|id| columns.iter().find(|c| &c.id == id))
        .collect();
    for col in columns {
        if !state.column_order.contains(&col.id) {
            ordered.push(col);
        }
    }

    let resolve = |def: &'a ColumnDef<R>| {
        let width = state
            .column_sizing
            .get(&def.id)
            .map(|w| def.size.clamp(*w))
            .unwrap_or_else(|| def.size.clamp(def.size.size));
        ResolvedColumn {
            def,
            pin: state.pin_side(&def.id),
            width,
            offset: None,
            is_pin_boundary: false,
        }
    };
    let mut left = Vec::new();
    let mut center = Vec::new();
    let mut right = Vec::new();
    for def in ordered {
        let col = resolve(def);
        match col.pin {
            Some(PinSide::Left) => left.push(col),
            Some(PinSide::Right) => right.push(col),
            None => center.push(col),
        }
    }

    let mut offset: u32 = 0;
    for col in left.iter_mut() {
        col.offset = Some(offset);
        offset = offset.saturating_add(col.width);
    }
    if let Some(last) = left.last_mut() {
        last.is_pin_boundary = true;
    }
    let mut offset: u32 = 0;
    for col in right.iter_mut().rev() {
        col.offset = Some(offset);
        offset = offset.saturating_add(col.width);
    }
    if let Some(first) = right.first_mut() {
        first.is_pin_boundary = true;
    }

    left.into_iter().chain(center).chain(right).collect()
}

pub fn total_width<R>(columns: &[ResolvedColumn<'_, R>]) -> u32 {
    columns.iter().fold(0u32, |total, c| total.saturating_add(c.width))
}
