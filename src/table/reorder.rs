//! Column drag-to-reorder on the horizontal axis.

/// Move `active_id` to the position of `over_id`. No-op (returns false) when
/// the ids are equal or either is absent from `order`, e.g. a column removed
/// while it was being dragged. The result is always a permutation of the input.
pub fn on_column_drag_end(order: &mut Vec<String>, active_id: &str, over_id: &str) -> bool {
    if active_id == over_id {
        return false;
    }
    let (Some(from), Some(to)) = (
        order.iter().position(|id| id == active_id),
        order.iter().position(|id| id == over_id),
    ) else {
        return false;
    };
    array_move(order, from, to);
    true
}

/// Remove the item at `from` and insert it at `to`.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
