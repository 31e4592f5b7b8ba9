//! Reordering engine.
//!
//! Pure functions that compute new `order` values for the rows of one scope
//! (or two scopes, for a cross-scope move). Inputs are slices already sorted
//! by `order`; nothing here touches the database.

use serde::Serialize;
use crate::ordering::Ordered;

/// New order for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    pub id: i64,
    pub previous: i64,
    pub order: i64,
}

impl OrderUpdate {
    fn assign<T: Ordered>(item: &T, order: i64) -> Self {
        Self {
            id: item.id(),
            previous: item.order(),
            order,
        }
    }

    /// Whether writing this update changes the stored row
    pub fn is_change(&self) -> bool {
        self.previous != self.order
    }
}

/// Destination of the row that changes scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopeAssignment {
    pub id: i64,
    pub scope_id: i64,
    pub order: i64,
}

/// Write-set of a cross-scope move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossScopeMove {
    /// Compaction of the scope the row leaves
    pub old_scope: Vec<OrderUpdate>,
    /// Tail shift of the scope the row joins
    pub new_scope: Vec<OrderUpdate>,
    pub moved: ScopeAssignment,
}

/// Order for a row appended to a scope whose current maximum is `max_order`
pub fn compute_append_order(max_order: Option<i64>) -> i64 {
    max_order.map_or(0, |max| max + 1)
}

/// Assign `0..N-1` to the rows remaining in a scope, keeping their relative order
pub fn compute_compaction<T: Ordered>(remaining: &[T]) -> Vec<OrderUpdate> {
    remaining
        .iter()
        .enumerate()
        .map(|(index, item)| OrderUpdate::assign(item, index as i64))
        .collect()
}

/// Splice `moved` into `others` at `target_index` and reindex the whole scope.
///
/// `others` excludes `moved`. The index is clamped to `0..=others.len()`.
pub fn compute_reorder_within_scope<T: Ordered>(
    others: &[T],
    moved: &T,
    target_index: usize,
) -> Vec<OrderUpdate> {
    let target = target_index.min(others.len());

    let mut sequence: Vec<&T> = others.iter().collect();
    sequence.insert(target, moved);

    sequence
        .into_iter()
        .enumerate()
        .map(|(index, item)| OrderUpdate::assign(item, index as i64))
        .collect()
}

/// Move `moved` out of its scope and into `new_scope_id` at `target_index`.
///
/// The old scope is compacted. In the new scope only rows with
/// `order >= target` shift up by one; rows in front of the target keep their
/// order. The index is clamped to `0..=new_items.len()`.
pub fn compute_cross_scope_move<T: Ordered>(
    old_others: &[T],
    new_items: &[T],
    moved: &T,
    new_scope_id: i64,
    target_index: usize,
) -> CrossScopeMove {
    let target = target_index.min(new_items.len()) as i64;

    let new_scope = new_items
        .iter()
        .filter(|item| item.order() >= target)
        .map(|item| OrderUpdate::assign(item, item.order() + 1))
        .collect();

    CrossScopeMove {
        old_scope: compute_compaction(old_others),
        new_scope,
        moved: ScopeAssignment {
            id: moved.id(),
            scope_id: new_scope_id,
            order: target,
        },
    }
}

/// Position of `id` within a scope sorted by order
pub fn position_of<T: Ordered>(items: &[T], id: i64) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Whether a sorted scope holds exactly the orders `0..N-1`
pub fn is_dense<T: Ordered>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.order() == index as i64)
}
