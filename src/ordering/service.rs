use rusqlite::Connection;
use std::marker::PhantomData;
use crate::db::with_transaction;
use crate::error::{BoardError, Result};
use crate::models::Principal;
use crate::ordering::engine::{
    compute_append_order, compute_compaction, compute_cross_scope_move,
    compute_reorder_within_scope, is_dense, position_of,
};
use crate::ordering::{Ordered, OrderedKind};
use crate::repo::OrderedRepo;

/// Collection service for one ordered entity kind
///
/// Implements the operations a board UI calls after create dialogs, delete
/// actions and drag-and-drop gestures:
/// - Listing a scope (seeding defaults into an empty one)
/// - Appending to the end of a scope
/// - Removing and compacting the remaining siblings
/// - Reordering within a scope
/// - Moving to another scope at a given index
///
/// Checks run in a fixed order: payload validation (no database access),
/// then one immediate transaction that reads the row, checks existence
/// and ownership, and holds every sibling read and write. The density
/// invariant holds after every successful call, and a failed call leaves
/// the database as it was.
///
/// # Example
///
/// ```no_run
/// use funnelboard::db::DbConnection;
/// use funnelboard::models::{Principal, TaskPayload};
/// use funnelboard::ordering::Collection;
/// use funnelboard::repo::{TaskColumnKind, TaskKind, UserRepo};
///
/// let conn = DbConnection::connect().unwrap();
/// let user = UserRepo::create(&conn, "Ada").unwrap();
/// let me = Principal::new(user.id);
/// let columns = Collection::<TaskColumnKind>::list(&conn, user.id, &me).unwrap();
/// let task = Collection::<TaskKind>::append(&conn, columns[0].id, &TaskPayload::new("Draft brief"), &me).unwrap();
/// Collection::<TaskKind>::move_to(&conn, task.id, columns[1].id, 0, &me).unwrap();
/// ```
pub struct Collection<K>(PhantomData<K>);

impl<K: OrderedKind> Collection<K> {
    /// Fail unless the scope exists and the principal owns its parent
    fn authorize_scope(conn: &Connection, scope_id: i64, principal: &Principal) -> Result<()> {
        match K::scope_owner(conn, scope_id)? {
            None => Err(BoardError::NotFound { resource: K::SCOPE_NAME, id: scope_id }),
            Some(owner) if !principal.owns(owner) => {
                log::debug!(
                    "User {} denied access to {} {}",
                    principal.user_id, K::SCOPE_NAME, scope_id
                );
                Err(BoardError::Unauthorized { resource: K::SCOPE_NAME, id: scope_id })
            }
            Some(_) => Ok(()),
        }
    }

    /// Load an item and check the principal owns its scope
    fn authorize_item(conn: &Connection, item_id: i64, principal: &Principal) -> Result<K::Item> {
        let item = OrderedRepo::<K>::require(conn, item_id)?;
        Self::authorize_scope(conn, item.scope_id(), principal)?;
        Ok(item)
    }

    /// List a scope sorted by order.
    ///
    /// When the kind defines default rows and the scope is empty, they are
    /// created (orders `0..k-1`) in the same transaction as the read, so a
    /// second listing finds them instead of seeding again.
    pub fn list(conn: &Connection, scope_id: i64, principal: &Principal) -> Result<Vec<K::Item>> {
        let defaults = K::default_payloads();
        if defaults.is_empty() {
            Self::authorize_scope(conn, scope_id, principal)?;
            return OrderedRepo::<K>::list_by_scope(conn, scope_id);
        }

        with_transaction(conn, |tx| {
            Self::authorize_scope(tx, scope_id, principal)?;
            let items = OrderedRepo::<K>::list_by_scope(tx, scope_id)?;
            if !items.is_empty() {
                return Ok(items);
            }

            let mut seeded = Vec::with_capacity(defaults.len());
            for (order, payload) in defaults.iter().enumerate() {
                seeded.push(K::insert(tx, scope_id, payload, order as i64)?);
            }
            log::info!(
                "Seeded {} default {} rows for {} {}",
                seeded.len(), K::NAME, K::SCOPE_NAME, scope_id
            );
            Ok(seeded)
        })
    }

    /// Get one row the principal may see
    pub fn get(conn: &Connection, item_id: i64, principal: &Principal) -> Result<K::Item> {
        Self::authorize_item(conn, item_id, principal)
    }

    /// Create a row at the end of a scope
    pub fn append(conn: &Connection, scope_id: i64, payload: &K::Payload, principal: &Principal) -> Result<K::Item> {
        K::validate(payload)?;

        with_transaction(conn, |tx| {
            Self::authorize_scope(tx, scope_id, principal)?;
            let order = compute_append_order(OrderedRepo::<K>::max_order(tx, scope_id)?);
            let item = K::insert(tx, scope_id, payload, order)?;
            log::debug!(
                "Appended {} {} to {} {} at {}",
                K::NAME, item.id(), K::SCOPE_NAME, scope_id, order
            );
            Ok(item)
        })
    }

    /// Overwrite a row's payload; its position is untouched
    pub fn update(conn: &Connection, item_id: i64, payload: &K::Payload, principal: &Principal) -> Result<K::Item> {
        K::validate(payload)?;

        with_transaction(conn, |tx| {
            Self::authorize_item(tx, item_id, principal)?;
            K::update(tx, item_id, payload)?;
            log::debug!("Updated {} {}", K::NAME, item_id);
            OrderedRepo::<K>::require(tx, item_id)
        })
    }

    /// Delete a row and compact the siblings it leaves behind
    pub fn remove(conn: &Connection, item_id: i64, principal: &Principal) -> Result<()> {
        with_transaction(conn, |tx| {
            // Read under the write lock so a concurrent move cannot stale the scope
            let item = Self::authorize_item(tx, item_id, principal)?;
            let scope_id = item.scope_id();

            if !OrderedRepo::<K>::delete(tx, item_id)? {
                return Err(BoardError::NotFound { resource: K::NAME, id: item_id });
            }
            let remaining = OrderedRepo::<K>::list_by_scope(tx, scope_id)?;
            let written = OrderedRepo::<K>::apply(tx, &compute_compaction(&remaining))?;
            log::debug!(
                "Removed {} {} from {} {}; compacted {} rows",
                K::NAME, item_id, K::SCOPE_NAME, scope_id, written
            );
            Ok(())
        })
    }

    /// Move a row to `target_index` within its own scope.
    ///
    /// The index is zero-based and clamped to the scope. Dropping a row on
    /// its current position writes nothing.
    pub fn reorder(conn: &Connection, item_id: i64, target_index: usize, principal: &Principal) -> Result<()> {
        with_transaction(conn, |tx| {
            let item = Self::authorize_item(tx, item_id, principal)?;
            Self::reorder_in_scope(tx, &item, target_index)
        })
    }

    /// Move a row into `new_scope_id` at `target_index`.
    ///
    /// The principal must own both scopes. The scope left behind is
    /// compacted and rows at or after the target in the new scope shift up
    /// by one. Moving into the row's own scope is a reorder.
    pub fn move_to(
        conn: &Connection,
        item_id: i64,
        new_scope_id: i64,
        target_index: usize,
        principal: &Principal,
    ) -> Result<()> {
        with_transaction(conn, |tx| {
            let item = Self::authorize_item(tx, item_id, principal)?;
            let old_scope_id = item.scope_id();
            if old_scope_id == new_scope_id {
                return Self::reorder_in_scope(tx, &item, target_index);
            }
            Self::authorize_scope(tx, new_scope_id, principal)?;

            let mut old_scope = OrderedRepo::<K>::list_by_scope(tx, old_scope_id)?;
            let current = position_of(&old_scope, item_id)
                .ok_or(BoardError::NotFound { resource: K::NAME, id: item_id })?;
            let moved = old_scope.remove(current);
            let new_scope = OrderedRepo::<K>::list_by_scope(tx, new_scope_id)?;

            let plan = compute_cross_scope_move(&old_scope, &new_scope, &moved, new_scope_id, target_index);

            // Shift the destination tail before the moved row takes its slot
            let mut written = OrderedRepo::<K>::apply(tx, &plan.old_scope)?;
            written += OrderedRepo::<K>::apply(tx, &plan.new_scope)?;
            OrderedRepo::<K>::update_scope_and_order(tx, plan.moved.id, plan.moved.scope_id, plan.moved.order)?;

            log::debug!(
                "Moved {} {} from {} {} to {} {} at {} ({} sibling rows written)",
                K::NAME, item_id, K::SCOPE_NAME, old_scope_id,
                K::SCOPE_NAME, new_scope_id, plan.moved.order, written
            );
            Ok(())
        })
    }

    /// Re-read a scope and rewrite it as `0..N-1`, keeping the current
    /// relative order. Returns the number of rows rewritten.
    pub fn repair(conn: &Connection, scope_id: i64, principal: &Principal) -> Result<usize> {
        with_transaction(conn, |tx| {
            Self::authorize_scope(tx, scope_id, principal)?;
            let items = OrderedRepo::<K>::list_by_scope(tx, scope_id)?;
            if is_dense(&items) {
                return Ok(0);
            }
            let written = OrderedRepo::<K>::apply(tx, &compute_compaction(&items))?;
            log::info!("Repaired {} {}: rewrote {} {} rows", K::SCOPE_NAME, scope_id, written, K::NAME);
            Ok(written)
        })
    }

    /// Reindex `item`'s scope with the item at `target_index`; runs inside the caller's transaction
    fn reorder_in_scope(tx: &Connection, item: &K::Item, target_index: usize) -> Result<()> {
        let item_id = item.id();
        let scope_id = item.scope_id();
        let mut siblings = OrderedRepo::<K>::list_by_scope(tx, scope_id)?;
        let current = position_of(&siblings, item_id)
            .ok_or(BoardError::NotFound { resource: K::NAME, id: item_id })?;
        let moved = siblings.remove(current);
        let target = target_index.min(siblings.len());

        if target == current && is_dense_with(&siblings, &moved, current) {
            log::trace!("{} {} already at index {}", K::NAME, item_id, current);
            return Ok(());
        }

        let updates = compute_reorder_within_scope(&siblings, &moved, target);
        let written = OrderedRepo::<K>::apply(tx, &updates)?;
        log::debug!(
            "Reordered {} {} in {} {}: {} -> {} ({} rows written)",
            K::NAME, item_id, K::SCOPE_NAME, scope_id, current, target, written
        );
        Ok(())
    }
}

/// Whether putting `moved` back at `index` yields a dense scope
fn is_dense_with<T: Ordered>(others: &[T], moved: &T, index: usize) -> bool {
    moved.order() == index as i64
        && others.iter().enumerate().all(|(i, item)| {
            let expected = if i < index { i } else { i + 1 };
            item.order() == expected as i64
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::models::{ColumnPayload, FunnelPayload, LeadPayload, TaskPayload};
    use crate::repo::{FunnelColumnKind, FunnelRepo, LeadKind, TaskColumnKind, TaskKind, UserRepo};

    fn setup() -> (Connection, Principal, Vec<i64>) {
        let conn = DbConnection::connect_in_memory().unwrap();
        let user = UserRepo::create(&conn, "Ada").unwrap();
        let principal = Principal::new(user.id);
        let columns = Collection::<TaskColumnKind>::list(&conn, user.id, &principal).unwrap();
        let ids = columns.iter().map(|c| c.id).collect();
        (conn, principal, ids)
    }

    fn titles(conn: &Connection, column_id: i64) -> Vec<(String, i64)> {
        OrderedRepo::<TaskKind>::list_by_scope(conn, column_id)
            .unwrap()
            .into_iter()
            .map(|t| (t.title, t.order))
            .collect()
    }

    fn add_tasks(conn: &Connection, column_id: i64, principal: &Principal, names: &[&str]) -> Vec<i64> {
        names
            .iter()
            .map(|name| {
                Collection::<TaskKind>::append(conn, column_id, &TaskPayload::new(*name), principal)
                    .unwrap()
                    .id
            })
            .collect()
    }

    #[test]
    fn test_default_columns_seeded_once() {
        let (conn, principal, ids) = setup();
        assert_eq!(ids.len(), 3);

        let again = Collection::<TaskColumnKind>::list(&conn, principal.user_id, &principal).unwrap();
        let names: Vec<&str> = again.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["To-do", "In Progress", "Done"]);
        assert_eq!(again.iter().map(|c| c.id).collect::<Vec<_>>(), ids);
        assert_eq!(again.iter().map(|c| c.order).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_append_orders() {
        let (conn, principal, columns) = setup();
        add_tasks(&conn, columns[0], &principal, &["A", "B"]);
        assert_eq!(titles(&conn, columns[0]), vec![("A".into(), 0), ("B".into(), 1)]);

        let column = Collection::<TaskColumnKind>::append(
            &conn, principal.user_id, &ColumnPayload::new("Review"), &principal,
        ).unwrap();
        assert_eq!(column.order, 3);
    }

    #[test]
    fn test_append_rejects_invalid_payload() {
        let (conn, principal, columns) = setup();
        let err = Collection::<TaskKind>::append(&conn, columns[0], &TaskPayload::new(" "), &principal).unwrap_err();
        assert!(matches!(err, BoardError::Validation { field: "title", .. }));
        assert!(titles(&conn, columns[0]).is_empty());
    }

    #[test]
    fn test_remove_compacts() {
        let (conn, principal, columns) = setup();
        let ids = add_tasks(&conn, columns[0], &principal, &["A", "B", "C", "D"]);

        Collection::<TaskKind>::remove(&conn, ids[1], &principal).unwrap();
        assert_eq!(
            titles(&conn, columns[0]),
            vec![("A".into(), 0), ("C".into(), 1), ("D".into(), 2)]
        );
    }

    #[test]
    fn test_reorder_round_trip() {
        let (conn, principal, columns) = setup();
        let ids = add_tasks(&conn, columns[0], &principal, &["A", "B", "C"]);

        Collection::<TaskKind>::reorder(&conn, ids[0], 2, &principal).unwrap();
        assert_eq!(
            titles(&conn, columns[0]),
            vec![("B".into(), 0), ("C".into(), 1), ("A".into(), 2)]
        );

        Collection::<TaskKind>::reorder(&conn, ids[0], 0, &principal).unwrap();
        assert_eq!(
            titles(&conn, columns[0]),
            vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 2)]
        );
    }

    #[test]
    fn test_move_across_columns() {
        let (conn, principal, columns) = setup();
        let ids = add_tasks(&conn, columns[0], &principal, &["A", "B", "C"]);
        add_tasks(&conn, columns[1], &principal, &["X", "Y"]);

        Collection::<TaskKind>::move_to(&conn, ids[1], columns[1], 1, &principal).unwrap();

        assert_eq!(titles(&conn, columns[0]), vec![("A".into(), 0), ("C".into(), 1)]);
        assert_eq!(
            titles(&conn, columns[1]),
            vec![("X".into(), 0), ("B".into(), 1), ("Y".into(), 2)]
        );
    }

    #[test]
    fn test_move_into_own_scope_reorders() {
        let (conn, principal, columns) = setup();
        let ids = add_tasks(&conn, columns[0], &principal, &["A", "B", "C"]);

        Collection::<TaskKind>::move_to(&conn, ids[2], columns[0], 0, &principal).unwrap();
        assert_eq!(
            titles(&conn, columns[0]),
            vec![("C".into(), 0), ("A".into(), 1), ("B".into(), 2)]
        );
    }

    #[test]
    fn test_repair_gapped_scope() {
        let (conn, principal, columns) = setup();
        let ids = add_tasks(&conn, columns[0], &principal, &["A", "B", "C"]);
        OrderedRepo::<TaskKind>::update_order(&conn, ids[1], 5).unwrap();
        OrderedRepo::<TaskKind>::update_order(&conn, ids[2], 5).unwrap();

        let written = Collection::<TaskKind>::repair(&conn, columns[0], &principal).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            titles(&conn, columns[0]),
            vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 2)]
        );
        assert_eq!(Collection::<TaskKind>::repair(&conn, columns[0], &principal).unwrap(), 0);
    }

    #[test]
    fn test_reorder_on_gapped_scope_still_repairs() {
        let (conn, principal, columns) = setup();
        let ids = add_tasks(&conn, columns[0], &principal, &["A", "B"]);
        OrderedRepo::<TaskKind>::update_order(&conn, ids[1], 4).unwrap();

        // Same index, but the scope is not dense: it gets reindexed anyway
        Collection::<TaskKind>::reorder(&conn, ids[1], 1, &principal).unwrap();
        assert_eq!(titles(&conn, columns[0]), vec![("A".into(), 0), ("B".into(), 1)]);
    }

    #[test]
    fn test_funnel_stages_and_leads() {
        let (conn, principal, _) = setup();
        let funnel = FunnelRepo::create(&conn, &FunnelPayload::new("Inbound"), &principal).unwrap();

        let stages = Collection::<FunnelColumnKind>::list(&conn, funnel.id, &principal).unwrap();
        assert_eq!(stages.len(), 5);
        assert_eq!(stages[0].name, "New Lead");

        let lead = Collection::<LeadKind>::append(&conn, stages[0].id, &LeadPayload::new("Acme"), &principal).unwrap();
        assert_eq!(lead.order, 0);
        Collection::<LeadKind>::move_to(&conn, lead.id, stages[2].id, 0, &principal).unwrap();

        let qualified = OrderedRepo::<LeadKind>::list_by_scope(&conn, stages[2].id).unwrap();
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].column_id, stages[2].id);
        assert!(OrderedRepo::<LeadKind>::list_by_scope(&conn, stages[0].id).unwrap().is_empty());
    }

    #[test]
    fn test_missing_item_is_not_found() {
        let (conn, principal, _) = setup();
        let err = Collection::<TaskKind>::reorder(&conn, 999, 0, &principal).unwrap_err();
        assert!(matches!(err, BoardError::NotFound { resource: "task", id: 999 }));
    }

    #[test]
    fn test_is_dense_with() {
        #[derive(Debug)]
        struct Row(i64);
        impl Ordered for Row {
            fn id(&self) -> i64 { self.0 }
            fn scope_id(&self) -> i64 { 0 }
            fn order(&self) -> i64 { self.0 }
        }
        assert!(is_dense_with(&[Row(0), Row(2)], &Row(1), 1));
        assert!(!is_dense_with(&[Row(0), Row(3)], &Row(1), 1));
    }
}
