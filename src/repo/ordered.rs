use rusqlite::{Connection, OptionalExtension};
use std::marker::PhantomData;
use crate::error::{BoardError, Result};
use crate::ordering::{OrderUpdate, OrderedKind};

/// Ordered entity store shared by every ordered kind.
///
/// Rows live in `K::TABLE`, grouped by `K::SCOPE_COLUMN` and positioned by
/// `sort_order`. These functions are single-statement primitives; the
/// multi-row operations in `Collection` wrap them in one transaction.
pub struct OrderedRepo<K>(PhantomData<K>);

impl<K: OrderedKind> OrderedRepo<K> {
    /// Rows of a scope, ascending by order (id breaks ties)
    pub fn list_by_scope(conn: &Connection, scope_id: i64) -> Result<Vec<K::Item>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY sort_order, id",
            K::COLUMNS, K::TABLE, K::SCOPE_COLUMN
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([scope_id], |row| K::from_row(row))?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// Get row by ID
    pub fn get(conn: &Connection, id: i64) -> Result<Option<K::Item>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", K::COLUMNS, K::TABLE);
        let item = conn.query_row(&sql, [id], |row| K::from_row(row)).optional()?;
        Ok(item)
    }

    /// Get row by ID, failing with `NotFound` when it does not exist
    pub fn require(conn: &Connection, id: i64) -> Result<K::Item> {
        Self::get(conn, id)?.ok_or(BoardError::NotFound { resource: K::NAME, id })
    }

    /// Highest order in a scope, `None` for an empty scope
    pub fn max_order(conn: &Connection, scope_id: i64) -> Result<Option<i64>> {
        let sql = format!(
            "SELECT MAX(sort_order) FROM {} WHERE {} = ?1",
            K::TABLE, K::SCOPE_COLUMN
        );
        let max = conn.query_row(&sql, [scope_id], |row| row.get::<_, Option<i64>>(0))?;
        Ok(max)
    }

    pub fn count(conn: &Connection, scope_id: i64) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", K::TABLE, K::SCOPE_COLUMN);
        let count: i64 = conn.query_row(&sql, [scope_id], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn update_order(conn: &Connection, id: i64, order: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let sql = format!(
            "UPDATE {} SET sort_order = ?1, modified_ts = ?2 WHERE id = ?3",
            K::TABLE
        );
        let updated = conn.execute(&sql, rusqlite::params![order, now, id])?;
        if updated == 0 {
            return Err(BoardError::NotFound { resource: K::NAME, id });
        }
        Ok(())
    }

    pub fn update_scope_and_order(conn: &Connection, id: i64, scope_id: i64, order: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let sql = format!(
            "UPDATE {} SET {} = ?1, sort_order = ?2, modified_ts = ?3 WHERE id = ?4",
            K::TABLE, K::SCOPE_COLUMN
        );
        let updated = conn.execute(&sql, rusqlite::params![scope_id, order, now, id])?;
        if updated == 0 {
            return Err(BoardError::NotFound { resource: K::NAME, id });
        }
        Ok(())
    }

    /// Delete a row; returns false when it did not exist
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", K::TABLE);
        let deleted = conn.execute(&sql, [id])?;
        Ok(deleted > 0)
    }

    /// Write every update whose order actually changes; returns the number written
    pub fn apply(conn: &Connection, updates: &[OrderUpdate]) -> Result<usize> {
        let mut written = 0;
        for update in updates.iter().filter(|u| u.is_change()) {
            Self::update_order(conn, update.id, update.order)?;
            written += 1;
        }
        Ok(written)
    }
}
