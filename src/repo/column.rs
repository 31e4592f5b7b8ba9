use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{BoardError, Result};
use crate::models::{ColumnPayload, TaskColumn, DEFAULT_TASK_COLUMNS};
use crate::ordering::OrderedKind;
use crate::validate::validate_column;

/// Kanban columns, ordered per user
pub struct TaskColumnKind;

impl OrderedKind for TaskColumnKind {
    type Item = TaskColumn;
    type Payload = ColumnPayload;

    const NAME: &'static str = "column";
    const SCOPE_NAME: &'static str = "user";
    const TABLE: &'static str = "task_columns";
    const SCOPE_COLUMN: &'static str = "user_id";
    const COLUMNS: &'static str = "id, user_id, name, sort_order, created_ts, modified_ts";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<TaskColumn> {
        Ok(TaskColumn {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            order: row.get(3)?,
            created_ts: row.get(4)?,
            modified_ts: row.get(5)?,
        })
    }

    fn validate(payload: &ColumnPayload) -> Result<()> {
        validate_column(payload)
    }

    fn insert(conn: &Connection, user_id: i64, payload: &ColumnPayload, order: i64) -> Result<TaskColumn> {
        let now = chrono::Utc::now().timestamp();
        let name = payload.name.trim().to_string();

        conn.execute(
            "INSERT INTO task_columns (user_id, name, sort_order, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![user_id, name, order, now],
        )?;

        Ok(TaskColumn {
            id: conn.last_insert_rowid(),
            user_id,
            name,
            order,
            created_ts: now,
            modified_ts: now,
        })
    }

    fn update(conn: &Connection, id: i64, payload: &ColumnPayload) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE task_columns SET name = ?1, modified_ts = ?2 WHERE id = ?3",
            rusqlite::params![payload.name.trim(), now, id],
        )?;
        if updated == 0 {
            return Err(BoardError::NotFound { resource: Self::NAME, id });
        }
        Ok(())
    }

    /// The scope is the user itself
    fn scope_owner(conn: &Connection, user_id: i64) -> Result<Option<i64>> {
        let owner = conn.query_row(
            "SELECT id FROM users WHERE id = ?1",
            [user_id],
            |row| row.get(0),
        ).optional()?;
        Ok(owner)
    }

    fn default_payloads() -> Vec<ColumnPayload> {
        DEFAULT_TASK_COLUMNS.iter().map(|name| ColumnPayload::new(*name)).collect()
    }
}
