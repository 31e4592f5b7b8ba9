use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{BoardError, Result};
use crate::models::{Priority, Task, TaskPayload};
use crate::ordering::OrderedKind;
use crate::validate::validate_task;

/// Kanban tasks, ordered per column
pub struct TaskKind;

impl OrderedKind for TaskKind {
    type Item = Task;
    type Payload = TaskPayload;

    const NAME: &'static str = "task";
    const SCOPE_NAME: &'static str = "column";
    const TABLE: &'static str = "tasks";
    const SCOPE_COLUMN: &'static str = "column_id";
    const COLUMNS: &'static str =
        "id, uuid, column_id, title, description, priority, sort_order, created_ts, modified_ts";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
        let priority: String = row.get(5)?;
        let priority = priority.parse::<Priority>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Task {
            id: row.get(0)?,
            uuid: row.get(1)?,
            column_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            priority,
            order: row.get(6)?,
            created_ts: row.get(7)?,
            modified_ts: row.get(8)?,
        })
    }

    fn validate(payload: &TaskPayload) -> Result<()> {
        validate_task(payload)
    }

    fn insert(conn: &Connection, column_id: i64, payload: &TaskPayload, order: i64) -> Result<Task> {
        let now = chrono::Utc::now().timestamp();
        let uuid = uuid::Uuid::new_v4().to_string();
        let title = payload.title.trim().to_string();

        conn.execute(
            "INSERT INTO tasks (uuid, column_id, title, description, priority, sort_order,
                    created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            rusqlite::params![
                uuid,
                column_id,
                title,
                payload.description,
                payload.priority.as_str(),
                order,
                now
            ],
        )?;

        Ok(Task {
            id: conn.last_insert_rowid(),
            uuid,
            column_id,
            title,
            description: payload.description.clone(),
            priority: payload.priority,
            order,
            created_ts: now,
            modified_ts: now,
        })
    }

    fn update(conn: &Connection, id: i64, payload: &TaskPayload) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, priority = ?3, modified_ts = ?4
             WHERE id = ?5",
            rusqlite::params![
                payload.title.trim(),
                payload.description,
                payload.priority.as_str(),
                now,
                id
            ],
        )?;
        if updated == 0 {
            return Err(BoardError::NotFound { resource: Self::NAME, id });
        }
        Ok(())
    }

    fn scope_owner(conn: &Connection, column_id: i64) -> Result<Option<i64>> {
        let owner = conn.query_row(
            "SELECT user_id FROM task_columns WHERE id = ?1",
            [column_id],
            |row| row.get(0),
        ).optional()?;
        Ok(owner)
    }
}
