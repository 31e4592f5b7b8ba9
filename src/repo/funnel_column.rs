use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{BoardError, Result};
use crate::models::{FunnelColumn, FunnelColumnPayload, DEFAULT_FUNNEL_STAGES};
use crate::ordering::OrderedKind;
use crate::validate::validate_funnel_column;

/// Pipeline stages, ordered per funnel
pub struct FunnelColumnKind;

impl OrderedKind for FunnelColumnKind {
    type Item = FunnelColumn;
    type Payload = FunnelColumnPayload;

    const NAME: &'static str = "stage";
    const SCOPE_NAME: &'static str = "funnel";
    const TABLE: &'static str = "funnel_columns";
    const SCOPE_COLUMN: &'static str = "funnel_id";
    const COLUMNS: &'static str = "id, funnel_id, name, color, sort_order, created_ts, modified_ts";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<FunnelColumn> {
        Ok(FunnelColumn {
            id: row.get(0)?,
            funnel_id: row.get(1)?,
            name: row.get(2)?,
            color: row.get(3)?,
            order: row.get(4)?,
            created_ts: row.get(5)?,
            modified_ts: row.get(6)?,
        })
    }

    fn validate(payload: &FunnelColumnPayload) -> Result<()> {
        validate_funnel_column(payload)
    }

    fn insert(conn: &Connection, funnel_id: i64, payload: &FunnelColumnPayload, order: i64) -> Result<FunnelColumn> {
        let now = chrono::Utc::now().timestamp();
        let name = payload.name.trim().to_string();

        conn.execute(
            "INSERT INTO funnel_columns (funnel_id, name, color, sort_order, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![funnel_id, name, payload.color, order, now],
        )?;

        Ok(FunnelColumn {
            id: conn.last_insert_rowid(),
            funnel_id,
            name,
            color: payload.color.clone(),
            order,
            created_ts: now,
            modified_ts: now,
        })
    }

    fn update(conn: &Connection, id: i64, payload: &FunnelColumnPayload) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE funnel_columns SET name = ?1, color = ?2, modified_ts = ?3 WHERE id = ?4",
            rusqlite::params![payload.name.trim(), payload.color, now, id],
        )?;
        if updated == 0 {
            return Err(BoardError::NotFound { resource: Self::NAME, id });
        }
        Ok(())
    }

    fn scope_owner(conn: &Connection, funnel_id: i64) -> Result<Option<i64>> {
        let owner = conn.query_row(
            "SELECT user_id FROM funnels WHERE id = ?1",
            [funnel_id],
            |row| row.get(0),
        ).optional()?;
        Ok(owner)
    }

    fn default_payloads() -> Vec<FunnelColumnPayload> {
        DEFAULT_FUNNEL_STAGES
            .iter()
            .map(|(name, color)| FunnelColumnPayload::new(*name, *color))
            .collect()
    }
}
