use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{BoardError, Result};
use crate::models::{Lead, LeadPayload};
use crate::ordering::OrderedKind;
use crate::validate::validate_lead;

/// Leads, ordered per pipeline stage
pub struct LeadKind;

impl OrderedKind for LeadKind {
    type Item = Lead;
    type Payload = LeadPayload;

    const NAME: &'static str = "lead";
    const SCOPE_NAME: &'static str = "stage";
    const TABLE: &'static str = "leads";
    const SCOPE_COLUMN: &'static str = "column_id";
    const COLUMNS: &'static str = "id, uuid, column_id, name, email, phone, company, value, notes,
                                   sort_order, created_ts, modified_ts";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
        Ok(Lead {
            id: row.get(0)?,
            uuid: row.get(1)?,
            column_id: row.get(2)?,
            name: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            company: row.get(6)?,
            value: row.get(7)?,
            notes: row.get(8)?,
            order: row.get(9)?,
            created_ts: row.get(10)?,
            modified_ts: row.get(11)?,
        })
    }

    fn validate(payload: &LeadPayload) -> Result<()> {
        validate_lead(payload)
    }

    fn insert(conn: &Connection, column_id: i64, payload: &LeadPayload, order: i64) -> Result<Lead> {
        let now = chrono::Utc::now().timestamp();
        let uuid = uuid::Uuid::new_v4().to_string();
        let name = payload.name.trim().to_string();

        conn.execute(
            "INSERT INTO leads (uuid, column_id, name, email, phone, company, value, notes,
                    sort_order, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            rusqlite::params![
                uuid,
                column_id,
                name,
                payload.email,
                payload.phone,
                payload.company,
                payload.value,
                payload.notes,
                order,
                now
            ],
        )?;

        Ok(Lead {
            id: conn.last_insert_rowid(),
            uuid,
            column_id,
            name,
            email: payload.email.clone(),
            phone: payload.phone.clone(),
            company: payload.company.clone(),
            value: payload.value,
            notes: payload.notes.clone(),
            order,
            created_ts: now,
            modified_ts: now,
        })
    }

    fn update(conn: &Connection, id: i64, payload: &LeadPayload) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            "UPDATE leads SET name = ?1, email = ?2, phone = ?3, company = ?4, value = ?5,
                    notes = ?6, modified_ts = ?7
             WHERE id = ?8",
            rusqlite::params![
                payload.name.trim(),
                payload.email,
                payload.phone,
                payload.company,
                payload.value,
                payload.notes,
                now,
                id
            ],
        )?;
        if updated == 0 {
            return Err(BoardError::NotFound { resource: Self::NAME, id });
        }
        Ok(())
    }

    /// Stage -> funnel -> user
    fn scope_owner(conn: &Connection, column_id: i64) -> Result<Option<i64>> {
        let owner = conn.query_row(
            "SELECT f.user_id FROM funnel_columns c
             JOIN funnels f ON f.id = c.funnel_id
             WHERE c.id = ?1",
            [column_id],
            |row| row.get(0),
        ).optional()?;
        Ok(owner)
    }
}
