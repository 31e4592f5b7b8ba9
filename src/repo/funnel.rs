use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{BoardError, Result};
use crate::models::{Funnel, FunnelPayload, Principal};
use crate::validate::validate_funnel;

const FUNNEL_COLUMNS: &str = "id, user_id, name, description, created_ts, modified_ts";

/// Funnel repository for database operations
///
/// Funnels are the parents of pipeline stages. They are not ordered; every
/// operation checks that the principal owns the funnel. Deleting a funnel
/// deletes its stages and their leads (foreign key cascade).
pub struct FunnelRepo;

impl FunnelRepo {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Funnel> {
        Ok(Funnel {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            created_ts: row.get(4)?,
            modified_ts: row.get(5)?,
        })
    }

    /// Create a funnel owned by the principal
    pub fn create(conn: &Connection, payload: &FunnelPayload, principal: &Principal) -> Result<Funnel> {
        validate_funnel(payload)?;
        let now = chrono::Utc::now().timestamp();
        let name = payload.name.trim().to_string();

        let inserted = conn.execute(
            "INSERT INTO funnels (user_id, name, description, created_ts, modified_ts)
             SELECT id, ?2, ?3, ?4, ?4 FROM users WHERE id = ?1",
            rusqlite::params![principal.user_id, name, payload.description, now],
        )?;
        if inserted == 0 {
            return Err(BoardError::NotFound { resource: "user", id: principal.user_id });
        }

        let id = conn.last_insert_rowid();
        log::debug!("Created funnel {} for user {}", id, principal.user_id);
        Ok(Funnel {
            id,
            user_id: principal.user_id,
            name,
            description: payload.description.clone(),
            created_ts: now,
            modified_ts: now,
        })
    }

    /// Get funnel by ID regardless of owner
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Funnel>> {
        let sql = format!("SELECT {} FROM funnels WHERE id = ?1", FUNNEL_COLUMNS);
        let funnel = conn.query_row(&sql, [id], Self::from_row).optional()?;
        Ok(funnel)
    }

    /// Get a funnel the principal owns
    pub fn get_owned(conn: &Connection, id: i64, principal: &Principal) -> Result<Funnel> {
        let funnel = Self::get_by_id(conn, id)?
            .ok_or(BoardError::NotFound { resource: "funnel", id })?;
        if !principal.owns(funnel.user_id) {
            return Err(BoardError::Unauthorized { resource: "funnel", id });
        }
        Ok(funnel)
    }

    /// List the principal's funnels, newest first
    pub fn list_for_user(conn: &Connection, principal: &Principal) -> Result<Vec<Funnel>> {
        let sql = format!(
            "SELECT {} FROM funnels WHERE user_id = ?1 ORDER BY created_ts DESC, id DESC",
            FUNNEL_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([principal.user_id], Self::from_row)?;

        let mut funnels = Vec::new();
        for row in rows {
            funnels.push(row?);
        }
        Ok(funnels)
    }

    /// Rename a funnel or change its description
    pub fn update(conn: &Connection, id: i64, payload: &FunnelPayload, principal: &Principal) -> Result<Funnel> {
        validate_funnel(payload)?;
        let funnel = Self::get_owned(conn, id, principal)?;
        let now = chrono::Utc::now().timestamp();
        let name = payload.name.trim().to_string();

        conn.execute(
            "UPDATE funnels SET name = ?1, description = ?2, modified_ts = ?3 WHERE id = ?4",
            rusqlite::params![name, payload.description, now, id],
        )?;

        Ok(Funnel {
            name,
            description: payload.description.clone(),
            modified_ts: now,
            ..funnel
        })
    }

    /// Delete a funnel together with its stages and leads
    pub fn delete(conn: &Connection, id: i64, principal: &Principal) -> Result<()> {
        Self::get_owned(conn, id, principal)?;
        conn.execute("DELETE FROM funnels WHERE id = ?1", [id])?;
        log::debug!("Deleted funnel {}", id);
        Ok(())
    }
}
