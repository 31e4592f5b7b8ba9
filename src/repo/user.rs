use rusqlite::{Connection, OptionalExtension};
use crate::error::Result;
use crate::models::User;
use crate::validate::validate_user_name;

/// User repository for database operations
pub struct UserRepo;

impl UserRepo {
    /// Create a new user
    pub fn create(conn: &Connection, name: &str) -> Result<User> {
        validate_user_name(name)?;
        let now = chrono::Utc::now().timestamp();
        let name = name.trim().to_string();

        conn.execute(
            "INSERT INTO users (name, created_ts) VALUES (?1, ?2)",
            rusqlite::params![name, now],
        )?;

        let id = conn.last_insert_rowid();
        log::debug!("Created user {} ({})", id, name);
        Ok(User { id, name, created_ts: now })
    }

    /// Get user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
        let user = conn.query_row(
            "SELECT id, name, created_ts FROM users WHERE id = ?1",
            [id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_ts: row.get(2)?,
                })
            },
        ).optional()?;
        Ok(user)
    }

    /// List all users ordered by id
    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        let mut stmt = conn.prepare("SELECT id, name, created_ts FROM users ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                created_ts: row.get(2)?,
            })
        })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::error::BoardError;

    #[test]
    fn test_create_and_get() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let user = UserRepo::create(&conn, "  Ada  ").unwrap();
        assert_eq!(user.name, "Ada");

        let loaded = UserRepo::get_by_id(&conn, user.id).unwrap().unwrap();
        assert_eq!(loaded, user);
        assert!(UserRepo::get_by_id(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let err = UserRepo::create(&conn, "").unwrap_err();
        assert!(matches!(err, BoardError::Validation { field: "name", .. }));
        assert!(UserRepo::list(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_list() {
        let conn = DbConnection::connect_in_memory().unwrap();
        UserRepo::create(&conn, "Ada").unwrap();
        UserRepo::create(&conn, "Grace").unwrap();
        let names: Vec<String> = UserRepo::list(&conn).unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
    }
}
