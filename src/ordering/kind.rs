use rusqlite::{Connection, Row};
use crate::error::Result;

/// A row that carries a dense position within its scope
pub trait Ordered {
    fn id(&self) -> i64;
    /// Id of the containing list (user, funnel or column)
    fn scope_id(&self) -> i64;
    fn order(&self) -> i64;
}

/// Binding of one ordered entity kind to its table.
///
/// The generic store (`OrderedRepo`) and service (`Collection`) use the
/// constants to build their SQL; the functions cover what differs per kind:
/// row mapping, payload columns, validation and the ownership chain.
pub trait OrderedKind {
    type Item: Ordered + Clone + std::fmt::Debug;
    type Payload;

    /// Entity name used in errors and logs
    const NAME: &'static str;
    /// Name of the scope's parent resource used in errors
    const SCOPE_NAME: &'static str;
    const TABLE: &'static str;
    /// Foreign key column holding the scope id
    const SCOPE_COLUMN: &'static str;
    /// Select list, in the order `from_row` reads it
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self::Item>;

    /// Reject an invalid payload without touching the database
    fn validate(payload: &Self::Payload) -> Result<()>;

    fn insert(conn: &Connection, scope_id: i64, payload: &Self::Payload, order: i64) -> Result<Self::Item>;

    /// Overwrite the payload fields of an existing row
    fn update(conn: &Connection, id: i64, payload: &Self::Payload) -> Result<()>;

    /// User owning the scope, or `None` when the scope does not exist
    fn scope_owner(conn: &Connection, scope_id: i64) -> Result<Option<i64>>;

    /// Rows created when an empty scope is listed
    fn default_payloads() -> Vec<Self::Payload> {
        Vec::new()
    }
}
