use serde::{Deserialize, Serialize};

/// Board user (owner of task columns and funnels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_ts: i64,
}
