use serde::{Deserialize, Serialize};
use crate::ordering::Ordered;

/// Kanban column, ordered within its owning user's board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskColumn {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub order: i64,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Ordered for TaskColumn {
    fn id(&self) -> i64 {
        self.id
    }

    fn scope_id(&self) -> i64 {
        self.user_id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPayload {
    pub name: String,
}

impl ColumnPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Columns created for a user whose board is empty
pub const DEFAULT_TASK_COLUMNS: [&str; 3] = ["To-do", "In Progress", "Done"];
