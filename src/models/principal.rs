use serde::{Deserialize, Serialize};

/// The authenticated actor an operation runs on behalf of.
///
/// Session resolution is the caller's job; the board only compares the
/// principal's user id against the owner of the resource being touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
}

impl Principal {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    pub fn owns(&self, owner_id: i64) -> bool {
        self.user_id == owner_id
    }
}
