use serde::{Deserialize, Serialize};
use crate::ordering::Ordered;

/// Sales lead, ordered within its funnel stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub uuid: String,
    pub column_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub order: i64,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Ordered for Lead {
    fn id(&self) -> i64 {
        self.id
    }

    fn scope_id(&self) -> i64 {
        self.column_id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeadPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
}

impl LeadPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
