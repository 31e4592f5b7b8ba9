use serde::{Deserialize, Serialize};
use crate::ordering::Ordered;

/// Sales funnel (a pipeline of stages owned by one user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funnel {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_ts: i64,
    pub modified_ts: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunnelPayload {
    pub name: String,
    pub description: Option<String>,
}

impl FunnelPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Pipeline stage, ordered within its funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelColumn {
    pub id: i64,
    pub funnel_id: i64,
    pub name: String,
    pub color: String,
    pub order: i64,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Ordered for FunnelColumn {
    fn id(&self) -> i64 {
        self.id
    }

    fn scope_id(&self) -> i64 {
        self.funnel_id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelColumnPayload {
    pub name: String,
    pub color: String,
}

impl FunnelColumnPayload {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Color given to stages created without one
pub const DEFAULT_STAGE_COLOR: &str = "#64748b";

/// Stages created for a funnel that has none, as (name, color)
pub const DEFAULT_FUNNEL_STAGES: [(&str, &str); 5] = [
    ("New Lead", "#3b82f6"),
    ("Contacted", "#8b5cf6"),
    ("Qualified", "#f59e0b"),
    ("Proposal", "#f97316"),
    ("Closed", "#22c55e"),
];
