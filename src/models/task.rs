use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::error::BoardError;
use crate::ordering::Ordered;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

}

impl FromStr for Priority {
    type Err = BoardError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(BoardError::validation(
                "priority",
                format!("'{}' is not one of: low, medium, high", s),
            )),
        }
    }
}

/// Kanban task, ordered within its column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub uuid: String,
    pub column_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub order: i64,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Ordered for Task {
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

/// User-editable task fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
}

impl TaskPayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_conversion() {
        assert_eq!(Priority::Low.as_str(), "low");
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" Medium ".parse::<Priority>().unwrap(), Priority::Medium);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(BoardError::Validation { field: "priority", .. })
        ));
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_payload_builder() {
        let payload = TaskPayload::new("Write copy")
            .with_priority(Priority::High)
            .with_description("Landing page");
        assert_eq!(payload.title, "Write copy");
        assert_eq!(payload.priority, Priority::High);
        assert_eq!(payload.description.as_deref(), Some("Landing page"));
    }
}
