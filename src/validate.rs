//! Payload validation.
//!
//! Every check here is pure: payloads are rejected before any database
//! access happens.

use crate::error::{BoardError, Result};
use crate::models::{ColumnPayload, FunnelColumnPayload, FunnelPayload, LeadPayload, TaskPayload};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_USER_NAME_LEN: usize = 50;
pub const MAX_TEXT_LEN: usize = 1000;

/// Validate that a string is not empty and fits in `max` characters
pub fn validate_name(value: &str, field: &'static str, max: usize) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::validation(field, "cannot be empty"));
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(BoardError::validation(
            field,
            format!("must be at most {} characters (got {})", max, len),
        ));
    }
    Ok(())
}

/// Validate optional free text (descriptions, notes)
pub fn validate_text(value: Option<&str>, field: &'static str) -> Result<()> {
    if let Some(text) = value {
        let len = text.chars().count();
        if len > MAX_TEXT_LEN {
            return Err(BoardError::validation(
                field,
                format!("must be at most {} characters (got {})", MAX_TEXT_LEN, len),
            ));
        }
    }
    Ok(())
}

/// Validate a `#rgb` or `#rrggbb` color
pub fn validate_color(color: &str) -> Result<()> {
    let hex = color.strip_prefix('#')
        .ok_or_else(|| BoardError::validation("color", format!("'{}' must start with '#'", color)))?;
    if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(BoardError::validation(
            "color",
            format!("'{}' is not a #rgb or #rrggbb color", color),
        ))
    }
}

/// Validate an email address shape (local@domain.tld)
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || BoardError::validation("email", format!("'{}' is not a valid email address", email));
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_user_name(name: &str) -> Result<()> {
    validate_name(name, "name", MAX_USER_NAME_LEN)
}

pub fn validate_column(payload: &ColumnPayload) -> Result<()> {
    validate_name(&payload.name, "name", MAX_NAME_LEN)
}

pub fn validate_task(payload: &TaskPayload) -> Result<()> {
    validate_name(&payload.title, "title", MAX_NAME_LEN)?;
    validate_text(payload.description.as_deref(), "description")
}

pub fn validate_funnel(payload: &FunnelPayload) -> Result<()> {
    validate_name(&payload.name, "name", MAX_NAME_LEN)?;
    validate_text(payload.description.as_deref(), "description")
}

pub fn validate_funnel_column(payload: &FunnelColumnPayload) -> Result<()> {
    validate_name(&payload.name, "name", MAX_NAME_LEN)?;
    validate_color(&payload.color)
}

pub fn validate_lead(payload: &LeadPayload) -> Result<()> {
    validate_name(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(email) = payload.email.as_deref() {
        validate_email(email)?;
    }
    if let Some(value) = payload.value {
        if !value.is_finite() || value < 0.0 {
            return Err(BoardError::validation("value", format!("{} must be a non-negative amount", value)));
        }
    }
    validate_text(payload.notes.as_deref(), "notes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Backlog", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_name("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_name("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_name(&"x".repeat(101), "name", MAX_NAME_LEN).is_err());
        assert!(validate_name(&"é".repeat(100), "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#fff").is_ok());
        assert!(validate_color("#22c55e").is_ok());
        assert!(validate_color("22c55e").is_err());
        assert!(validate_color("#22c5").is_err());
        assert!(validate_color("#ggg").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada.lovelace@mail.example.org").is_ok());
        assert!(validate_email("ada").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("ada@@example.com").is_err());
        assert!(validate_email("ada @example.com").is_err());
    }

    #[test]
    fn test_validate_lead() {
        let mut lead = LeadPayload::new("Acme Corp");
        assert!(validate_lead(&lead).is_ok());

        lead.value = Some(-5.0);
        assert!(matches!(
            validate_lead(&lead),
            Err(BoardError::Validation { field: "value", .. })
        ));

        lead.value = Some(1200.0);
        lead.email = Some("not-an-email".to_string());
        assert!(matches!(
            validate_lead(&lead),
            Err(BoardError::Validation { field: "email", .. })
        ));
    }

    #[test]
    fn test_validate_task_description_length() {
        let payload = TaskPayload::new("Plan").with_description("d".repeat(MAX_TEXT_LEN + 1));
        assert!(validate_task(&payload).is_err());
    }
}
