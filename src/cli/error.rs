// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::error::BoardError;
use crate::models::Priority;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit code for an error returned by `run`
/// Store failures and setup failures are internal errors (exit code 2)
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<BoardError>() {
        Some(board_err) if board_err.is_user_error() => 1,
        _ => 2,
    }
}

/// Parse a `--priority` argument
pub fn parse_priority(value: &str) -> Result<Priority, BoardError> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("high").unwrap(), Priority::High);
        assert_eq!(parse_priority("LOW").unwrap(), Priority::Low);
        assert!(matches!(
            parse_priority("asap"),
            Err(BoardError::Validation { field: "priority", .. })
        ));
    }

    #[test]
    fn test_exit_code() {
        let user: anyhow::Error = BoardError::NotFound { resource: "task", id: 1 }.into();
        assert_eq!(exit_code(&user), 1);

        let store: anyhow::Error = BoardError::from(rusqlite::Error::InvalidQuery).into();
        assert_eq!(exit_code(&store), 2);

        let other = anyhow::anyhow!("Failed to open database");
        assert_eq!(exit_code(&other), 2);
    }
}
