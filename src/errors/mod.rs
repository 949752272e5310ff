use std::fmt;

use sea_orm::{DbErr, SqlErr};

use crate::entities::RequestStatus;

/// Errors surfaced by the store, repositories and screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Input rejected at the repository boundary; the message is shown verbatim
    Validation(String),
    /// Username already belongs to an account (active or not)
    UsernameTaken(String),
    /// Record does not exist
    NotFound { entity: &'static str, id: i64 },
    /// Nine-line status change outside DRAFT -> TRANSMITTED -> ARCHIVED
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    /// Polygon with fewer than three vertices
    InvalidPolygon { vertices: usize },
    /// Database operation failed
    Database(String),
    /// Configuration error
    Config(String),
    /// Internal failure (closed channels, panicked background work)
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::UsernameTaken(_) => write!(f, "Username already exists"),
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot move request from {from} to {to}")
            }
            Self::InvalidPolygon { vertices } => write!(
                f,
                "A polygon needs at least 3 vertices, got {vertices}"
            ),
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Whether this error came from input validation rather than the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UsernameTaken(_) | Self::InvalidPolygon { .. }
        )
    }
}

/// Convert `SeaORM` database errors to `AppError`
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// True when the database rejected a write because of a UNIQUE constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_verbatim() {
        let err = AppError::Validation("Please enter a valid email address".to_string());
        assert_eq!(err.to_string(), "Please enter a valid email address");
        assert!(err.is_validation());
    }

    #[test]
    fn username_taken_message() {
        let err = AppError::UsernameTaken("alpha".to_string());
        assert_eq!(err.to_string(), "Username already exists");
        assert!(err.is_validation());
    }

    #[test]
    fn database_errors_are_not_validation() {
        let err: AppError = DbErr::Custom("disk full".to_string()).into();
        assert!(matches!(&err, AppError::Database(msg) if msg.contains("disk full")));
        assert!(!err.is_validation());
    }

    #[test]
    fn transition_message_names_both_states() {
        let err = AppError::InvalidTransition {
            from: RequestStatus::Draft,
            to: RequestStatus::Archived,
        };
        assert_eq!(err.to_string(), "Cannot move request from DRAFT to ARCHIVED");
    }
}
