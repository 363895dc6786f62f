//! Domain errors raised by the service layer.

use crate::db::repository::{RepositoryError, UniqueConstraint};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
#[allow(clippy::result_large_err)]
pub enum ServiceError {
    #[error("Invalid session code or session not active")]
    InvalidSessionCode,

    #[error("Session is not active today")]
    SessionNotActiveToday,

    #[error("Student not found")]
    StudentNotFound,

    #[error("Student already registered attendance for this session")]
    DuplicateAttendance,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for the kinds reported back to the caller as bad input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

fn entity_label(entity: &str) -> Option<&'static str> {
    match entity {
        "student" => Some("Student"),
        "course" => Some("Course"),
        "session" => Some("Session"),
        "attendance" => Some("Attendance"),
        _ => None,
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConstraintViolation {
                constraint: UniqueConstraint::AttendanceStudentSession,
                ..
            } => Self::DuplicateAttendance,
            RepositoryError::ConstraintViolation { constraint, .. } => {
                Self::Conflict(format!("A {} already exists", constraint.describe()))
            }
            RepositoryError::ValidationError { message, .. } => Self::Validation(message),
            RepositoryError::NotFound { message, context } => {
                match context.entity.as_deref().and_then(entity_label) {
                    Some(entity) => Self::NotFound {
                        entity,
                        id: context.entity_id.unwrap_or(message),
                    },
                    None => Self::Repository(RepositoryError::NotFound { message, context }),
                }
            }
            other => Self::Repository(other),
        }
    }
}
