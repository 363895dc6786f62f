//! Tests for db::repository::error.

use attendance_rust::db::repository::{ErrorContext, RepositoryError, UniqueConstraint};

#[test]
fn test_error_context_builders() {
    let ctx = ErrorContext::new("insert_student")
        .with_entity("student")
        .with_entity_id(12)
        .with_details("email taken");
    assert_eq!(ctx.operation.as_deref(), Some("insert_student"));
    assert_eq!(ctx.entity.as_deref(), Some("student"));
    assert_eq!(ctx.entity_id.as_deref(), Some("12"));
    assert_eq!(ctx.details.as_deref(), Some("email taken"));
    assert!(!ctx.retryable);
    assert!(ErrorContext::new("op").retryable().retryable);
}

#[test]
fn test_connection_errors_are_retryable() {
    assert!(RepositoryError::connection("refused").is_retryable());
    assert!(RepositoryError::timeout("slow").is_retryable());
    assert!(!RepositoryError::validation("bad").is_retryable());
    assert!(!RepositoryError::constraint(UniqueConstraint::CourseCode).is_retryable());
}

#[test]
fn test_not_found_detection() {
    assert!(RepositoryError::not_found("student 3").is_not_found());
    assert!(!RepositoryError::query("syntax").is_not_found());
}

#[test]
fn test_constraint_index_names_round_trip() {
    for constraint in UniqueConstraint::ALL {
        assert_eq!(
            UniqueConstraint::from_index_name(constraint.index_name()),
            Some(constraint)
        );
    }
    assert_eq!(UniqueConstraint::from_index_name("ix_unknown"), None);
}

#[test]
fn test_constraint_violation_display() {
    let err = RepositoryError::constraint_with_context(
        UniqueConstraint::AttendanceStudentSession,
        ErrorContext::new("insert_attendance"),
    );
    assert_eq!(
        err.violated_constraint(),
        Some(UniqueConstraint::AttendanceStudentSession)
    );
    let text = err.to_string();
    assert!(text.contains("attendance (student, session)"));
    assert!(text.contains("ix_attendances_student_id_session_id"));
}

#[test]
fn test_with_operation_sets_context() {
    let err = RepositoryError::internal("boom").with_operation("list_sessions");
    assert_eq!(err.context().operation.as_deref(), Some("list_sessions"));
}

#[test]
fn test_from_strings() {
    let err: RepositoryError = "plain".into();
    assert!(err.to_string().contains("plain"));
    let err: RepositoryError = String::from("owned").into();
    assert!(err.to_string().contains("owned"));
}
