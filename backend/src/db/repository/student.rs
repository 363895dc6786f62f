//! Student storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::api::{NewStudent, Student, StudentId};

/// Repository trait for students.
///
/// `email` and `student_code` are unique; a clash surfaces as
/// `RepositoryError::ConstraintViolation`.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn insert_student(
        &self,
        student: &NewStudent,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Student>;

    async fn get_student(&self, id: StudentId) -> RepositoryResult<Option<Student>>;

    async fn get_student_by_code(&self, code: &str) -> RepositoryResult<Option<Student>>;

    /// All students, ascending by id.
    async fn list_students(&self) -> RepositoryResult<Vec<Student>>;

    /// Replace names, email and code. Fails with `NotFound` for an unknown id.
    async fn update_student(&self, id: StudentId, student: &NewStudent)
        -> RepositoryResult<Student>;

    /// Remove the student and every attendance row that references it.
    ///
    /// Returns `false` when no such student existed.
    async fn delete_student(&self, id: StudentId) -> RepositoryResult<bool>;
}
